//! Monthly result engine and annual metrics orchestration.
//!
//! Gathers the inputs for one department/month (plan, retainers,
//! objective), runs the pure calculation, and persists the snapshot. The
//! stored result is always a full overwrite; nothing merges with a
//! previous run.

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing::{info, warn};
use uuid::Uuid;

use pulso_core::fiscal::Period;
use pulso_core::metrics::{AnnualMetrics, AnnualMetricsInput, MetricsError, MetricsService};
use pulso_core::overhead::OverheadService;
use pulso_core::results::{MonthlyResult, PlanSnapshot, ResultInput, ResultService};

use crate::entities::results;
use crate::repositories::{
    DepartmentError, DepartmentRepository, FixedCostError, FixedCostRepository, ObjectiveError,
    ObjectiveRepository, PlannedHoursError, PlannedHoursRepository, ResultError, ResultRepository,
    RetainerError, RetainerRepository, SettingsError, SettingsRepository,
};

/// Writer stamped on engine-produced result rows.
const CALCULATED_BY: &str = "system";

/// Error types for calculation orchestration.
#[derive(Debug, thiserror::Error)]
pub enum CalculationError {
    /// Department lookup failed.
    #[error(transparent)]
    Department(#[from] DepartmentError),

    /// Hours plan lookup failed.
    #[error(transparent)]
    PlannedHours(#[from] PlannedHoursError),

    /// Retainer lookup failed.
    #[error(transparent)]
    Retainer(#[from] RetainerError),

    /// Objective lookup failed.
    #[error(transparent)]
    Objective(#[from] ObjectiveError),

    /// Fixed cost lookup failed.
    #[error(transparent)]
    FixedCost(#[from] FixedCostError),

    /// Settings resolution failed.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Result persistence failed.
    #[error(transparent)]
    Result(#[from] ResultError),

    /// Annual metrics rejected the configuration.
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// Outcome of a year-wide recalculation.
#[derive(Debug)]
pub struct YearRecalculation {
    /// Months recalculated successfully.
    pub succeeded: u32,
    /// Months that failed, with the month number and error text.
    pub failed: Vec<(u32, String)>,
}

/// Calculation service.
#[derive(Debug, Clone)]
pub struct CalculationService {
    departments: DepartmentRepository,
    planned_hours: PlannedHoursRepository,
    retainers: RetainerRepository,
    objectives: ObjectiveRepository,
    fixed_costs: FixedCostRepository,
    settings: SettingsRepository,
    results: ResultRepository,
}

impl CalculationService {
    /// Creates a calculation service over one database connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            departments: DepartmentRepository::new(db.clone()),
            planned_hours: PlannedHoursRepository::new(db.clone()),
            retainers: RetainerRepository::new(db.clone()),
            objectives: ObjectiveRepository::new(db.clone()),
            fixed_costs: FixedCostRepository::new(db.clone()),
            settings: SettingsRepository::new(db.clone()),
            results: ResultRepository::new(db),
        }
    }

    /// Computes the result for one department and month without storing it.
    ///
    /// # Errors
    ///
    /// Department-not-found is fatal; every other input is optional and
    /// its absence simply leaves the corresponding fields unset.
    pub async fn preview_department_result(
        &self,
        department_id: Uuid,
        period: Period,
    ) -> Result<MonthlyResult, CalculationError> {
        let department = self.departments.get(department_id).await?;

        let plan = self
            .planned_hours
            .find(department_id, period)
            .await?
            .map(|row| PlanSnapshot {
                target_available_hours: row.target_available_hours,
                actual_billable_hours: row.actual_billable_hours,
                project_revenue: row.project_revenue,
            });

        let retainers_revenue = self.retainers.revenue_for_month(department_id, period).await?;

        let objective = self
            .objectives
            .find(department_id, period)
            .await?
            .map(|row| row.target_value);

        Ok(ResultService::compute(ResultInput {
            average_hourly_rate: department.average_hourly_rate,
            plan,
            retainers_revenue,
            objective,
        }))
    }

    /// Computes and stores the result for one department and month.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::preview_department_result`], plus
    /// persistence errors.
    pub async fn calculate_department_result(
        &self,
        department_id: Uuid,
        period: Period,
    ) -> Result<results::Model, CalculationError> {
        let result = self.preview_department_result(department_id, period).await?;
        let stored = self
            .results
            .upsert(department_id, period, &result, CALCULATED_BY)
            .await?;
        info!(%department_id, %period, total = %result.total_revenue, "stored monthly result");
        Ok(stored)
    }

    /// Recalculates all twelve months of one year for a department.
    ///
    /// Months run sequentially; a failing month is logged and skipped so
    /// one bad month cannot block the rest of the year.
    ///
    /// # Errors
    ///
    /// Only fails when the department itself cannot be loaded.
    pub async fn recalculate_year(
        &self,
        department_id: Uuid,
        year: i32,
    ) -> Result<YearRecalculation, CalculationError> {
        // Fail fast on a missing department rather than twelve times over.
        self.departments.get(department_id).await?;

        let mut outcome = YearRecalculation {
            succeeded: 0,
            failed: Vec::new(),
        };
        for month in 1..=12 {
            let Ok(period) = Period::new(month, year) else {
                continue;
            };
            match self.calculate_department_result(department_id, period).await {
                Ok(_) => outcome.succeeded += 1,
                Err(err) => {
                    warn!(%department_id, %period, error = %err, "month recalculation failed");
                    outcome.failed.push((month, err.to_string()));
                }
            }
        }
        Ok(outcome)
    }

    /// Recalculates a month and the three months after it.
    ///
    /// Used after writes whose activity window can straddle month
    /// boundaries (retainers, fixed costs). Failures are logged per month
    /// and do not interrupt the window.
    ///
    /// # Errors
    ///
    /// Only fails when the department itself cannot be loaded.
    pub async fn recalculate_window(
        &self,
        department_id: Uuid,
        start: Period,
    ) -> Result<(), CalculationError> {
        self.departments.get(department_id).await?;

        let mut period = start;
        for _ in 0..4 {
            if let Err(err) = self.calculate_department_result(department_id, period).await {
                warn!(%department_id, %period, error = %err, "window recalculation failed");
            }
            period = period.next();
        }
        Ok(())
    }

    /// Computes annual metrics for one department without storing them.
    ///
    /// `reference` anchors the fixed-cost annualization: the overhead pool
    /// uses that month's active fixed costs times twelve.
    ///
    /// # Errors
    ///
    /// Returns `Metrics` when the configured target margin is at or above
    /// the accepted ceiling; repository errors otherwise.
    pub async fn preview_annual_metrics(
        &self,
        department_id: Uuid,
        reference: Period,
    ) -> Result<AnnualMetrics, CalculationError> {
        let department = self.departments.get(department_id).await?;
        let settings = self.settings.company_settings().await?;

        let fixed_costs_annual = self.fixed_costs.annual_total(reference).await?;
        let pool = OverheadService::total_annual_cost(
            settings.overhead_people,
            settings.cost_per_person_per_month,
            fixed_costs_annual,
        );
        let total_headcount = self.departments.total_billable_headcount().await?;
        let overhead_allocated =
            OverheadService::allocate(pool, department.billable_headcount, total_headcount);

        Ok(MetricsService::annual_metrics(
            AnnualMetricsInput {
                billable_headcount: department.billable_headcount,
                cost_per_person_per_month: department.cost_per_person_per_month,
                target_utilization: department.target_utilization,
                average_hourly_rate: department.average_hourly_rate,
            },
            &settings,
            overhead_allocated,
        )?)
    }

    /// Computes and stores annual metrics for one department.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::preview_annual_metrics`], plus
    /// persistence errors.
    pub async fn calculate_annual_metrics(
        &self,
        department_id: Uuid,
        reference: Period,
    ) -> Result<AnnualMetrics, CalculationError> {
        let metrics = self.preview_annual_metrics(department_id, reference).await?;
        self.departments
            .store_annual_metrics(department_id, &metrics)
            .await?;
        info!(%department_id, minimum = %metrics.minimum_revenue_annual, "stored annual metrics");
        Ok(metrics)
    }

    /// Annualized view of a department's stored monthly results.
    ///
    /// Sums the stored rows for `year`; months with no stored row simply
    /// contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn annual_revenue_total(
        &self,
        department_id: Uuid,
        year: i32,
    ) -> Result<Decimal, CalculationError> {
        let rows = self.results.list_for_year(department_id, year).await?;
        Ok(rows.iter().map(|r| r.total_revenue).sum())
    }
}
