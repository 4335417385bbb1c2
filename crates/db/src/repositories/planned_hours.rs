//! Planned hours repository.
//!
//! One row per (department, month, year). The derived
//! `target_available_hours` is recomputed on every write unless the caller
//! supplies an explicit override.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use pulso_core::fiscal::Period;
use pulso_core::hours::HoursService;

use crate::entities::planned_hours;

/// Error types for planned hours operations.
#[derive(Debug, thiserror::Error)]
pub enum PlannedHoursError {
    /// No plan row for this department and month.
    #[error("No hours plan for department {department_id} in {period}")]
    NotFound {
        /// Department ID.
        department_id: Uuid,
        /// The month.
        period: Period,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for upserting a monthly hours plan.
#[derive(Debug, Clone, Default)]
pub struct UpsertPlannedHoursInput {
    /// Month-specific billable headcount.
    pub billable_headcount: Option<i32>,
    /// Month-specific target hours per person.
    pub target_hours_per_month: Option<Decimal>,
    /// Month-specific target utilization.
    pub target_utilization: Option<Decimal>,
    /// Explicit capacity override; when absent the capacity is derived.
    pub target_available_hours: Option<Decimal>,
    /// Actual billable hours worked.
    pub actual_billable_hours: Option<Decimal>,
    /// One-off project revenue for the month.
    pub project_revenue: Option<Decimal>,
}

/// Planned hours repository.
#[derive(Debug, Clone)]
pub struct PlannedHoursRepository {
    db: DatabaseConnection,
}

impl PlannedHoursRepository {
    /// Creates a new planned hours repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the plan row for a department and month, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find(
        &self,
        department_id: Uuid,
        period: Period,
    ) -> Result<Option<planned_hours::Model>, PlannedHoursError> {
        Ok(planned_hours::Entity::find()
            .filter(planned_hours::Column::DepartmentId.eq(department_id))
            .filter(planned_hours::Column::Month.eq(i32::try_from(period.month).unwrap_or_default()))
            .filter(planned_hours::Column::Year.eq(period.year))
            .one(&self.db)
            .await?)
    }

    /// Lists all plan rows for one month across departments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_for_period(
        &self,
        period: Period,
    ) -> Result<Vec<planned_hours::Model>, PlannedHoursError> {
        Ok(planned_hours::Entity::find()
            .filter(planned_hours::Column::Month.eq(i32::try_from(period.month).unwrap_or_default()))
            .filter(planned_hours::Column::Year.eq(period.year))
            .all(&self.db)
            .await?)
    }

    /// Creates or updates the plan row for a department and month.
    ///
    /// Capacity handling: an explicit `target_available_hours` in the
    /// input wins; otherwise it is derived from headcount, hours, and
    /// utilization (and left NULL when any of those is missing).
    ///
    /// Hand-entered actuals clear the sync marker: a row whose
    /// `actual_billable_hours` came through this path no longer claims
    /// to mirror Odoo.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn upsert(
        &self,
        department_id: Uuid,
        period: Period,
        input: UpsertPlannedHoursInput,
    ) -> Result<planned_hours::Model, PlannedHoursError> {
        let derived = HoursService::target_available_hours(
            input.billable_headcount,
            input.target_hours_per_month,
            input.target_utilization,
        );
        let capacity = input.target_available_hours.or(derived);
        let now = Utc::now().into();

        let model = match self.find(department_id, period).await? {
            Some(existing) => {
                let mut model: planned_hours::ActiveModel = existing.into();
                model.billable_headcount = Set(input.billable_headcount);
                model.target_hours_per_month = Set(input.target_hours_per_month);
                model.target_utilization = Set(input.target_utilization);
                model.target_available_hours = Set(capacity);
                model.actual_billable_hours = Set(input.actual_billable_hours);
                if input.actual_billable_hours.is_some() {
                    model.synced_from_odoo = Set(false);
                }
                model.project_revenue = Set(input.project_revenue);
                model.updated_at = Set(now);
                model.update(&self.db).await?
            }
            None => {
                let model = planned_hours::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    department_id: Set(department_id),
                    month: Set(i32::try_from(period.month).unwrap_or_default()),
                    year: Set(period.year),
                    billable_headcount: Set(input.billable_headcount),
                    target_hours_per_month: Set(input.target_hours_per_month),
                    target_utilization: Set(input.target_utilization),
                    target_available_hours: Set(capacity),
                    actual_billable_hours: Set(input.actual_billable_hours),
                    project_revenue: Set(input.project_revenue),
                    synced_from_odoo: Set(false),
                    last_synced_at: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                model.insert(&self.db).await?
            }
        };
        Ok(model)
    }

    /// Records synced actual hours for a department and month.
    ///
    /// Only touches the actuals and the sync markers; the plan columns
    /// keep whatever was configured by hand.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn record_synced_hours(
        &self,
        department_id: Uuid,
        period: Period,
        actual_billable_hours: Decimal,
    ) -> Result<planned_hours::Model, PlannedHoursError> {
        let now = Utc::now().into();
        let model = match self.find(department_id, period).await? {
            Some(existing) => {
                let mut model: planned_hours::ActiveModel = existing.into();
                model.actual_billable_hours = Set(Some(actual_billable_hours));
                model.synced_from_odoo = Set(true);
                model.last_synced_at = Set(Some(now));
                model.updated_at = Set(now);
                model.update(&self.db).await?
            }
            None => {
                let model = planned_hours::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    department_id: Set(department_id),
                    month: Set(i32::try_from(period.month).unwrap_or_default()),
                    year: Set(period.year),
                    billable_headcount: Set(None),
                    target_hours_per_month: Set(None),
                    target_utilization: Set(None),
                    target_available_hours: Set(None),
                    actual_billable_hours: Set(Some(actual_billable_hours)),
                    project_revenue: Set(None),
                    synced_from_odoo: Set(true),
                    last_synced_at: Set(Some(now)),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                model.insert(&self.db).await?
            }
        };
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn synced_row(department_id: Uuid) -> planned_hours::Model {
        let now = Utc::now().into();
        planned_hours::Model {
            id: Uuid::new_v4(),
            department_id,
            month: 6,
            year: 2026,
            billable_headcount: Some(4),
            target_hours_per_month: None,
            target_utilization: None,
            target_available_hours: None,
            actual_billable_hours: Some(Decimal::from(400)),
            project_revenue: None,
            synced_from_odoo: true,
            last_synced_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    async fn upsert_log(input: UpsertPlannedHoursInput) -> Vec<sea_orm::Transaction> {
        let department_id = Uuid::new_v4();
        let existing = synced_row(department_id);
        let mut updated = existing.clone();
        updated.synced_from_odoo = false;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing], vec![updated]])
            .into_connection();

        let repo = PlannedHoursRepository::new(db.clone());
        let period = Period::new(6, 2026).unwrap();
        repo.upsert(department_id, period, input).await.unwrap();
        db.into_transaction_log()
    }

    // Overwriting a synced row by hand must drop its claim of mirroring
    // Odoo.
    #[tokio::test]
    async fn test_manual_actuals_clear_sync_marker() {
        let log = upsert_log(UpsertPlannedHoursInput {
            actual_billable_hours: Some(Decimal::from(380)),
            ..Default::default()
        })
        .await;

        // The only boolean column on the row is the sync marker, so a
        // bound false means it was rewritten.
        let update = format!("{:?}", log.last().unwrap());
        assert!(update.contains("Bool(Some(false))"));
    }

    #[tokio::test]
    async fn test_upsert_without_actuals_leaves_sync_marker() {
        let log = upsert_log(UpsertPlannedHoursInput {
            billable_headcount: Some(5),
            ..Default::default()
        })
        .await;

        // No boolean bound: the update left the sync marker alone.
        let update = format!("{:?}", log.last().unwrap());
        assert!(!update.contains("Bool("));
    }
}
