//! Result repository.
//!
//! The results table is owned by the calculation engine: rows are only
//! written through [`ResultRepository::upsert`], keyed by
//! (department, month, year).

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use pulso_core::fiscal::Period;
use pulso_core::results::MonthlyResult;

use crate::entities::results;

/// Error types for result operations.
#[derive(Debug, thiserror::Error)]
pub enum ResultError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result repository.
#[derive(Debug, Clone)]
pub struct ResultRepository {
    db: DatabaseConnection,
}

impl ResultRepository {
    /// Creates a new result repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the stored result for a department and month, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find(
        &self,
        department_id: Uuid,
        period: Period,
    ) -> Result<Option<results::Model>, ResultError> {
        Ok(results::Entity::find()
            .filter(results::Column::DepartmentId.eq(department_id))
            .filter(results::Column::Month.eq(i32::try_from(period.month).unwrap_or_default()))
            .filter(results::Column::Year.eq(period.year))
            .one(&self.db)
            .await?)
    }

    /// Lists stored results for a department in one year, month order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_for_year(
        &self,
        department_id: Uuid,
        year: i32,
    ) -> Result<Vec<results::Model>, ResultError> {
        Ok(results::Entity::find()
            .filter(results::Column::DepartmentId.eq(department_id))
            .filter(results::Column::Year.eq(year))
            .order_by_asc(results::Column::Month)
            .all(&self.db)
            .await?)
    }

    /// Lists stored results for one month across departments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_for_period(
        &self,
        period: Period,
    ) -> Result<Vec<results::Model>, ResultError> {
        Ok(results::Entity::find()
            .filter(results::Column::Month.eq(i32::try_from(period.month).unwrap_or_default()))
            .filter(results::Column::Year.eq(period.year))
            .all(&self.db)
            .await?)
    }

    /// Creates or replaces the stored result for a department and month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn upsert(
        &self,
        department_id: Uuid,
        period: Period,
        result: &MonthlyResult,
        calculated_by: &str,
    ) -> Result<results::Model, ResultError> {
        let now = Utc::now().into();
        let model = match self.find(department_id, period).await? {
            Some(existing) => {
                let mut model: results::ActiveModel = existing.into();
                model.planned_hours = Set(result.planned_hours);
                model.actual_hours = Set(result.actual_hours);
                model.hourly_rate = Set(result.hourly_rate);
                model.active_retainers = Set(result.active_retainers);
                model.project_revenue = Set(result.project_revenue);
                model.revenue_from_hours = Set(result.revenue_from_hours);
                model.total_revenue = Set(result.total_revenue);
                model.objective = Set(result.objective);
                model.performance = Set(result.performance);
                model.utilization_rate = Set(result.utilization_rate);
                model.calculated_at = Set(now);
                model.calculated_by = Set(calculated_by.to_owned());
                model.update(&self.db).await?
            }
            None => {
                let model = results::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    department_id: Set(department_id),
                    month: Set(i32::try_from(period.month).unwrap_or_default()),
                    year: Set(period.year),
                    planned_hours: Set(result.planned_hours),
                    actual_hours: Set(result.actual_hours),
                    hourly_rate: Set(result.hourly_rate),
                    active_retainers: Set(result.active_retainers),
                    project_revenue: Set(result.project_revenue),
                    revenue_from_hours: Set(result.revenue_from_hours),
                    total_revenue: Set(result.total_revenue),
                    objective: Set(result.objective),
                    performance: Set(result.performance),
                    utilization_rate: Set(result.utilization_rate),
                    calculated_at: Set(now),
                    calculated_by: Set(calculated_by.to_owned()),
                };
                model.insert(&self.db).await?
            }
        };
        Ok(model)
    }
}
