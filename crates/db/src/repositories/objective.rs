//! Objective repository.
//!
//! One revenue objective per (department, month, year).

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use pulso_core::fiscal::Period;

use crate::entities::objectives;

/// Error types for objective operations.
#[derive(Debug, thiserror::Error)]
pub enum ObjectiveError {
    /// Objective not found.
    #[error("Objective not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for setting a monthly objective.
#[derive(Debug, Clone)]
pub struct UpsertObjectiveInput {
    /// Department ID.
    pub department_id: Uuid,
    /// The month.
    pub period: Period,
    /// Revenue target for the month.
    pub target_value: Decimal,
}

/// Objective repository.
#[derive(Debug, Clone)]
pub struct ObjectiveRepository {
    db: DatabaseConnection,
}

impl ObjectiveRepository {
    /// Creates a new objective repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the objective for a department and month, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find(
        &self,
        department_id: Uuid,
        period: Period,
    ) -> Result<Option<objectives::Model>, ObjectiveError> {
        Ok(objectives::Entity::find()
            .filter(objectives::Column::DepartmentId.eq(department_id))
            .filter(objectives::Column::Month.eq(i32::try_from(period.month).unwrap_or_default()))
            .filter(objectives::Column::Year.eq(period.year))
            .one(&self.db)
            .await?)
    }

    /// Lists all objectives for a department in one year.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_for_year(
        &self,
        department_id: Uuid,
        year: i32,
    ) -> Result<Vec<objectives::Model>, ObjectiveError> {
        Ok(objectives::Entity::find()
            .filter(objectives::Column::DepartmentId.eq(department_id))
            .filter(objectives::Column::Year.eq(year))
            .all(&self.db)
            .await?)
    }

    /// Creates or replaces the objective for a department and month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn upsert(
        &self,
        input: UpsertObjectiveInput,
    ) -> Result<objectives::Model, ObjectiveError> {
        let now = Utc::now().into();
        let model = match self.find(input.department_id, input.period).await? {
            Some(existing) => {
                let mut model: objectives::ActiveModel = existing.into();
                model.target_value = Set(input.target_value);
                model.updated_at = Set(now);
                model.update(&self.db).await?
            }
            None => {
                let model = objectives::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    department_id: Set(input.department_id),
                    month: Set(i32::try_from(input.period.month).unwrap_or_default()),
                    year: Set(input.period.year),
                    target_value: Set(input.target_value),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                model.insert(&self.db).await?
            }
        };
        Ok(model)
    }

    /// Deletes an objective by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such objective exists.
    pub async fn delete(&self, id: Uuid) -> Result<(), ObjectiveError> {
        let existing = objectives::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ObjectiveError::NotFound(id))?;
        objectives::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
