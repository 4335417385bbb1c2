//! Fixed cost repository.
//!
//! Company-level recurring costs with a validity window. The monthly
//! total for a reference month annualizes to the fixed-cost share of the
//! overhead pool.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use pulso_core::fiscal::{Period, active_in_period};

use crate::entities::{fixed_costs, sea_orm_active_enums::FixedCostCategory};

/// Error types for fixed cost operations.
#[derive(Debug, thiserror::Error)]
pub enum FixedCostError {
    /// Fixed cost not found.
    #[error("Fixed cost not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a fixed cost.
#[derive(Debug, Clone)]
pub struct CreateFixedCostInput {
    /// Cost name.
    pub name: String,
    /// Cost category.
    pub category: FixedCostCategory,
    /// Monthly amount.
    pub monthly_amount: Decimal,
    /// Free-form description.
    pub description: Option<String>,
    /// Validity start.
    pub start_date: NaiveDate,
    /// Validity end, if bounded.
    pub end_date: Option<NaiveDate>,
}

/// Input for updating a fixed cost.
#[derive(Debug, Clone, Default)]
pub struct UpdateFixedCostInput {
    /// New name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<FixedCostCategory>,
    /// New monthly amount.
    pub monthly_amount: Option<Decimal>,
    /// New description (outer = change, inner = value or clear).
    pub description: Option<Option<String>>,
    /// New validity start.
    pub start_date: Option<NaiveDate>,
    /// New validity end (outer = change, inner = value or clear).
    pub end_date: Option<Option<NaiveDate>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Fixed cost repository.
#[derive(Debug, Clone)]
pub struct FixedCostRepository {
    db: DatabaseConnection,
}

impl FixedCostRepository {
    /// Creates a new fixed cost repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a fixed cost.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(
        &self,
        input: CreateFixedCostInput,
    ) -> Result<fixed_costs::Model, FixedCostError> {
        let now = Utc::now().into();
        let model = fixed_costs::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            category: Set(input.category),
            monthly_amount: Set(input.monthly_amount),
            description: Set(input.description),
            is_active: Set(true),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Gets a fixed cost by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such cost exists.
    pub async fn get(&self, id: Uuid) -> Result<fixed_costs::Model, FixedCostError> {
        fixed_costs::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(FixedCostError::NotFound(id))
    }

    /// Lists all fixed costs ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self) -> Result<Vec<fixed_costs::Model>, FixedCostError> {
        Ok(fixed_costs::Entity::find()
            .order_by_asc(fixed_costs::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Updates a fixed cost.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such cost exists.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateFixedCostInput,
    ) -> Result<fixed_costs::Model, FixedCostError> {
        let existing = self.get(id).await?;
        let mut model: fixed_costs::ActiveModel = existing.into();
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(category) = input.category {
            model.category = Set(category);
        }
        if let Some(amount) = input.monthly_amount {
            model.monthly_amount = Set(amount);
        }
        if let Some(description) = input.description {
            model.description = Set(description);
        }
        if let Some(start) = input.start_date {
            model.start_date = Set(start);
        }
        if let Some(end) = input.end_date {
            model.end_date = Set(end);
        }
        if let Some(active) = input.is_active {
            model.is_active = Set(active);
        }
        model.updated_at = Set(Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Deletes a fixed cost.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such cost exists.
    pub async fn delete(&self, id: Uuid) -> Result<(), FixedCostError> {
        let existing = self.get(id).await?;
        fixed_costs::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Fixed costs whose validity window overlaps a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn active_for_month(
        &self,
        period: Period,
    ) -> Result<Vec<fixed_costs::Model>, FixedCostError> {
        let rows = fixed_costs::Entity::find()
            .filter(fixed_costs::Column::IsActive.eq(true))
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .filter(|c| active_in_period(c.is_active, c.start_date, c.end_date, period))
            .collect())
    }

    /// Summed monthly amount of costs active in a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn monthly_total(&self, period: Period) -> Result<Decimal, FixedCostError> {
        let active = self.active_for_month(period).await?;
        Ok(active.iter().map(|c| c.monthly_amount).sum())
    }

    /// Annualized fixed-cost total for a reference month.
    ///
    /// The reference month's total times 12, not a sum over twelve
    /// distinct months.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn annual_total(&self, period: Period) -> Result<Decimal, FixedCostError> {
        Ok(self.monthly_total(period).await? * Decimal::from(12))
    }
}
