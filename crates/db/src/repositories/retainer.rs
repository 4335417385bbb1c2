//! Retainer repository.
//!
//! Covers both the priced catalog templates and the contract instances.
//! Derived fields (`monthly_revenue` on contracts, the margin columns on
//! catalog entries) are recomputed on every write path.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use pulso_core::fiscal::{Period, active_in_period};
use pulso_core::retainers::RetainerService;

use crate::entities::{retainer_catalog, retainers};

/// Error types for retainer operations.
#[derive(Debug, thiserror::Error)]
pub enum RetainerError {
    /// Retainer not found.
    #[error("Retainer not found: {0}")]
    NotFound(Uuid),

    /// Catalog entry not found.
    #[error("Catalog entry not found: {0}")]
    CatalogNotFound(Uuid),

    /// Catalog name already exists.
    #[error("Catalog name already exists: {0}")]
    DuplicateCatalogName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a retainer contract.
#[derive(Debug, Clone)]
pub struct CreateRetainerInput {
    /// Department ID.
    pub department_id: Uuid,
    /// Optional catalog template this contract was created from.
    pub catalog_id: Option<Uuid>,
    /// Client-facing contract name.
    pub name: String,
    /// Contract type label.
    pub contract_type: String,
    /// Price per unit per month.
    pub monthly_price: Decimal,
    /// Contracted units; coerced to at least 1.
    pub quantity: Option<i32>,
    /// Contract start date.
    pub start_date: NaiveDate,
    /// Contract end date, if bounded.
    pub end_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating a retainer contract.
#[derive(Debug, Clone, Default)]
pub struct UpdateRetainerInput {
    /// New name.
    pub name: Option<String>,
    /// New contract type.
    pub contract_type: Option<String>,
    /// New price.
    pub monthly_price: Option<Decimal>,
    /// New quantity.
    pub quantity: Option<i32>,
    /// New start date.
    pub start_date: Option<NaiveDate>,
    /// New end date (outer = change, inner = value or clear).
    pub end_date: Option<Option<NaiveDate>>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New notes.
    pub notes: Option<Option<String>>,
}

/// Input for creating a catalog template.
#[derive(Debug, Clone)]
pub struct CreateCatalogInput {
    /// Template name (unique).
    pub name: String,
    /// Owning department.
    pub department_id: Uuid,
    /// Price per month.
    pub monthly_price: Decimal,
    /// Included hours per month.
    pub hours_per_month: Decimal,
    /// Internal delivery cost per hour, when known.
    pub internal_hourly_cost: Option<Decimal>,
    /// Base hours of the underlying package, if derived from one.
    pub base_hours: Option<Decimal>,
    /// Base price of the underlying package, if derived from one.
    pub base_price: Option<Decimal>,
}

/// Input for updating a catalog template.
#[derive(Debug, Clone, Default)]
pub struct UpdateCatalogInput {
    /// New name.
    pub name: Option<String>,
    /// New price.
    pub monthly_price: Option<Decimal>,
    /// New included hours.
    pub hours_per_month: Option<Decimal>,
    /// New internal hourly cost (outer = change, inner = value or clear).
    pub internal_hourly_cost: Option<Option<Decimal>>,
}

/// Retainer repository for contracts and the catalog.
#[derive(Debug, Clone)]
pub struct RetainerRepository {
    db: DatabaseConnection,
}

impl RetainerRepository {
    /// Creates a new retainer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Contracts
    // ========================================================================

    /// Creates a retainer contract with derived revenue.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(
        &self,
        input: CreateRetainerInput,
    ) -> Result<retainers::Model, RetainerError> {
        let pricing = RetainerService::monthly_revenue(input.monthly_price, input.quantity);
        let now = Utc::now().into();
        let model = retainers::ActiveModel {
            id: Set(Uuid::new_v4()),
            department_id: Set(input.department_id),
            catalog_id: Set(input.catalog_id),
            name: Set(input.name),
            contract_type: Set(input.contract_type),
            monthly_price: Set(pricing.monthly_price),
            quantity: Set(pricing.quantity),
            monthly_revenue: Set(pricing.monthly_revenue),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            is_active: Set(true),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Gets a retainer contract by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such contract exists.
    pub async fn get(&self, id: Uuid) -> Result<retainers::Model, RetainerError> {
        retainers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RetainerError::NotFound(id))
    }

    /// Lists contracts for a department, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_for_department(
        &self,
        department_id: Uuid,
    ) -> Result<Vec<retainers::Model>, RetainerError> {
        Ok(retainers::Entity::find()
            .filter(retainers::Column::DepartmentId.eq(department_id))
            .order_by_desc(retainers::Column::StartDate)
            .all(&self.db)
            .await?)
    }

    /// Updates a contract, rederiving `monthly_revenue`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such contract exists.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateRetainerInput,
    ) -> Result<retainers::Model, RetainerError> {
        let existing = self.get(id).await?;
        let price = input.monthly_price.unwrap_or(existing.monthly_price);
        let quantity = input.quantity.or(Some(existing.quantity));
        let pricing = RetainerService::monthly_revenue(price, quantity);

        let mut model: retainers::ActiveModel = existing.into();
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(contract_type) = input.contract_type {
            model.contract_type = Set(contract_type);
        }
        model.monthly_price = Set(pricing.monthly_price);
        model.quantity = Set(pricing.quantity);
        model.monthly_revenue = Set(pricing.monthly_revenue);
        if let Some(start) = input.start_date {
            model.start_date = Set(start);
        }
        if let Some(end) = input.end_date {
            model.end_date = Set(end);
        }
        if let Some(active) = input.is_active {
            model.is_active = Set(active);
        }
        if let Some(notes) = input.notes {
            model.notes = Set(notes);
        }
        model.updated_at = Set(Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Deletes a contract.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such contract exists.
    pub async fn delete(&self, id: Uuid) -> Result<(), RetainerError> {
        let existing = self.get(id).await?;
        retainers::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Contracts of one department whose validity window overlaps a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn active_for_month(
        &self,
        department_id: Uuid,
        period: Period,
    ) -> Result<Vec<retainers::Model>, RetainerError> {
        let rows = retainers::Entity::find()
            .filter(retainers::Column::DepartmentId.eq(department_id))
            .filter(retainers::Column::IsActive.eq(true))
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .filter(|r| active_in_period(r.is_active, r.start_date, r.end_date, period))
            .collect())
    }

    /// Summed monthly revenue of contracts active in a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn revenue_for_month(
        &self,
        department_id: Uuid,
        period: Period,
    ) -> Result<Decimal, RetainerError> {
        let active = self.active_for_month(department_id, period).await?;
        Ok(active.iter().map(|r| r.monthly_revenue).sum())
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Creates a catalog template with derived margins.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the database operation
    /// fails.
    pub async fn create_catalog(
        &self,
        input: CreateCatalogInput,
    ) -> Result<retainer_catalog::Model, RetainerError> {
        let existing = retainer_catalog::Entity::find()
            .filter(retainer_catalog::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(RetainerError::DuplicateCatalogName(input.name));
        }

        let margins = RetainerService::catalog_margins(
            input.monthly_price,
            input.hours_per_month,
            input.internal_hourly_cost,
        );
        let now = Utc::now().into();
        let model = retainer_catalog::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            department_id: Set(input.department_id),
            monthly_price: Set(input.monthly_price),
            hours_per_month: Set(input.hours_per_month),
            internal_hourly_cost: Set(input.internal_hourly_cost),
            monthly_cost: Set(margins.map(|m| m.monthly_cost)),
            monthly_margin: Set(margins.map(|m| m.monthly_margin)),
            margin_percentage: Set(margins.map(|m| m.margin_percentage)),
            base_hours: Set(input.base_hours),
            base_price: Set(input.base_price),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Gets a catalog template by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogNotFound` when no such template exists.
    pub async fn get_catalog(&self, id: Uuid) -> Result<retainer_catalog::Model, RetainerError> {
        retainer_catalog::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RetainerError::CatalogNotFound(id))
    }

    /// Lists all catalog templates ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_catalog(&self) -> Result<Vec<retainer_catalog::Model>, RetainerError> {
        Ok(retainer_catalog::Entity::find()
            .order_by_asc(retainer_catalog::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Updates a catalog template, rederiving the margin columns.
    ///
    /// # Errors
    ///
    /// Returns `CatalogNotFound` when no such template exists.
    pub async fn update_catalog(
        &self,
        id: Uuid,
        input: UpdateCatalogInput,
    ) -> Result<retainer_catalog::Model, RetainerError> {
        let existing = self.get_catalog(id).await?;
        let price = input.monthly_price.unwrap_or(existing.monthly_price);
        let hours = input.hours_per_month.unwrap_or(existing.hours_per_month);
        let hourly_cost = input
            .internal_hourly_cost
            .unwrap_or(existing.internal_hourly_cost);
        let margins = RetainerService::catalog_margins(price, hours, hourly_cost);

        let mut model: retainer_catalog::ActiveModel = existing.into();
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        model.monthly_price = Set(price);
        model.hours_per_month = Set(hours);
        model.internal_hourly_cost = Set(hourly_cost);
        model.monthly_cost = Set(margins.map(|m| m.monthly_cost));
        model.monthly_margin = Set(margins.map(|m| m.monthly_margin));
        model.margin_percentage = Set(margins.map(|m| m.margin_percentage));
        model.updated_at = Set(Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Deletes a catalog template. Contracts created from it keep their
    /// own copied pricing and stay untouched.
    ///
    /// # Errors
    ///
    /// Returns `CatalogNotFound` when no such template exists.
    pub async fn delete_catalog(&self, id: Uuid) -> Result<(), RetainerError> {
        let existing = self.get_catalog(id).await?;
        retainer_catalog::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
