//! Department repository.
//!
//! Owns department CRUD, unique code assignment, and persistence of the
//! derived annual metrics columns.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use pulso_core::department::generate_code;
use pulso_core::metrics::AnnualMetrics;

use crate::entities::departments;

/// Error types for department operations.
#[derive(Debug, thiserror::Error)]
pub enum DepartmentError {
    /// Department not found.
    #[error("Department not found: {0}")]
    NotFound(Uuid),

    /// Department name already exists.
    #[error("Department name already exists: {0}")]
    DuplicateName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a department.
#[derive(Debug, Clone)]
pub struct CreateDepartmentInput {
    /// Department name (unique).
    pub name: String,
    /// Explicit short code; generated from the name when absent.
    pub code: Option<String>,
    /// Billable headcount.
    pub billable_headcount: Option<i32>,
    /// Monthly cost per person, when overriding the company default.
    pub cost_per_person_per_month: Option<Decimal>,
    /// Target utilization fraction.
    pub target_utilization: Option<Decimal>,
    /// Average billable rate per hour.
    pub average_hourly_rate: Option<Decimal>,
}

/// Input for updating a department.
#[derive(Debug, Clone, Default)]
pub struct UpdateDepartmentInput {
    /// New name.
    pub name: Option<String>,
    /// New code.
    pub code: Option<String>,
    /// New billable headcount.
    pub billable_headcount: Option<i32>,
    /// New monthly cost per person (double-optional: outer = change,
    /// inner = value or clear).
    pub cost_per_person_per_month: Option<Option<Decimal>>,
    /// New target utilization.
    pub target_utilization: Option<Decimal>,
    /// New average hourly rate.
    pub average_hourly_rate: Option<Decimal>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Department repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    db: DatabaseConnection,
}

impl DepartmentRepository {
    /// Creates a new department repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a department.
    ///
    /// When no code is supplied one is generated from the name and made
    /// unique against the existing codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already taken or the database
    /// operation fails.
    pub async fn create(
        &self,
        input: CreateDepartmentInput,
    ) -> Result<departments::Model, DepartmentError> {
        let existing = departments::Entity::find()
            .filter(departments::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(DepartmentError::DuplicateName(input.name));
        }

        let code = match input.code {
            Some(code) => code,
            None => {
                let taken: Vec<String> = departments::Entity::find()
                    .all(&self.db)
                    .await?
                    .into_iter()
                    .filter_map(|d| d.code)
                    .collect();
                generate_code(&input.name, |candidate| {
                    taken.iter().any(|c| c == candidate)
                })
            }
        };

        let now = Utc::now().into();
        let department = departments::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            code: Set(Some(code)),
            billable_headcount: Set(input.billable_headcount.unwrap_or(1)),
            cost_per_person_per_month: Set(input.cost_per_person_per_month),
            target_utilization: Set(input.target_utilization.unwrap_or(Decimal::new(65, 2))),
            average_hourly_rate: Set(input.average_hourly_rate.unwrap_or(Decimal::from(50))),
            is_active: Set(true),
            direct_cost_annual: Set(None),
            billable_hours_annual: Set(None),
            revenue_capacity_annual: Set(None),
            overhead_allocated_annual: Set(None),
            minimum_revenue_annual: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(department.insert(&self.db).await?)
    }

    /// Gets a department by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such department exists.
    pub async fn get(&self, id: Uuid) -> Result<departments::Model, DepartmentError> {
        departments::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DepartmentError::NotFound(id))
    }

    /// Finds a department by its exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<departments::Model>, DepartmentError> {
        Ok(departments::Entity::find()
            .filter(departments::Column::Name.eq(name))
            .one(&self.db)
            .await?)
    }

    /// Lists departments ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<departments::Model>, DepartmentError> {
        let mut query = departments::Entity::find();
        if !include_inactive {
            query = query.filter(departments::Column::IsActive.eq(true));
        }
        Ok(query
            .order_by_asc(departments::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Lists all active departments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_active(&self) -> Result<Vec<departments::Model>, DepartmentError> {
        self.list(false).await
    }

    /// Updates a department.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such department exists.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateDepartmentInput,
    ) -> Result<departments::Model, DepartmentError> {
        let existing = self.get(id).await?;

        if let Some(name) = &input.name {
            let duplicate = departments::Entity::find()
                .filter(departments::Column::Name.eq(name))
                .filter(departments::Column::Id.ne(id))
                .one(&self.db)
                .await?;
            if duplicate.is_some() {
                return Err(DepartmentError::DuplicateName(name.clone()));
            }
        }

        let mut model: departments::ActiveModel = existing.into();
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(code) = input.code {
            model.code = Set(Some(code));
        }
        if let Some(headcount) = input.billable_headcount {
            model.billable_headcount = Set(headcount);
        }
        if let Some(cost) = input.cost_per_person_per_month {
            model.cost_per_person_per_month = Set(cost);
        }
        if let Some(utilization) = input.target_utilization {
            model.target_utilization = Set(utilization);
        }
        if let Some(rate) = input.average_hourly_rate {
            model.average_hourly_rate = Set(rate);
        }
        if let Some(active) = input.is_active {
            model.is_active = Set(active);
        }
        model.updated_at = Set(Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Deletes a department and, via cascade, its dependent rows.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such department exists.
    pub async fn delete(&self, id: Uuid) -> Result<(), DepartmentError> {
        let existing = self.get(id).await?;
        departments::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Stores the derived annual metrics columns for a department.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such department exists.
    pub async fn store_annual_metrics(
        &self,
        id: Uuid,
        metrics: &AnnualMetrics,
    ) -> Result<departments::Model, DepartmentError> {
        let existing = self.get(id).await?;
        let mut model: departments::ActiveModel = existing.into();
        model.direct_cost_annual = Set(Some(metrics.direct_cost_annual));
        model.billable_hours_annual = Set(Some(metrics.billable_hours_annual));
        model.revenue_capacity_annual = Set(Some(metrics.revenue_capacity_annual));
        model.overhead_allocated_annual = Set(Some(metrics.overhead_allocated_annual));
        model.minimum_revenue_annual = Set(Some(metrics.minimum_revenue_annual));
        model.updated_at = Set(Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Total billable headcount across active departments.
    ///
    /// This is the overhead allocation denominator.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn total_billable_headcount(&self) -> Result<i32, DepartmentError> {
        let departments = self.list_active().await?;
        Ok(departments.iter().map(|d| d.billable_headcount).sum())
    }
}
