//! Database layer with `SeaORM` entities, repositories, and services.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//! - Orchestration services (monthly result engine, Odoo hours sync)

// `SyncStatus::Error` collides with `TryFrom::Error` inside the
// `DeriveActiveEnum` expansion; the macro resolves to the variant, so the
// ambiguity lint is a false positive. Item-level `allow` does not reach the
// derive-generated impls, hence the crate-level allow.
#![allow(ambiguous_associated_items)]

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod services;

pub use repositories::{
    AuditRepository, DepartmentRepository, FixedCostRepository, ObjectiveRepository,
    OdooConnectionRepository, PlannedHoursRepository, ResultRepository, RetainerRepository,
    SettingsRepository,
};
pub use services::{CalculationService, OdooSyncService};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
