//! Database enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed cost category.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "fixed_cost_category")]
#[serde(rename_all = "snake_case")]
pub enum FixedCostCategory {
    /// Rent.
    #[sea_orm(string_value = "aluguel")]
    Aluguel,
    /// Utilities.
    #[sea_orm(string_value = "utilidades")]
    Utilidades,
    /// Software subscriptions.
    #[sea_orm(string_value = "software")]
    Software,
    /// Company vehicles.
    #[sea_orm(string_value = "viaturas")]
    Viaturas,
    /// Everything else.
    #[sea_orm(string_value = "outros")]
    Outros,
}

/// Outcome of the last Odoo synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "sync_status")]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Sync finished without errors.
    #[sea_orm(string_value = "success")]
    Success,
    /// Sync finished with at least one error.
    #[sea_orm(string_value = "error")]
    Error,
}
