//! `SeaORM` Entity for the planned_hours table.
//!
//! One row per (department, month, year). Carries both the plan
//! (headcount, target hours, utilization, derived or overridden capacity)
//! and the actuals (billable hours, possibly synced from Odoo).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "planned_hours")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub department_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub billable_headcount: Option<i32>,
    pub target_hours_per_month: Option<Decimal>,
    pub target_utilization: Option<Decimal>,
    pub target_available_hours: Option<Decimal>,
    pub actual_billable_hours: Option<Decimal>,
    pub project_revenue: Option<Decimal>,
    pub synced_from_odoo: bool,
    pub last_synced_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::departments::Entity",
        from = "Column::DepartmentId",
        to = "super::departments::Column::Id"
    )]
    Departments,
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Departments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
