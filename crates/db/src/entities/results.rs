//! `SeaORM` Entity for the results table.
//!
//! The derived monthly snapshot, keyed by (department, month, year) and
//! fully owned by the calculation engine. `active_retainers` and
//! `total_revenue` are NOT NULL even at zero; the remaining metric
//! columns stay NULL when never configured.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub department_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub planned_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    pub hourly_rate: Option<Decimal>,
    pub active_retainers: Decimal,
    pub project_revenue: Option<Decimal>,
    pub revenue_from_hours: Option<Decimal>,
    pub total_revenue: Decimal,
    pub objective: Option<Decimal>,
    pub performance: Option<Decimal>,
    pub utilization_rate: Option<Decimal>,
    pub calculated_at: DateTimeWithTimeZone,
    pub calculated_by: String,
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
