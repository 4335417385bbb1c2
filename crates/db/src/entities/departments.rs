//! `SeaORM` Entity for the departments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A billable department with its derived annual metrics.
///
/// The five `*_annual` columns are nullable until the annual metrics
/// calculator first runs; they are recomputed whenever headcount, cost,
/// utilization, or rate changes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub code: Option<String>,
    pub billable_headcount: i32,
    pub cost_per_person_per_month: Option<Decimal>,
    pub target_utilization: Decimal,
    pub average_hourly_rate: Decimal,
    pub is_active: bool,
    pub direct_cost_annual: Option<Decimal>,
    pub billable_hours_annual: Option<Decimal>,
    pub revenue_capacity_annual: Option<Decimal>,
    pub overhead_allocated_annual: Option<Decimal>,
    pub minimum_revenue_annual: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::planned_hours::Entity")]
    PlannedHours,
    #[sea_orm(has_many = "super::objectives::Entity")]
    Objectives,
    #[sea_orm(has_many = "super::retainers::Entity")]
    Retainers,
    #[sea_orm(has_many = "super::retainer_catalog::Entity")]
    RetainerCatalog,
    #[sea_orm(has_many = "super::results::Entity")]
    Results,
}

impl Related<super::planned_hours::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlannedHours.def()
    }
}

impl Related<super::objectives::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Objectives.def()
    }
}

impl Related<super::retainers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Retainers.def()
    }
}

impl Related<super::results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Results.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
