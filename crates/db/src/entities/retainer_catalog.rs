//! `SeaORM` Entity for the retainer_catalog table.
//!
//! Priced retainer templates. The margin columns are derived from
//! `internal_hourly_cost` on every write.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "retainer_catalog")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub department_id: Uuid,
    pub monthly_price: Decimal,
    pub hours_per_month: Decimal,
    pub internal_hourly_cost: Option<Decimal>,
    pub monthly_cost: Option<Decimal>,
    pub monthly_margin: Option<Decimal>,
    pub margin_percentage: Option<Decimal>,
    pub base_hours: Option<Decimal>,
    pub base_price: Option<Decimal>,
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
    #[sea_orm(has_many = "super::retainers::Entity")]
    Retainers,
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Departments.def()
    }
}

impl Related<super::retainers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Retainers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
