//! `SeaORM` Entity for the retainers table.
//!
//! Contract instances. `monthly_revenue` is always
//! `monthly_price * quantity`; it is recomputed on every write and never
//! stored independently.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "retainers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub department_id: Uuid,
    pub catalog_id: Option<Uuid>,
    pub name: String,
    pub contract_type: String,
    pub monthly_price: Decimal,
    pub quantity: i32,
    pub monthly_revenue: Decimal,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub is_active: bool,
    pub notes: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::retainer_catalog::Entity",
        from = "Column::CatalogId",
        to = "super::retainer_catalog::Column::Id"
    )]
    RetainerCatalog,
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Departments.def()
    }
}

impl Related<super::retainer_catalog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RetainerCatalog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
