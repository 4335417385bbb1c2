//! `SeaORM` Entity for the odoo_connections table.
//!
//! Connection settings for the external ERP. The password column holds a
//! nonce-prefixed AES-256-GCM blob, never plaintext.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::SyncStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "odoo_connections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub url: String,
    pub database: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub encrypted_password: String,
    pub is_active: bool,
    pub last_sync_at: Option<DateTimeWithTimeZone>,
    pub last_sync_status: Option<SyncStatus>,
    pub last_sync_error: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
