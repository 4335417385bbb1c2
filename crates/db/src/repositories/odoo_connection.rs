//! Odoo connection repository.
//!
//! A single active connection record. The password is stored encrypted;
//! this repository never sees plaintext.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{odoo_connections, sea_orm_active_enums::SyncStatus};

/// Error types for Odoo connection operations.
#[derive(Debug, thiserror::Error)]
pub enum OdooConnectionError {
    /// No active connection is configured.
    #[error("No active Odoo connection configured")]
    NotConfigured,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for saving the connection record.
#[derive(Debug, Clone)]
pub struct UpsertOdooConnectionInput {
    /// Server base URL.
    pub url: String,
    /// Odoo database name.
    pub database: String,
    /// Login username.
    pub username: String,
    /// Already-encrypted password blob.
    pub encrypted_password: String,
}

/// Odoo connection repository.
#[derive(Debug, Clone)]
pub struct OdooConnectionRepository {
    db: DatabaseConnection,
}

impl OdooConnectionRepository {
    /// Creates a new Odoo connection repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The active connection record, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find_active(
        &self,
    ) -> Result<Option<odoo_connections::Model>, OdooConnectionError> {
        Ok(odoo_connections::Entity::find()
            .filter(odoo_connections::Column::IsActive.eq(true))
            .one(&self.db)
            .await?)
    }

    /// The active connection record, required.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` when no active record exists.
    pub async fn get_active(&self) -> Result<odoo_connections::Model, OdooConnectionError> {
        self.find_active()
            .await?
            .ok_or(OdooConnectionError::NotConfigured)
    }

    /// Saves the connection record, replacing the active one if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn upsert(
        &self,
        input: UpsertOdooConnectionInput,
    ) -> Result<odoo_connections::Model, OdooConnectionError> {
        let now = Utc::now().into();
        let model = match self.find_active().await? {
            Some(existing) => {
                let mut model: odoo_connections::ActiveModel = existing.into();
                model.url = Set(input.url);
                model.database = Set(input.database);
                model.username = Set(input.username);
                model.encrypted_password = Set(input.encrypted_password);
                model.updated_at = Set(now);
                model.update(&self.db).await?
            }
            None => {
                let model = odoo_connections::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    url: Set(input.url),
                    database: Set(input.database),
                    username: Set(input.username),
                    encrypted_password: Set(input.encrypted_password),
                    is_active: Set(true),
                    last_sync_at: Set(None),
                    last_sync_status: Set(None),
                    last_sync_error: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                model.insert(&self.db).await?
            }
        };
        Ok(model)
    }

    /// Stamps the outcome of a sync run on the connection record.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` when no active record exists.
    pub async fn record_sync_outcome(
        &self,
        status: SyncStatus,
        error: Option<String>,
    ) -> Result<odoo_connections::Model, OdooConnectionError> {
        let existing = self.get_active().await?;
        let now = Utc::now().into();
        let mut model: odoo_connections::ActiveModel = existing.into();
        model.last_sync_at = Set(Some(now));
        model.last_sync_status = Set(Some(status));
        model.last_sync_error = Set(error);
        model.updated_at = Set(now);
        Ok(model.update(&self.db).await?)
    }
}
