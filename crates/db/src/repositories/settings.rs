//! Global settings repository.
//!
//! Settings are stored as string key/value rows and resolved into
//! [`CompanySettings`]. A missing row falls back to its default; a
//! present-but-malformed value is a hard error.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use pulso_core::settings::CompanySettings;

use crate::entities::global_settings;

/// Error types for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A stored value could not be parsed.
    #[error(transparent)]
    Malformed(#[from] pulso_core::settings::SettingsError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Global settings repository.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: DatabaseConnection,
}

impl SettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all raw setting rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self) -> Result<Vec<global_settings::Model>, SettingsError> {
        Ok(global_settings::Entity::find().all(&self.db).await?)
    }

    /// Resolves the company settings from the stored rows.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` for an unparsable stored value, or a database
    /// error.
    pub async fn company_settings(&self) -> Result<CompanySettings, SettingsError> {
        let rows: HashMap<String, String> = self
            .list()
            .await?
            .into_iter()
            .map(|row| (row.key, row.value))
            .collect();
        Ok(CompanySettings::from_rows(&rows)?)
    }

    /// Sets one setting value, creating the row if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn set(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<global_settings::Model, SettingsError> {
        let now = Utc::now().into();
        let existing = global_settings::Entity::find()
            .filter(global_settings::Column::Key.eq(key))
            .one(&self.db)
            .await?;

        let model = match existing {
            Some(row) => {
                let mut model: global_settings::ActiveModel = row.into();
                model.value = Set(value.to_owned());
                if let Some(description) = description {
                    model.description = Set(Some(description.to_owned()));
                }
                model.updated_at = Set(now);
                model.update(&self.db).await?
            }
            None => {
                let model = global_settings::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    key: Set(key.to_owned()),
                    value: Set(value.to_owned()),
                    description: Set(description.map(ToOwned::to_owned)),
                    updated_at: Set(now),
                };
                model.insert(&self.db).await?
            }
        };
        Ok(model)
    }

    /// Inserts the documented defaults for any key that has no row yet.
    ///
    /// Existing rows are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn seed_defaults(&self) -> Result<usize, SettingsError> {
        let existing: Vec<String> = self.list().await?.into_iter().map(|row| row.key).collect();
        let mut inserted = 0;
        for (key, value, description) in CompanySettings::default_rows() {
            if existing.iter().any(|k| k == key) {
                continue;
            }
            let model = global_settings::ActiveModel {
                id: Set(Uuid::new_v4()),
                key: Set(key.to_owned()),
                value: Set(value),
                description: Set(Some(description.to_owned())),
                updated_at: Set(Utc::now().into()),
            };
            model.insert(&self.db).await?;
            inserted += 1;
        }
        Ok(inserted)
    }
}
