//! Audit log repository.
//!
//! Best-effort trail of entity mutations. A failed audit write is logged
//! and swallowed; it must never fail the mutation it describes.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::entities::audit_logs;

/// One audit trail entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Acting user, when known.
    pub user_id: Option<Uuid>,
    /// Kind of entity touched ("department", "retainer", ...).
    pub entity_type: String,
    /// Identifier of the touched entity.
    pub entity_id: String,
    /// What happened ("create", "update", "delete", "sync").
    pub action: String,
    /// Serialized state before the change.
    pub old_value: Option<JsonValue>,
    /// Serialized state after the change.
    pub new_value: Option<JsonValue>,
    /// Related department, when applicable.
    pub department_id: Option<Uuid>,
}

/// Audit log repository.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an audit entry, swallowing any database error.
    pub async fn record(&self, entry: AuditEntry) {
        let model = audit_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(entry.user_id),
            entity_type: Set(entry.entity_type),
            entity_id: Set(entry.entity_id),
            action: Set(entry.action),
            old_value: Set(entry.old_value),
            new_value: Set(entry.new_value),
            department_id: Set(entry.department_id),
            created_at: Set(Utc::now().into()),
        };
        if let Err(err) = model.insert(&self.db).await {
            tracing::warn!(error = %err, "failed to write audit log entry");
        }
    }
}
