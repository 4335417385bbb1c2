//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for departments, hours, objectives, retainers,
//!   fixed costs, settings, and the result engine
//! - Odoo connection management and sync endpoints
//! - Response types and error mapping

pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use pulso_odoo::CredentialCipher;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Cipher for the stored Odoo password.
    pub cipher: Arc<CredentialCipher>,
    /// Per-RPC timeout for Odoo calls.
    pub odoo_timeout: Duration,
}

impl AppState {
    /// Creates the application state.
    #[must_use]
    pub fn new(db: DatabaseConnection, cipher: CredentialCipher, odoo_timeout: Duration) -> Self {
        Self {
            db: Arc::new(db),
            cipher: Arc::new(cipher),
            odoo_timeout,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
