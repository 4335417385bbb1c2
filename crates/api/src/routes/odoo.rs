//! Odoo connection and hours sync routes.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::routes::parse_period;
use pulso_db::repositories::{OdooConnectionRepository, UpsertOdooConnectionInput};
use pulso_db::services::OdooSyncService;
use pulso_odoo::BillingType;
use pulso_shared::AppError;

/// Billing classifications pulled when the request does not narrow them.
const ALL_BILLING_TYPES: [BillingType; 4] = [
    BillingType::FixedPrice,
    BillingType::Timesheet,
    BillingType::Milestone,
    BillingType::Manual,
];

/// Creates the Odoo routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/odoo/connection",
            get(get_connection).put(upsert_connection),
        )
        .route("/odoo/test", post(test_connection))
        .route("/odoo/sync", post(sync_hours))
}

/// Request body for storing connection details.
#[derive(Debug, Deserialize)]
pub struct UpsertConnectionRequest {
    /// Odoo server base URL.
    pub url: String,
    /// Odoo database name.
    pub database: String,
    /// Login username.
    pub username: String,
    /// Plaintext password; stored encrypted, never returned.
    pub password: String,
}

/// Request body for triggering a sync run.
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    /// Month to sync.
    pub month: u32,
    /// Year to sync.
    pub year: i32,
    /// Billing classifications to include; all billable types when empty.
    #[serde(default)]
    pub billing_types: Vec<BillingType>,
}

/// GET `/odoo/connection` - The stored connection, password withheld.
async fn get_connection(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let repo = OdooConnectionRepository::new((*state.db).clone());
    let connection = repo.find_active().await?;
    Ok(Json(json!({ "connection": connection })))
}

/// PUT `/odoo/connection` - Store connection details, encrypting the
/// password before it touches the database.
async fn upsert_connection(
    State(state): State<AppState>,
    Json(payload): Json<UpsertConnectionRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.password.is_empty() {
        return Err(ApiError(AppError::Validation(
            "Odoo password must not be empty".to_owned(),
        )));
    }
    let encrypted_password = state
        .cipher
        .encrypt(&payload.password)
        .map_err(|e| ApiError(AppError::Internal(e.to_string())))?;

    let repo = OdooConnectionRepository::new((*state.db).clone());
    let connection = repo
        .upsert(UpsertOdooConnectionInput {
            url: payload.url,
            database: payload.database,
            username: payload.username,
            encrypted_password,
        })
        .await?;
    Ok(Json(json!({ "connection": connection })))
}

/// POST `/odoo/test` - Authenticate against the stored connection.
async fn test_connection(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let service = OdooSyncService::new(
        (*state.db).clone(),
        (*state.cipher).clone(),
        state.odoo_timeout,
    );
    match service.test_connection().await {
        Ok(department_count) => Ok(Json(json!({
            "success": true,
            "department_count": department_count,
        }))),
        Err(err) => Ok(Json(json!({ "success": false, "error": err.to_string() }))),
    }
}

/// POST `/odoo/sync` - Pull one month of billable hours and rerun the
/// result engine for every touched department.
///
/// Business failures come back as a structured outcome with
/// `success: false`; only infrastructure failures map to error statuses.
async fn sync_hours(
    State(state): State<AppState>,
    Json(payload): Json<SyncRequest>,
) -> ApiResult<impl IntoResponse> {
    let period = parse_period(payload.year, payload.month)?;
    let billing_types = if payload.billing_types.is_empty() {
        ALL_BILLING_TYPES.to_vec()
    } else {
        payload.billing_types
    };

    let service = OdooSyncService::new(
        (*state.db).clone(),
        (*state.cipher).clone(),
        state.odoo_timeout,
    );
    let outcome = service.sync_hours(period, &billing_types).await?;
    Ok(Json(json!(outcome)))
}
