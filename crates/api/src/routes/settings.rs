//! Global settings routes.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::error::ApiResult;
use pulso_db::repositories::SettingsRepository;

/// Creates the settings routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(list_settings).put(update_settings))
        .route("/settings/resolved", get(resolved_settings))
}

/// One key/value pair to store.
#[derive(Debug, Deserialize)]
pub struct SettingUpdate {
    /// Setting key.
    pub key: String,
    /// Raw string value.
    pub value: String,
}

/// Request body for updating settings.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    /// Pairs to store.
    pub settings: Vec<SettingUpdate>,
}

/// GET `/settings` - Raw stored rows.
async fn list_settings(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let repo = SettingsRepository::new((*state.db).clone());
    let settings = repo.list().await?;
    Ok(Json(json!({ "settings": settings })))
}

/// GET `/settings/resolved` - Settings with defaults applied.
///
/// Fails with a validation error when a stored value is malformed; a
/// broken configuration must surface, not default away.
async fn resolved_settings(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let repo = SettingsRepository::new((*state.db).clone());
    let settings = repo.company_settings().await?;
    Ok(Json(json!(settings)))
}

/// PUT `/settings` - Store one or more values.
async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = SettingsRepository::new((*state.db).clone());
    for update in payload.settings {
        repo.set(&update.key, &update.value, None).await?;
    }
    let settings = repo.list().await?;
    Ok(Json(json!({ "settings": settings })))
}
