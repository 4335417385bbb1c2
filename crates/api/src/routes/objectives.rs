//! Monthly objective routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::routes::parse_period;
use pulso_db::repositories::{ObjectiveRepository, UpsertObjectiveInput};
use pulso_db::services::CalculationService;

/// Creates the objective routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/departments/{id}/objectives/{year}/{month}",
            get(get_objective).put(upsert_objective),
        )
        .route("/departments/{id}/objectives/{year}", get(list_objectives))
        .route("/objectives/{id}", delete(delete_objective))
}

/// Request body for setting a monthly objective.
#[derive(Debug, Deserialize)]
pub struct UpsertObjectiveRequest {
    /// Revenue target for the month.
    pub target_value: Decimal,
}

/// GET `/departments/{id}/objectives/{year}/{month}` - One objective.
async fn get_objective(
    State(state): State<AppState>,
    Path((id, year, month)): Path<(Uuid, i32, u32)>,
) -> ApiResult<impl IntoResponse> {
    let period = parse_period(year, month)?;
    let repo = ObjectiveRepository::new((*state.db).clone());
    let objective = repo.find(id, period).await?;
    Ok(Json(json!({ "objective": objective })))
}

/// GET `/departments/{id}/objectives/{year}` - A year of objectives.
async fn list_objectives(
    State(state): State<AppState>,
    Path((id, year)): Path<(Uuid, i32)>,
) -> ApiResult<impl IntoResponse> {
    let repo = ObjectiveRepository::new((*state.db).clone());
    let objectives = repo.list_for_year(id, year).await?;
    Ok(Json(json!({ "objectives": objectives })))
}

/// PUT `/departments/{id}/objectives/{year}/{month}` - Upsert and rerun
/// the results around the month.
async fn upsert_objective(
    State(state): State<AppState>,
    Path((id, year, month)): Path<(Uuid, i32, u32)>,
    Json(payload): Json<UpsertObjectiveRequest>,
) -> ApiResult<impl IntoResponse> {
    let period = parse_period(year, month)?;
    let repo = ObjectiveRepository::new((*state.db).clone());
    let objective = repo
        .upsert(UpsertObjectiveInput {
            department_id: id,
            period,
            target_value: payload.target_value,
        })
        .await?;

    let calculation = CalculationService::new((*state.db).clone());
    if let Err(err) = calculation.recalculate_window(id, period).await {
        warn!(department_id = %id, %period, error = %err, "result refresh failed");
    }

    Ok(Json(json!({ "objective": objective })))
}

/// DELETE `/objectives/{id}` - Remove an objective.
async fn delete_objective(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = ObjectiveRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
