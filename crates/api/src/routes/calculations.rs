//! Result engine and annual metrics routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::routes::parse_period;
use pulso_db::repositories::ResultRepository;
use pulso_db::services::CalculationService;

/// Creates the calculation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/departments/{id}/results/{year}/{month}",
            get(get_result).post(calculate_result),
        )
        .route("/departments/{id}/results/{year}", get(list_results))
        .route(
            "/departments/{id}/recalculate/{year}",
            post(recalculate_year),
        )
        .route("/results/{year}/{month}", get(results_for_period))
        .route(
            "/departments/{id}/annual-metrics/{year}/{month}",
            get(preview_annual_metrics).post(calculate_annual_metrics),
        )
}

/// GET `/departments/{id}/results/{year}/{month}` - The stored result.
async fn get_result(
    State(state): State<AppState>,
    Path((id, year, month)): Path<(Uuid, i32, u32)>,
) -> ApiResult<impl IntoResponse> {
    let period = parse_period(year, month)?;
    let repo = ResultRepository::new((*state.db).clone());
    let result = repo.find(id, period).await?;
    Ok(Json(json!({ "result": result })))
}

/// GET `/departments/{id}/results/{year}` - A year of stored results
/// plus the annual revenue total.
async fn list_results(
    State(state): State<AppState>,
    Path((id, year)): Path<(Uuid, i32)>,
) -> ApiResult<impl IntoResponse> {
    let repo = ResultRepository::new((*state.db).clone());
    let results = repo.list_for_year(id, year).await?;
    let calculation = CalculationService::new((*state.db).clone());
    let annual_total = calculation.annual_revenue_total(id, year).await?;
    Ok(Json(json!({ "results": results, "annual_total": annual_total })))
}

/// GET `/results/{year}/{month}` - One month across departments.
async fn results_for_period(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<impl IntoResponse> {
    let period = parse_period(year, month)?;
    let repo = ResultRepository::new((*state.db).clone());
    let results = repo.list_for_period(period).await?;
    Ok(Json(json!({ "results": results })))
}

/// POST `/departments/{id}/results/{year}/{month}` - Recompute and store
/// one month.
async fn calculate_result(
    State(state): State<AppState>,
    Path((id, year, month)): Path<(Uuid, i32, u32)>,
) -> ApiResult<impl IntoResponse> {
    let period = parse_period(year, month)?;
    let calculation = CalculationService::new((*state.db).clone());
    let result = calculation.calculate_department_result(id, period).await?;
    Ok(Json(json!({ "result": result })))
}

/// POST `/departments/{id}/recalculate/{year}` - Recompute all twelve
/// months; failing months are reported, not fatal.
async fn recalculate_year(
    State(state): State<AppState>,
    Path((id, year)): Path<(Uuid, i32)>,
) -> ApiResult<impl IntoResponse> {
    let calculation = CalculationService::new((*state.db).clone());
    let outcome = calculation.recalculate_year(id, year).await?;
    let failed: Vec<_> = outcome
        .failed
        .iter()
        .map(|(month, message)| json!({ "month": month, "error": message }))
        .collect();
    Ok(Json(json!({
        "succeeded": outcome.succeeded,
        "failed": failed,
    })))
}

/// GET `/departments/{id}/annual-metrics/{year}/{month}` - Preview the
/// annual metrics anchored at a reference month, without storing.
async fn preview_annual_metrics(
    State(state): State<AppState>,
    Path((id, year, month)): Path<(Uuid, i32, u32)>,
) -> ApiResult<impl IntoResponse> {
    let reference = parse_period(year, month)?;
    let calculation = CalculationService::new((*state.db).clone());
    let metrics = calculation.preview_annual_metrics(id, reference).await?;
    Ok(Json(json!(metrics)))
}

/// POST `/departments/{id}/annual-metrics/{year}/{month}` - Compute and
/// store the annual metrics.
async fn calculate_annual_metrics(
    State(state): State<AppState>,
    Path((id, year, month)): Path<(Uuid, i32, u32)>,
) -> ApiResult<impl IntoResponse> {
    let reference = parse_period(year, month)?;
    let calculation = CalculationService::new((*state.db).clone());
    let metrics = calculation.calculate_annual_metrics(id, reference).await?;
    Ok(Json(json!(metrics)))
}
