//! Monthly hours plan routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::routes::parse_period;
use pulso_db::repositories::{PlannedHoursRepository, UpsertPlannedHoursInput};
use pulso_db::services::CalculationService;

/// Creates the hours plan routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/departments/{id}/hours/{year}/{month}",
            get(get_hours).put(upsert_hours),
        )
        .route("/hours/{year}/{month}", get(list_hours_for_period))
}

/// Request body for upserting a monthly hours plan.
#[derive(Debug, Deserialize, Default)]
pub struct UpsertHoursRequest {
    /// Month-specific billable headcount.
    pub billable_headcount: Option<i32>,
    /// Month-specific target hours per person.
    pub target_hours_per_month: Option<Decimal>,
    /// Month-specific target utilization.
    pub target_utilization: Option<Decimal>,
    /// Explicit capacity override.
    pub target_available_hours: Option<Decimal>,
    /// Actual billable hours.
    pub actual_billable_hours: Option<Decimal>,
    /// One-off project revenue.
    pub project_revenue: Option<Decimal>,
}

/// GET `/departments/{id}/hours/{year}/{month}` - The plan row, if any.
async fn get_hours(
    State(state): State<AppState>,
    Path((id, year, month)): Path<(Uuid, i32, u32)>,
) -> ApiResult<impl IntoResponse> {
    let period = parse_period(year, month)?;
    let repo = PlannedHoursRepository::new((*state.db).clone());
    let plan = repo.find(id, period).await?;
    Ok(Json(json!({ "plan": plan })))
}

/// GET `/hours/{year}/{month}` - All plan rows for one month.
async fn list_hours_for_period(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<impl IntoResponse> {
    let period = parse_period(year, month)?;
    let repo = PlannedHoursRepository::new((*state.db).clone());
    let plans = repo.list_for_period(period).await?;
    Ok(Json(json!({ "plans": plans })))
}

/// PUT `/departments/{id}/hours/{year}/{month}` - Upsert the plan and
/// rerun the results around the month.
async fn upsert_hours(
    State(state): State<AppState>,
    Path((id, year, month)): Path<(Uuid, i32, u32)>,
    Json(payload): Json<UpsertHoursRequest>,
) -> ApiResult<impl IntoResponse> {
    let period = parse_period(year, month)?;
    let repo = PlannedHoursRepository::new((*state.db).clone());
    let plan = repo
        .upsert(
            id,
            period,
            UpsertPlannedHoursInput {
                billable_headcount: payload.billable_headcount,
                target_hours_per_month: payload.target_hours_per_month,
                target_utilization: payload.target_utilization,
                target_available_hours: payload.target_available_hours,
                actual_billable_hours: payload.actual_billable_hours,
                project_revenue: payload.project_revenue,
            },
        )
        .await?;

    // The stored results must track the plan; failures are logged, the
    // write itself stands.
    let calculation = CalculationService::new((*state.db).clone());
    if let Err(err) = calculation.recalculate_window(id, period).await {
        warn!(department_id = %id, %period, error = %err, "result refresh failed");
    }

    Ok(Json(json!({ "plan": plan })))
}
