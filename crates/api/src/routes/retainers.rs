//! Retainer catalog and contract routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::routes::parse_period;
use pulso_core::fiscal::Period;
use pulso_db::repositories::{
    AuditEntry, AuditRepository, CreateCatalogInput, CreateRetainerInput, RetainerRepository,
    UpdateCatalogInput, UpdateRetainerInput,
};
use pulso_db::services::CalculationService;

/// Creates the retainer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments/{id}/retainers", get(list_retainers))
        .route("/retainers", post(create_retainer))
        .route("/retainers/{id}", put(update_retainer))
        .route("/retainers/{id}", delete(delete_retainer))
        .route(
            "/departments/{id}/retainers/{year}/{month}",
            get(active_retainers),
        )
        .route("/retainer-catalog", get(list_catalog))
        .route("/retainer-catalog", post(create_catalog))
        .route("/retainer-catalog/{id}", put(update_catalog))
        .route("/retainer-catalog/{id}", delete(delete_catalog))
}

/// Request body for creating a contract.
#[derive(Debug, Deserialize)]
pub struct CreateRetainerRequest {
    /// Department ID.
    pub department_id: Uuid,
    /// Catalog template this contract came from, if any.
    pub catalog_id: Option<Uuid>,
    /// Contract name.
    pub name: String,
    /// Contract type label.
    pub contract_type: String,
    /// Price per unit per month.
    pub monthly_price: Decimal,
    /// Contracted units.
    pub quantity: Option<i32>,
    /// Contract start date.
    pub start_date: NaiveDate,
    /// Contract end date.
    pub end_date: Option<NaiveDate>,
    /// Notes.
    pub notes: Option<String>,
}

/// Request body for updating a contract.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateRetainerRequest {
    /// New name.
    pub name: Option<String>,
    /// New contract type.
    pub contract_type: Option<String>,
    /// New price.
    pub monthly_price: Option<Decimal>,
    /// New quantity.
    pub quantity: Option<i32>,
    /// New start date.
    pub start_date: Option<NaiveDate>,
    /// New end date.
    pub end_date: Option<NaiveDate>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New notes.
    pub notes: Option<String>,
}

/// Request body for creating a catalog template.
#[derive(Debug, Deserialize)]
pub struct CreateCatalogRequest {
    /// Template name.
    pub name: String,
    /// Owning department.
    pub department_id: Uuid,
    /// Price per month.
    pub monthly_price: Decimal,
    /// Included hours per month.
    pub hours_per_month: Decimal,
    /// Internal delivery cost per hour.
    pub internal_hourly_cost: Option<Decimal>,
    /// Base hours of the underlying package.
    pub base_hours: Option<Decimal>,
    /// Base price of the underlying package.
    pub base_price: Option<Decimal>,
}

/// Request body for updating a catalog template.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateCatalogRequest {
    /// New name.
    pub name: Option<String>,
    /// New price.
    pub monthly_price: Option<Decimal>,
    /// New included hours.
    pub hours_per_month: Option<Decimal>,
    /// New internal hourly cost.
    pub internal_hourly_cost: Option<Decimal>,
}

// ============================================================================
// Contracts
// ============================================================================

/// GET `/departments/{id}/retainers` - All contracts of a department.
async fn list_retainers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = RetainerRepository::new((*state.db).clone());
    let retainers = repo.list_for_department(id).await?;
    Ok(Json(json!({ "retainers": retainers })))
}

/// GET `/departments/{id}/retainers/{year}/{month}` - Contracts active in
/// one month.
async fn active_retainers(
    State(state): State<AppState>,
    Path((id, year, month)): Path<(Uuid, i32, u32)>,
) -> ApiResult<impl IntoResponse> {
    let period = parse_period(year, month)?;
    let repo = RetainerRepository::new((*state.db).clone());
    let retainers = repo.active_for_month(id, period).await?;
    let revenue: Decimal = retainers.iter().map(|r| r.monthly_revenue).sum();
    Ok(Json(json!({ "retainers": retainers, "monthly_revenue": revenue })))
}

/// POST `/retainers` - Create a contract and refresh affected months.
async fn create_retainer(
    State(state): State<AppState>,
    Json(payload): Json<CreateRetainerRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = RetainerRepository::new((*state.db).clone());
    let retainer = repo
        .create(CreateRetainerInput {
            department_id: payload.department_id,
            catalog_id: payload.catalog_id,
            name: payload.name,
            contract_type: payload.contract_type,
            monthly_price: payload.monthly_price,
            quantity: payload.quantity,
            start_date: payload.start_date,
            end_date: payload.end_date,
            notes: payload.notes,
        })
        .await?;

    refresh_window(&state, retainer.department_id, retainer.start_date).await;
    record_audit(&state, &retainer, "create").await;

    Ok((StatusCode::CREATED, Json(json!(retainer))))
}

/// PUT `/retainers/{id}` - Update a contract and refresh affected months.
async fn update_retainer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRetainerRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = RetainerRepository::new((*state.db).clone());
    let retainer = repo
        .update(
            id,
            UpdateRetainerInput {
                name: payload.name,
                contract_type: payload.contract_type,
                monthly_price: payload.monthly_price,
                quantity: payload.quantity,
                start_date: payload.start_date,
                end_date: payload.end_date.map(Some),
                is_active: payload.is_active,
                notes: payload.notes.map(Some),
            },
        )
        .await?;

    refresh_window(&state, retainer.department_id, retainer.start_date).await;
    record_audit(&state, &retainer, "update").await;

    Ok(Json(json!(retainer)))
}

/// DELETE `/retainers/{id}` - Remove a contract and refresh affected
/// months.
async fn delete_retainer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = RetainerRepository::new((*state.db).clone());
    let retainer = repo.get(id).await?;
    repo.delete(id).await?;

    refresh_window(&state, retainer.department_id, retainer.start_date).await;
    record_audit(&state, &retainer, "delete").await;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Catalog
// ============================================================================

/// GET `/retainer-catalog` - All templates.
async fn list_catalog(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let repo = RetainerRepository::new((*state.db).clone());
    let catalog = repo.list_catalog().await?;
    Ok(Json(json!({ "catalog": catalog })))
}

/// POST `/retainer-catalog` - Create a template.
async fn create_catalog(
    State(state): State<AppState>,
    Json(payload): Json<CreateCatalogRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = RetainerRepository::new((*state.db).clone());
    let entry = repo
        .create_catalog(CreateCatalogInput {
            name: payload.name,
            department_id: payload.department_id,
            monthly_price: payload.monthly_price,
            hours_per_month: payload.hours_per_month,
            internal_hourly_cost: payload.internal_hourly_cost,
            base_hours: payload.base_hours,
            base_price: payload.base_price,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(json!(entry))))
}

/// PUT `/retainer-catalog/{id}` - Update a template.
async fn update_catalog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCatalogRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = RetainerRepository::new((*state.db).clone());
    let entry = repo
        .update_catalog(
            id,
            UpdateCatalogInput {
                name: payload.name,
                monthly_price: payload.monthly_price,
                hours_per_month: payload.hours_per_month,
                internal_hourly_cost: payload.internal_hourly_cost.map(Some),
            },
        )
        .await?;
    Ok(Json(json!(entry)))
}

/// DELETE `/retainer-catalog/{id}` - Remove a template.
async fn delete_catalog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = RetainerRepository::new((*state.db).clone());
    repo.delete_catalog(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Helpers
// ============================================================================

/// Reruns the result engine for the months a contract change can touch:
/// the anchor month plus the three after it.
async fn refresh_window(state: &AppState, department_id: Uuid, start_date: NaiveDate) {
    let start = window_anchor(start_date, Period::current());
    let calculation = CalculationService::new((*state.db).clone());
    if let Err(err) = calculation.recalculate_window(department_id, start).await {
        warn!(%department_id, error = %err, "window recalculation failed");
    }
}

/// Anchor month for a contract-triggered recalculation.
///
/// An ongoing contract dated in the past still affects the current
/// month's stored result, so the window never starts before the current
/// month; a future-dated contract starts its window where the contract
/// does.
fn window_anchor(start_date: NaiveDate, current: Period) -> Period {
    match Period::new(start_date.month(), start_date.year()) {
        Ok(start) if (start.year, start.month) > (current.year, current.month) => start,
        _ => current,
    }
}

/// Records a contract mutation in the audit trail.
async fn record_audit(
    state: &AppState,
    retainer: &pulso_db::entities::retainers::Model,
    action: &str,
) {
    AuditRepository::new((*state.db).clone())
        .record(AuditEntry {
            user_id: None,
            entity_type: "retainer".to_owned(),
            entity_id: retainer.id.to_string(),
            action: action.to_owned(),
            old_value: None,
            new_value: serde_json::to_value(retainer).ok(),
            department_id: Some(retainer.department_id),
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn p(m: u32, y: i32) -> Period {
        Period::new(m, y).unwrap()
    }

    #[test]
    fn test_past_dated_contract_anchors_at_current_month() {
        // Editing an ongoing contract must refresh the month being lived
        // in, not the months around its long-gone start date.
        assert_eq!(window_anchor(d(2025, 3, 15), p(8, 2026)), p(8, 2026));
    }

    #[test]
    fn test_current_month_contract_anchors_at_current_month() {
        assert_eq!(window_anchor(d(2026, 8, 31), p(8, 2026)), p(8, 2026));
    }

    #[test]
    fn test_future_dated_contract_anchors_at_start_month() {
        assert_eq!(window_anchor(d(2026, 11, 1), p(8, 2026)), p(11, 2026));
    }

    #[test]
    fn test_anchor_compares_across_years() {
        assert_eq!(window_anchor(d(2027, 1, 1), p(12, 2026)), p(1, 2027));
        assert_eq!(window_anchor(d(2026, 12, 1), p(1, 2027)), p(1, 2027));
    }
}
