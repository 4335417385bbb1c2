//! Fixed cost routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::routes::parse_period;
use pulso_db::entities::sea_orm_active_enums::FixedCostCategory;
use pulso_db::repositories::{
    AuditEntry, AuditRepository, CreateFixedCostInput, FixedCostRepository, UpdateFixedCostInput,
};
use pulso_shared::AppError;

/// Creates the fixed cost routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fixed-costs", get(list_fixed_costs))
        .route("/fixed-costs", post(create_fixed_cost))
        .route("/fixed-costs/{id}", put(update_fixed_cost))
        .route("/fixed-costs/{id}", delete(delete_fixed_cost))
        .route("/fixed-costs/{year}/{month}", get(costs_for_month))
}

/// Request body for creating a fixed cost.
#[derive(Debug, Deserialize)]
pub struct CreateFixedCostRequest {
    /// Cost name.
    pub name: String,
    /// Category: aluguel, utilidades, software, viaturas, outros.
    pub category: String,
    /// Monthly amount.
    pub monthly_amount: Decimal,
    /// Description.
    pub description: Option<String>,
    /// Validity start.
    pub start_date: NaiveDate,
    /// Validity end.
    pub end_date: Option<NaiveDate>,
}

/// Request body for updating a fixed cost.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateFixedCostRequest {
    /// New name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New monthly amount.
    pub monthly_amount: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
    /// New validity start.
    pub start_date: Option<NaiveDate>,
    /// New validity end.
    pub end_date: Option<NaiveDate>,
    /// New active flag.
    pub is_active: Option<bool>,
}

fn parse_category(s: &str) -> Result<FixedCostCategory, ApiError> {
    match s {
        "aluguel" => Ok(FixedCostCategory::Aluguel),
        "utilidades" => Ok(FixedCostCategory::Utilidades),
        "software" => Ok(FixedCostCategory::Software),
        "viaturas" => Ok(FixedCostCategory::Viaturas),
        "outros" => Ok(FixedCostCategory::Outros),
        other => Err(ApiError(AppError::Validation(format!(
            "Unknown fixed cost category: {other:?}"
        )))),
    }
}

/// GET `/fixed-costs` - All fixed costs.
async fn list_fixed_costs(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let repo = FixedCostRepository::new((*state.db).clone());
    let costs = repo.list().await?;
    Ok(Json(json!({ "fixed_costs": costs })))
}

/// GET `/fixed-costs/{year}/{month}` - Costs active in a month plus the
/// monthly and annualized totals.
async fn costs_for_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<impl IntoResponse> {
    let period = parse_period(year, month)?;
    let repo = FixedCostRepository::new((*state.db).clone());
    let costs = repo.active_for_month(period).await?;
    let monthly_total: Decimal = costs.iter().map(|c| c.monthly_amount).sum();
    Ok(Json(json!({
        "fixed_costs": costs,
        "monthly_total": monthly_total,
        "annual_total": monthly_total * Decimal::from(12),
    })))
}

/// POST `/fixed-costs` - Create a fixed cost.
async fn create_fixed_cost(
    State(state): State<AppState>,
    Json(payload): Json<CreateFixedCostRequest>,
) -> ApiResult<impl IntoResponse> {
    let category = parse_category(&payload.category)?;
    let repo = FixedCostRepository::new((*state.db).clone());
    let cost = repo
        .create(CreateFixedCostInput {
            name: payload.name,
            category,
            monthly_amount: payload.monthly_amount,
            description: payload.description,
            start_date: payload.start_date,
            end_date: payload.end_date,
        })
        .await?;

    AuditRepository::new((*state.db).clone())
        .record(AuditEntry {
            user_id: None,
            entity_type: "fixed_cost".to_owned(),
            entity_id: cost.id.to_string(),
            action: "create".to_owned(),
            old_value: None,
            new_value: serde_json::to_value(&cost).ok(),
            department_id: None,
        })
        .await;

    Ok((StatusCode::CREATED, Json(json!(cost))))
}

/// PUT `/fixed-costs/{id}` - Update a fixed cost.
async fn update_fixed_cost(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFixedCostRequest>,
) -> ApiResult<impl IntoResponse> {
    let category = payload.category.as_deref().map(parse_category).transpose()?;
    let repo = FixedCostRepository::new((*state.db).clone());
    let cost = repo
        .update(
            id,
            UpdateFixedCostInput {
                name: payload.name,
                category,
                monthly_amount: payload.monthly_amount,
                description: payload.description.map(Some),
                start_date: payload.start_date,
                end_date: payload.end_date.map(Some),
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(json!(cost)))
}

/// DELETE `/fixed-costs/{id}` - Remove a fixed cost.
async fn delete_fixed_cost(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = FixedCostRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("aluguel").unwrap(), FixedCostCategory::Aluguel);
        assert_eq!(
            parse_category("utilidades").unwrap(),
            FixedCostCategory::Utilidades
        );
        assert_eq!(
            parse_category("software").unwrap(),
            FixedCostCategory::Software
        );
        assert_eq!(
            parse_category("viaturas").unwrap(),
            FixedCostCategory::Viaturas
        );
        assert_eq!(parse_category("outros").unwrap(), FixedCostCategory::Outros);
        assert!(parse_category("rent").is_err());
        assert!(parse_category("").is_err());
    }
}
