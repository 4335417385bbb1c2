//! Department management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use pulso_core::fiscal::Period;
use pulso_db::repositories::{
    AuditEntry, AuditRepository, CreateDepartmentInput, DepartmentRepository,
    UpdateDepartmentInput,
};
use pulso_db::services::CalculationService;

/// Creates the department routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list_departments))
        .route("/departments", post(create_department))
        .route("/departments/{id}", get(get_department))
        .route("/departments/{id}", put(update_department))
        .route("/departments/{id}", delete(delete_department))
}

/// Query for listing departments.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Include deactivated departments.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request body for creating a department.
#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    /// Department name.
    pub name: String,
    /// Short code; generated from the name when absent.
    pub code: Option<String>,
    /// Billable headcount.
    pub billable_headcount: Option<i32>,
    /// Monthly cost per person, overriding the company default.
    pub cost_per_person_per_month: Option<Decimal>,
    /// Target utilization fraction.
    pub target_utilization: Option<Decimal>,
    /// Average hourly rate.
    pub average_hourly_rate: Option<Decimal>,
}

/// Request body for updating a department.
#[derive(Debug, Deserialize)]
pub struct UpdateDepartmentRequest {
    /// New name.
    pub name: Option<String>,
    /// New code.
    pub code: Option<String>,
    /// New billable headcount.
    pub billable_headcount: Option<i32>,
    /// New monthly cost per person.
    pub cost_per_person_per_month: Option<Decimal>,
    /// New target utilization.
    pub target_utilization: Option<Decimal>,
    /// New average hourly rate.
    pub average_hourly_rate: Option<Decimal>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// GET `/departments` - List departments.
async fn list_departments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = DepartmentRepository::new((*state.db).clone());
    let departments = repo.list(query.include_inactive).await?;
    Ok(Json(json!({ "departments": departments })))
}

/// GET `/departments/{id}` - Get one department.
async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = DepartmentRepository::new((*state.db).clone());
    let department = repo.get(id).await?;
    Ok(Json(json!(department)))
}

/// POST `/departments` - Create a department.
///
/// Annual metrics for the new department are derived immediately, best
/// effort: a metrics failure (e.g. margin misconfiguration) does not
/// undo the creation.
async fn create_department(
    State(state): State<AppState>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = DepartmentRepository::new((*state.db).clone());
    let department = repo
        .create(CreateDepartmentInput {
            name: payload.name,
            code: payload.code,
            billable_headcount: payload.billable_headcount,
            cost_per_person_per_month: payload.cost_per_person_per_month,
            target_utilization: payload.target_utilization,
            average_hourly_rate: payload.average_hourly_rate,
        })
        .await?;
    info!(department_id = %department.id, name = %department.name, "department created");

    refresh_annual_metrics(&state, department.id).await;

    AuditRepository::new((*state.db).clone())
        .record(AuditEntry {
            user_id: None,
            entity_type: "department".to_owned(),
            entity_id: department.id.to_string(),
            action: "create".to_owned(),
            old_value: None,
            new_value: serde_json::to_value(&department).ok(),
            department_id: Some(department.id),
        })
        .await;

    Ok((StatusCode::CREATED, Json(json!(department))))
}

/// PUT `/departments/{id}` - Update a department.
async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDepartmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = DepartmentRepository::new((*state.db).clone());
    let before = repo.get(id).await?;
    let department = repo
        .update(
            id,
            UpdateDepartmentInput {
                name: payload.name,
                code: payload.code,
                billable_headcount: payload.billable_headcount,
                cost_per_person_per_month: payload.cost_per_person_per_month.map(Some),
                target_utilization: payload.target_utilization,
                average_hourly_rate: payload.average_hourly_rate,
                is_active: payload.is_active,
            },
        )
        .await?;

    refresh_annual_metrics(&state, id).await;

    AuditRepository::new((*state.db).clone())
        .record(AuditEntry {
            user_id: None,
            entity_type: "department".to_owned(),
            entity_id: id.to_string(),
            action: "update".to_owned(),
            old_value: serde_json::to_value(&before).ok(),
            new_value: serde_json::to_value(&department).ok(),
            department_id: Some(id),
        })
        .await;

    Ok(Json(json!(department)))
}

/// DELETE `/departments/{id}` - Delete a department and its dependents.
async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let repo = DepartmentRepository::new((*state.db).clone());
    let before = repo.get(id).await?;
    repo.delete(id).await?;
    info!(department_id = %id, "department deleted");

    AuditRepository::new((*state.db).clone())
        .record(AuditEntry {
            user_id: None,
            entity_type: "department".to_owned(),
            entity_id: id.to_string(),
            action: "delete".to_owned(),
            old_value: serde_json::to_value(&before).ok(),
            new_value: None,
            department_id: Some(id),
        })
        .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Rederives annual metrics after a department change, best effort.
async fn refresh_annual_metrics(state: &AppState, department_id: Uuid) {
    let calculation = CalculationService::new((*state.db).clone());
    if let Err(err) = calculation
        .calculate_annual_metrics(department_id, Period::current())
        .await
    {
        warn!(%department_id, error = %err, "annual metrics refresh failed");
    }
}
