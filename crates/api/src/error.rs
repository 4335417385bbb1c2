//! Error mapping from repository and service errors to HTTP responses.
//!
//! Every handler funnels failures through [`ApiError`], which wraps the
//! shared [`AppError`] taxonomy and renders the uniform
//! `{ "error": CODE, "message": ... }` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use pulso_db::repositories::{
    DepartmentError, FixedCostError, ObjectiveError, OdooConnectionError, PlannedHoursError,
    ResultError, RetainerError, SettingsError,
};
use pulso_db::services::{CalculationError, SyncError};
use pulso_shared::AppError;

/// HTTP-facing error wrapper.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        let body = json!({
            "error": self.0.error_code(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DepartmentError> for ApiError {
    fn from(err: DepartmentError) -> Self {
        let app = match err {
            DepartmentError::NotFound(id) => AppError::NotFound(format!("department {id}")),
            DepartmentError::DuplicateName(name) => {
                AppError::Conflict(format!("department name {name:?} already exists"))
            }
            DepartmentError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<PlannedHoursError> for ApiError {
    fn from(err: PlannedHoursError) -> Self {
        let app = match err {
            PlannedHoursError::NotFound { .. } => AppError::NotFound(err.to_string()),
            PlannedHoursError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<ObjectiveError> for ApiError {
    fn from(err: ObjectiveError) -> Self {
        let app = match err {
            ObjectiveError::NotFound(id) => AppError::NotFound(format!("objective {id}")),
            ObjectiveError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<RetainerError> for ApiError {
    fn from(err: RetainerError) -> Self {
        let app = match err {
            RetainerError::NotFound(id) => AppError::NotFound(format!("retainer {id}")),
            RetainerError::CatalogNotFound(id) => {
                AppError::NotFound(format!("catalog entry {id}"))
            }
            RetainerError::DuplicateCatalogName(name) => {
                AppError::Conflict(format!("catalog name {name:?} already exists"))
            }
            RetainerError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<FixedCostError> for ApiError {
    fn from(err: FixedCostError) -> Self {
        let app = match err {
            FixedCostError::NotFound(id) => AppError::NotFound(format!("fixed cost {id}")),
            FixedCostError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        let app = match err {
            SettingsError::Malformed(e) => AppError::Validation(e.to_string()),
            SettingsError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<ResultError> for ApiError {
    fn from(err: ResultError) -> Self {
        let ResultError::Database(e) = err;
        Self(AppError::Database(e.to_string()))
    }
}

impl From<OdooConnectionError> for ApiError {
    fn from(err: OdooConnectionError) -> Self {
        let app = match err {
            OdooConnectionError::NotConfigured => AppError::NotFound(err.to_string()),
            OdooConnectionError::Database(e) => AppError::Database(e.to_string()),
        };
        Self(app)
    }
}

impl From<CalculationError> for ApiError {
    fn from(err: CalculationError) -> Self {
        match err {
            CalculationError::Department(e) => e.into(),
            CalculationError::PlannedHours(e) => e.into(),
            CalculationError::Retainer(e) => e.into(),
            CalculationError::Objective(e) => e.into(),
            CalculationError::FixedCost(e) => e.into(),
            CalculationError::Settings(e) => e.into(),
            CalculationError::Result(e) => e.into(),
            CalculationError::Metrics(e) => Self(AppError::BusinessRule(e.to_string())),
        }
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Connection(e) => e.into(),
            SyncError::Department(e) => e.into(),
            SyncError::PlannedHours(e) => e.into(),
            SyncError::Calculation(e) => e.into(),
            SyncError::Crypto(e) => Self(AppError::Internal(e.to_string())),
            SyncError::Odoo(e) => Self(AppError::ExternalService(e.to_string())),
        }
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_department_not_found_maps_to_404() {
        let err: ApiError = DepartmentError::NotFound(Uuid::nil()).into();
        assert_eq!(err.0.status_code(), 404);
        assert_eq!(err.0.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_duplicate_name_maps_to_conflict() {
        let err: ApiError = DepartmentError::DuplicateName("Design".into()).into();
        assert_eq!(err.0.status_code(), 409);
    }

    #[test]
    fn test_odoo_failure_maps_to_external_service() {
        let err: ApiError = SyncError::Odoo(pulso_odoo::OdooError::InvalidCredentials).into();
        assert_eq!(err.0.error_code(), "EXTERNAL_SERVICE_ERROR");
    }
}
