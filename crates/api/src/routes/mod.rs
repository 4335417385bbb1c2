//! API route definitions.

use axum::Router;

use crate::AppState;
use crate::error::ApiError;
use pulso_core::fiscal::Period;
use pulso_shared::AppError;

pub mod calculations;
pub mod departments;
pub mod fixed_costs;
pub mod health;
pub mod hours;
pub mod objectives;
pub mod odoo;
pub mod retainers;
pub mod settings;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(departments::routes())
        .merge(hours::routes())
        .merge(objectives::routes())
        .merge(retainers::routes())
        .merge(fixed_costs::routes())
        .merge(settings::routes())
        .merge(calculations::routes())
        .merge(odoo::routes())
}

/// Builds a validated period from path-style year/month numbers.
pub(crate) fn parse_period(year: i32, month: u32) -> Result<Period, ApiError> {
    Period::new(month, year).map_err(|e| ApiError(AppError::Validation(e.to_string())))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(2026, 1)]
    #[case(2026, 12)]
    #[case(1999, 6)]
    fn test_parse_period_accepts_valid_months(#[case] year: i32, #[case] month: u32) {
        let period = parse_period(year, month).unwrap();
        assert_eq!(period.month, month);
        assert_eq!(period.year, year);
    }

    #[rstest]
    #[case(2026, 0)]
    #[case(2026, 13)]
    #[case(2026, 99)]
    fn test_parse_period_rejects_invalid_months(#[case] year: i32, #[case] month: u32) {
        let err = parse_period(year, month).unwrap_err();
        assert_eq!(err.0.status_code(), 400);
    }
}
