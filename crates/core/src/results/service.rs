//! Monthly result math.

use rust_decimal::Decimal;

use crate::hours::HoursService;

use super::types::{MonthlyResult, ResultInput};

/// Result service computing the monthly financial snapshot.
pub struct ResultService;

impl ResultService {
    /// Computes the monthly result for one department/month.
    ///
    /// Deterministic and free of I/O: calling it twice with the same
    /// inputs yields identical output. The orchestration layer loads the
    /// inputs and persists the outcome.
    #[must_use]
    pub fn compute(input: ResultInput) -> MonthlyResult {
        let plan = input.plan.unwrap_or_default();

        let actual_hours = plan.actual_billable_hours.unwrap_or(Decimal::ZERO);
        let revenue_from_hours = actual_hours * input.average_hourly_rate;
        let project_revenue = plan.project_revenue.unwrap_or(Decimal::ZERO);
        let total_revenue = revenue_from_hours + input.retainers_revenue + project_revenue;

        let performance = match input.objective {
            Some(objective) if objective > Decimal::ZERO => {
                Some((total_revenue / objective * Decimal::ONE_HUNDRED).round_dp(2))
            }
            _ => None,
        };

        let utilization_rate =
            HoursService::utilization_rate(actual_hours, plan.target_available_hours);

        MonthlyResult {
            planned_hours: plan.target_available_hours.and_then(positive),
            actual_hours: positive(actual_hours),
            hourly_rate: positive(input.average_hourly_rate),
            active_retainers: input.retainers_revenue,
            project_revenue: positive(project_revenue),
            revenue_from_hours: positive(revenue_from_hours),
            total_revenue,
            objective: input.objective.and_then(positive),
            performance: performance.and_then(non_negative),
            utilization_rate: utilization_rate.and_then(non_negative),
        }
    }
}

/// Store-only-if-positive gate.
fn positive(value: Decimal) -> Option<Decimal> {
    (value > Decimal::ZERO).then_some(value)
}

/// Store-only-if-non-negative gate.
fn non_negative(value: Decimal) -> Option<Decimal> {
    (value >= Decimal::ZERO).then_some(value)
}
