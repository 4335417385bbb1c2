//! Monthly result types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The hours plan loaded for the month, when one exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanSnapshot {
    /// Planned capacity for the month (derived or overridden).
    pub target_available_hours: Option<Decimal>,
    /// Actual billable hours worked.
    pub actual_billable_hours: Option<Decimal>,
    /// One-off project revenue booked against the month.
    pub project_revenue: Option<Decimal>,
}

/// Inputs to the monthly result calculation for one department/month.
#[derive(Debug, Clone, Copy)]
pub struct ResultInput {
    /// Department average hourly rate.
    pub average_hourly_rate: Decimal,
    /// Hours plan for the month, if any.
    pub plan: Option<PlanSnapshot>,
    /// Summed monthly revenue of retainers active in the month.
    pub retainers_revenue: Decimal,
    /// Revenue objective for the month, if configured.
    pub objective: Option<Decimal>,
}

/// The computed monthly result.
///
/// Two fields are always present, even at exactly zero: `active_retainers`
/// and `total_revenue` are the primary KPIs and a month with no activity
/// still gets an explicit zero. Every other field is an optional
/// enrichment: absent means "never configured", which downstream
/// aggregation must be able to tell apart from "configured and zero".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyResult {
    /// Planned capacity; stored only when positive.
    pub planned_hours: Option<Decimal>,
    /// Actual billable hours; stored only when positive.
    pub actual_hours: Option<Decimal>,
    /// Hourly rate used; stored only when positive.
    pub hourly_rate: Option<Decimal>,
    /// Retainer revenue for the month; always stored.
    pub active_retainers: Decimal,
    /// Project revenue; stored only when positive.
    pub project_revenue: Option<Decimal>,
    /// Hours x rate; stored only when positive.
    pub revenue_from_hours: Option<Decimal>,
    /// Total revenue for the month; always stored.
    pub total_revenue: Decimal,
    /// Objective for the month; stored only when positive.
    pub objective: Option<Decimal>,
    /// Performance against the objective in percent; stored only when
    /// non-negative.
    pub performance: Option<Decimal>,
    /// Utilization against planned capacity; stored only when non-negative.
    pub utilization_rate: Option<Decimal>,
}
