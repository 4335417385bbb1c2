//! Annual metrics types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Department attributes feeding the annual metrics calculation.
#[derive(Debug, Clone, Copy)]
pub struct AnnualMetricsInput {
    /// Billable headcount of the department.
    pub billable_headcount: i32,
    /// Department-level monthly cost per person, when overriding the
    /// company default.
    pub cost_per_person_per_month: Option<Decimal>,
    /// Target utilization fraction (0..1).
    pub target_utilization: Decimal,
    /// Average billable rate per hour.
    pub average_hourly_rate: Decimal,
}

/// Derived annual figures for a department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualMetrics {
    /// Annual direct cost of the billable team.
    pub direct_cost_annual: Decimal,
    /// Annual billable hours at target utilization.
    pub billable_hours_annual: Decimal,
    /// Revenue ceiling at full billable capacity.
    pub revenue_capacity_annual: Decimal,
    /// Share of company overhead allocated to this department.
    pub overhead_allocated_annual: Decimal,
    /// Revenue required to cover cost plus overhead at the target margin.
    pub minimum_revenue_annual: Decimal,
}
