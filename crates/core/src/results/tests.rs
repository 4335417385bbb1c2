//! Unit tests for the monthly result computation.

use rust_decimal_macros::dec;

use super::service::ResultService;
use super::types::{PlanSnapshot, ResultInput};

#[test]
fn test_full_month() {
    // 100h x 45 + 800 retainer + 500 project = 5_800; objective 5_000.
    let result = ResultService::compute(ResultInput {
        average_hourly_rate: dec!(45),
        plan: Some(PlanSnapshot {
            target_available_hours: Some(dec!(416)),
            actual_billable_hours: Some(dec!(100)),
            project_revenue: Some(dec!(500)),
        }),
        retainers_revenue: dec!(800),
        objective: Some(dec!(5000)),
    });

    assert_eq!(result.revenue_from_hours, Some(dec!(4500)));
    assert_eq!(result.total_revenue, dec!(5800));
    assert_eq!(result.active_retainers, dec!(800));
    assert_eq!(result.performance, Some(dec!(116.00)));
    assert_eq!(result.objective, Some(dec!(5000)));
    assert_eq!(result.planned_hours, Some(dec!(416)));
    assert_eq!(result.actual_hours, Some(dec!(100)));
    assert_eq!(result.utilization_rate, Some(dec!(0.2404)));
}

#[test]
fn test_empty_month_zero_vs_null_asymmetry() {
    // No hours, no retainers, no project revenue, no objective: the two
    // KPI fields are explicit zeros, everything else is absent.
    let result = ResultService::compute(ResultInput {
        average_hourly_rate: dec!(45),
        plan: None,
        retainers_revenue: dec!(0),
        objective: None,
    });

    assert_eq!(result.total_revenue, dec!(0));
    assert_eq!(result.active_retainers, dec!(0));
    assert_eq!(result.revenue_from_hours, None);
    assert_eq!(result.project_revenue, None);
    assert_eq!(result.objective, None);
    assert_eq!(result.performance, None);
    assert_eq!(result.utilization_rate, None);
    assert_eq!(result.planned_hours, None);
    assert_eq!(result.actual_hours, None);
}

#[test]
fn test_retainers_only_month() {
    let result = ResultService::compute(ResultInput {
        average_hourly_rate: dec!(60),
        plan: None,
        retainers_revenue: dec!(2400),
        objective: None,
    });

    assert_eq!(result.total_revenue, dec!(2400));
    assert_eq!(result.active_retainers, dec!(2400));
    assert_eq!(result.revenue_from_hours, None);
}

#[test]
fn test_zero_objective_yields_no_performance() {
    let result = ResultService::compute(ResultInput {
        average_hourly_rate: dec!(45),
        plan: None,
        retainers_revenue: dec!(1000),
        objective: Some(dec!(0)),
    });

    assert_eq!(result.performance, None);
    assert_eq!(result.objective, None);
}

#[test]
fn test_idempotent_computation() {
    let input = ResultInput {
        average_hourly_rate: dec!(45),
        plan: Some(PlanSnapshot {
            target_available_hours: Some(dec!(416)),
            actual_billable_hours: Some(dec!(123.5)),
            project_revenue: None,
        }),
        retainers_revenue: dec!(800),
        objective: Some(dec!(7000)),
    };

    assert_eq!(ResultService::compute(input), ResultService::compute(input));
}

#[test]
fn test_utilization_never_divides_by_zero() {
    let result = ResultService::compute(ResultInput {
        average_hourly_rate: dec!(45),
        plan: Some(PlanSnapshot {
            target_available_hours: Some(dec!(0)),
            actual_billable_hours: Some(dec!(50)),
            project_revenue: None,
        }),
        retainers_revenue: dec!(0),
        objective: None,
    });

    assert_eq!(result.utilization_rate, None);
    assert_eq!(result.planned_hours, None);
}

#[test]
fn test_performance_above_and_below_objective() {
    let over = ResultService::compute(ResultInput {
        average_hourly_rate: dec!(50),
        plan: Some(PlanSnapshot {
            actual_billable_hours: Some(dec!(200)),
            ..PlanSnapshot::default()
        }),
        retainers_revenue: dec!(0),
        objective: Some(dec!(8000)),
    });
    // 10_000 / 8_000 = 125%
    assert_eq!(over.performance, Some(dec!(125.00)));

    let under = ResultService::compute(ResultInput {
        average_hourly_rate: dec!(50),
        plan: Some(PlanSnapshot {
            actual_billable_hours: Some(dec!(40)),
            ..PlanSnapshot::default()
        }),
        retainers_revenue: dec!(0),
        objective: Some(dec!(8000)),
    });
    assert_eq!(under.performance, Some(dec!(25.00)));
}
