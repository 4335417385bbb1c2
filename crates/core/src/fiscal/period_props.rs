//! Property-based tests for activity-window membership.

use chrono::NaiveDate;
use proptest::prelude::*;

use super::period::{Period, active_in_period};

/// Strategy for an arbitrary date in 2020-2035.
fn any_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2036, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Strategy for a valid period in 2024-2030.
fn any_period() -> impl Strategy<Value = Period> {
    (1u32..=12, 2024i32..2031).prop_map(|(m, y)| Period::new(m, y).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Membership matches the window predicate exactly.
    #[test]
    fn prop_window_matches_definition(
        start in any_date(),
        end in proptest::option::of(any_date()),
        period in any_period(),
    ) {
        let expected = start <= period.last_day()
            && end.is_none_or(|e| e >= period.first_day());
        prop_assert_eq!(active_in_period(true, start, end, period), expected);
    }

    /// An inactive entity is never a member, regardless of dates.
    #[test]
    fn prop_inactive_is_never_member(
        start in any_date(),
        end in proptest::option::of(any_date()),
        period in any_period(),
    ) {
        prop_assert!(!active_in_period(false, start, end, period));
    }

    /// last_day is always within the same month as first_day.
    #[test]
    fn prop_month_bounds_are_ordered(period in any_period()) {
        prop_assert!(period.first_day() <= period.last_day());
        prop_assert!(period.contains_date(period.first_day()));
        prop_assert!(period.contains_date(period.last_day()));
        prop_assert!(!period.contains_date(period.next().first_day()));
    }
}
