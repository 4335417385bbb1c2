//! Property-based tests for overhead allocation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::OverheadService;

/// Strategy for a positive overhead pool (1.00 to 10,000,000.00).
fn overhead_pool() -> impl Strategy<Value = Decimal> {
    (100i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for department headcounts (1-8 departments, 1-50 people each).
fn headcounts() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(1i32..50, 1..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Allocations over all departments sum back to the pool (within the
    /// rounding slack of the division).
    #[test]
    fn prop_allocation_sums_to_total(
        pool in overhead_pool(),
        counts in headcounts(),
    ) {
        let total: i32 = counts.iter().sum();
        let allocated: Decimal = counts
            .iter()
            .map(|c| OverheadService::allocate(pool, *c, total))
            .sum();
        let diff = (allocated - pool).abs();
        prop_assert!(
            diff < Decimal::new(1, 2),
            "sum {allocated} drifted from pool {pool}"
        );
    }

    /// Each share is bounded by the pool and proportional ordering holds.
    #[test]
    fn prop_share_is_bounded(
        pool in overhead_pool(),
        counts in headcounts(),
    ) {
        let total: i32 = counts.iter().sum();
        for c in &counts {
            let share = OverheadService::allocate(pool, *c, total);
            prop_assert!(share >= Decimal::ZERO);
            prop_assert!(share <= pool);
        }
    }
}
