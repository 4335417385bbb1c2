//! Overhead pool math.
//!
//! Overhead is a shared pool distributed pro-rata by billable headcount,
//! not by revenue. Revenue depends on the overhead-derived minimum, so the
//! allocation basis must be independent of revenue.

use rust_decimal::Decimal;

/// Overhead service for allocation math.
pub struct OverheadService;

impl OverheadService {
    /// Total annual company overhead.
    ///
    /// People-based overhead annualized plus the annualized fixed-cost
    /// total of the reference month.
    #[must_use]
    pub fn total_annual_cost(
        overhead_people: i32,
        cost_per_person_per_month: Decimal,
        fixed_costs_annual: Decimal,
    ) -> Decimal {
        Decimal::from(overhead_people) * cost_per_person_per_month * Decimal::from(12)
            + fixed_costs_annual
    }

    /// Share of the overhead pool for one department.
    ///
    /// Returns 0 when total billable headcount is 0: with no denominator
    /// there is nothing to allocate, which is not an error.
    #[must_use]
    pub fn allocate(
        total_overhead_cost: Decimal,
        department_headcount: i32,
        total_billable_headcount: i32,
    ) -> Decimal {
        if total_billable_headcount <= 0 {
            return Decimal::ZERO;
        }
        total_overhead_cost * Decimal::from(department_headcount)
            / Decimal::from(total_billable_headcount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_annual_cost() {
        // 6 people x 2200/month x 12 = 158_400
        let total = OverheadService::total_annual_cost(6, dec!(2200), dec!(12000));
        assert_eq!(total, dec!(170400));
    }

    #[test]
    fn test_single_department_takes_all() {
        let share = OverheadService::allocate(dec!(158400), 4, 4);
        assert_eq!(share, dec!(158400));
    }

    #[test]
    fn test_proportional_share() {
        let share = OverheadService::allocate(dec!(100000), 3, 10);
        assert_eq!(share, dec!(30000));
    }

    #[test]
    fn test_zero_headcount_allocates_nothing() {
        assert_eq!(OverheadService::allocate(dec!(100000), 3, 0), dec!(0));
    }
}
