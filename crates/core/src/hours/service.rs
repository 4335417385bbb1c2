//! Planned capacity and utilization math.

use rust_decimal::Decimal;

/// Hours service for capacity calculations.
pub struct HoursService;

impl HoursService {
    /// Derives target available hours from a monthly plan.
    ///
    /// Returns `headcount * hours_per_month * utilization` when all three
    /// inputs are present and strictly positive; `None` otherwise. The
    /// absence of a plan must stay distinguishable from a computed value,
    /// so this never returns a synthetic zero.
    #[must_use]
    pub fn target_available_hours(
        billable_headcount: Option<i32>,
        target_hours_per_month: Option<Decimal>,
        target_utilization: Option<Decimal>,
    ) -> Option<Decimal> {
        let headcount = billable_headcount.filter(|h| *h > 0)?;
        let hours = target_hours_per_month.filter(|h| *h > Decimal::ZERO)?;
        let utilization = target_utilization.filter(|u| *u > Decimal::ZERO)?;
        Some(Decimal::from(headcount) * hours * utilization)
    }

    /// Utilization rate as a fraction of capacity.
    ///
    /// `None` when capacity is missing or non-positive; utilization is an
    /// optional enrichment, never a division-by-zero error.
    #[must_use]
    pub fn utilization_rate(
        actual_billable_hours: Decimal,
        target_available_hours: Option<Decimal>,
    ) -> Option<Decimal> {
        let capacity = target_available_hours.filter(|c| *c > Decimal::ZERO)?;
        Some((actual_billable_hours / capacity).round_dp(4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_target_available_hours() {
        let hours =
            HoursService::target_available_hours(Some(4), Some(dec!(160)), Some(dec!(0.65)));
        assert_eq!(hours, Some(dec!(416.00)));
    }

    #[test]
    fn test_missing_plan_field_yields_none() {
        assert_eq!(
            HoursService::target_available_hours(None, Some(dec!(160)), Some(dec!(0.65))),
            None
        );
        assert_eq!(
            HoursService::target_available_hours(Some(4), None, Some(dec!(0.65))),
            None
        );
        assert_eq!(
            HoursService::target_available_hours(Some(4), Some(dec!(160)), None),
            None
        );
    }

    #[test]
    fn test_non_positive_plan_field_yields_none() {
        assert_eq!(
            HoursService::target_available_hours(Some(0), Some(dec!(160)), Some(dec!(0.65))),
            None
        );
        assert_eq!(
            HoursService::target_available_hours(Some(4), Some(dec!(0)), Some(dec!(0.65))),
            None
        );
        assert_eq!(
            HoursService::target_available_hours(Some(4), Some(dec!(160)), Some(dec!(-1))),
            None
        );
    }

    #[test]
    fn test_utilization_rate() {
        let rate = HoursService::utilization_rate(dec!(100), Some(dec!(416)));
        assert_eq!(rate, Some(dec!(0.2404)));
    }

    #[test]
    fn test_utilization_rate_full() {
        assert_eq!(
            HoursService::utilization_rate(dec!(416), Some(dec!(416))),
            Some(dec!(1.0000))
        );
    }

    #[test]
    fn test_utilization_without_capacity_is_none() {
        assert_eq!(HoursService::utilization_rate(dec!(100), None), None);
        assert_eq!(
            HoursService::utilization_rate(dec!(100), Some(dec!(0))),
            None
        );
        assert_eq!(
            HoursService::utilization_rate(dec!(100), Some(dec!(-5))),
            None
        );
    }
}
