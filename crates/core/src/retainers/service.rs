//! Retainer pricing derivation.

use rust_decimal::Decimal;

use super::types::{CatalogMargins, RetainerPricing};

/// Retainer service for pricing logic.
pub struct RetainerService;

impl RetainerService {
    /// Derives monthly revenue for a contract.
    ///
    /// A contract always represents at least one unit: a missing or
    /// non-positive quantity is coerced to 1.
    #[must_use]
    pub fn monthly_revenue(monthly_price: Decimal, quantity: Option<i32>) -> RetainerPricing {
        let quantity = quantity.filter(|q| *q > 0).unwrap_or(1);
        RetainerPricing {
            monthly_price,
            quantity,
            monthly_revenue: monthly_price * Decimal::from(quantity),
        }
    }

    /// Derives catalog margin figures from internal hourly cost.
    ///
    /// Returns `None` when no internal cost is known; the margin columns
    /// stay unset rather than pretending a zero cost.
    #[must_use]
    pub fn catalog_margins(
        monthly_price: Decimal,
        hours_per_month: Decimal,
        internal_hourly_cost: Option<Decimal>,
    ) -> Option<CatalogMargins> {
        let hourly_cost = internal_hourly_cost?;
        let monthly_cost = hourly_cost * hours_per_month;
        let monthly_margin = monthly_price - monthly_cost;
        let margin_percentage = if monthly_price.is_zero() {
            Decimal::ZERO
        } else {
            (monthly_margin / monthly_price * Decimal::ONE_HUNDRED).round_dp(2)
        };
        Some(CatalogMargins {
            monthly_cost,
            monthly_margin,
            margin_percentage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_revenue() {
        let pricing = RetainerService::monthly_revenue(dec!(800), Some(2));
        assert_eq!(pricing.monthly_price, dec!(800));
        assert_eq!(pricing.quantity, 2);
        assert_eq!(pricing.monthly_revenue, dec!(1600));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(0))]
    #[case(Some(-3))]
    fn test_quantity_coerced_to_one(#[case] quantity: Option<i32>) {
        let pricing = RetainerService::monthly_revenue(dec!(500), quantity);
        assert_eq!(pricing.quantity, 1);
        assert_eq!(pricing.monthly_revenue, dec!(500));
    }

    #[test]
    fn test_catalog_margins() {
        let margins =
            RetainerService::catalog_margins(dec!(1000), dec!(10), Some(dec!(40))).unwrap();
        assert_eq!(margins.monthly_cost, dec!(400));
        assert_eq!(margins.monthly_margin, dec!(600));
        assert_eq!(margins.margin_percentage, dec!(60.00));
    }

    #[test]
    fn test_catalog_margins_zero_price() {
        let margins = RetainerService::catalog_margins(dec!(0), dec!(10), Some(dec!(40))).unwrap();
        assert_eq!(margins.monthly_margin, dec!(-400));
        assert_eq!(margins.margin_percentage, dec!(0));
    }

    #[test]
    fn test_catalog_margins_without_cost() {
        assert_eq!(
            RetainerService::catalog_margins(dec!(1000), dec!(10), None),
            None
        );
    }
}
