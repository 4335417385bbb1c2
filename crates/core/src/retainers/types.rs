//! Retainer pricing types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived pricing for one retainer contract.
///
/// `monthly_revenue` is always `monthly_price * quantity`; this struct is
/// the single source of truth for the derived field and must be produced
/// on every create/update path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetainerPricing {
    /// Contract price per unit per month.
    pub monthly_price: Decimal,
    /// Number of contracted units (always >= 1).
    pub quantity: i32,
    /// Derived monthly revenue.
    pub monthly_revenue: Decimal,
}

/// Derived margin figures for a catalog template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMargins {
    /// Internal delivery cost per month.
    pub monthly_cost: Decimal,
    /// Price minus cost.
    pub monthly_margin: Decimal,
    /// Margin as a percentage of price (0 when the price is 0).
    pub margin_percentage: Decimal,
}
