//! Annual metrics calculation.

use rust_decimal::Decimal;

use crate::settings::CompanySettings;

use super::error::MetricsError;
use super::types::{AnnualMetrics, AnnualMetricsInput};

/// Highest accepted target margin (exclusive).
pub const MARGIN_CEILING: Decimal = Decimal::from_parts(95, 0, 0, false, 2);

/// Metrics service for department annual figures.
pub struct MetricsService;

impl MetricsService {
    /// Computes the five derived annual metrics for a department.
    ///
    /// `overhead_allocated_annual` comes from the overhead allocator; the
    /// caller gathers headcounts and fixed costs and passes the share in.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::MarginTooHigh` when the configured target
    /// margin is at or above [`MARGIN_CEILING`].
    pub fn annual_metrics(
        input: AnnualMetricsInput,
        settings: &CompanySettings,
        overhead_allocated_annual: Decimal,
    ) -> Result<AnnualMetrics, MetricsError> {
        if settings.target_margin >= MARGIN_CEILING {
            return Err(MetricsError::MarginTooHigh {
                margin: settings.target_margin,
                ceiling: MARGIN_CEILING,
            });
        }

        let headcount = Decimal::from(input.billable_headcount);
        let cost_per_person = input
            .cost_per_person_per_month
            .unwrap_or(settings.cost_per_person_per_month);
        let twelve = Decimal::from(12);

        let direct_cost_annual = headcount * cost_per_person * twelve;
        let billable_hours_annual =
            headcount * settings.hours_per_month * input.target_utilization * twelve;
        let revenue_capacity_annual = billable_hours_annual * input.average_hourly_rate;
        let minimum_revenue_annual = ((direct_cost_annual + overhead_allocated_annual)
            / (Decimal::ONE - settings.target_margin))
            .round_dp(2);

        Ok(AnnualMetrics {
            direct_cost_annual,
            billable_hours_annual,
            revenue_capacity_annual,
            overhead_allocated_annual,
            minimum_revenue_annual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input() -> AnnualMetricsInput {
        AnnualMetricsInput {
            billable_headcount: 4,
            cost_per_person_per_month: Some(dec!(2200)),
            target_utilization: dec!(0.65),
            average_hourly_rate: dec!(45),
        }
    }

    #[test]
    fn test_reference_scenario() {
        // Single department, all headcount in it, no fixed costs: overhead
        // share is 6 x 2200 x 12 = 158_400.
        let metrics =
            MetricsService::annual_metrics(input(), &CompanySettings::default(), dec!(158400))
                .unwrap();

        assert_eq!(metrics.direct_cost_annual, dec!(105600));
        assert_eq!(metrics.billable_hours_annual, dec!(4992.00));
        assert_eq!(metrics.revenue_capacity_annual, dec!(224640.00));
        assert_eq!(metrics.overhead_allocated_annual, dec!(158400));
        // (105_600 + 158_400) / 0.70
        assert_eq!(metrics.minimum_revenue_annual, dec!(377142.86));
    }

    #[test]
    fn test_company_cost_fallback() {
        let mut i = input();
        i.cost_per_person_per_month = None;
        let mut settings = CompanySettings::default();
        settings.cost_per_person_per_month = dec!(3000);

        let metrics = MetricsService::annual_metrics(i, &settings, dec!(0)).unwrap();
        assert_eq!(metrics.direct_cost_annual, dec!(144000));
    }

    #[test]
    fn test_margin_ceiling_rejected() {
        let mut settings = CompanySettings::default();
        settings.target_margin = dec!(0.95);

        let err = MetricsService::annual_metrics(input(), &settings, dec!(0)).unwrap_err();
        assert_eq!(
            err,
            MetricsError::MarginTooHigh {
                margin: dec!(0.95),
                ceiling: dec!(0.95),
            }
        );
    }

    #[test]
    fn test_margin_below_ceiling_accepted() {
        let mut settings = CompanySettings::default();
        settings.target_margin = dec!(0.94);
        assert!(MetricsService::annual_metrics(input(), &settings, dec!(0)).is_ok());
    }
}
