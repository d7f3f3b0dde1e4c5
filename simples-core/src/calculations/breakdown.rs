//! Twelve-month fiscal report for one year.
//!
//! Each month is aggregated on its own; no figure carries over between
//! months. Months are queried one after another.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::contribution::contribution;
use crate::db::{AggregatorError, TaxAggregator};
use crate::format::month_name;
use crate::{ContributionConfig, DateRange, MonthlyTaxBreakdown};

/// Builds the monthly breakdown of `year` for `account_ids`.
///
/// The contribution is the same for every month of a given configuration.
/// A year chrono cannot represent yields twelve zeroed months.
pub async fn monthly_breakdown<A: TaxAggregator + ?Sized>(
    aggregator: &A,
    year: i32,
    account_ids: &[i64],
    contribution_config: Option<&ContributionConfig>,
) -> Result<[MonthlyTaxBreakdown; 12], AggregatorError> {
    let monthly_contribution = contribution(contribution_config);
    let mut months: [MonthlyTaxBreakdown; 12] = std::array::from_fn(|i| empty_month(i as u32 + 1));

    for slot in months.iter_mut() {
        let Some(range) = DateRange::month(year, slot.month) else {
            debug!(year, month = slot.month, "month outside the supported calendar");
            continue;
        };

        slot.gross_income = aggregator.sum_gross(&range, account_ids).await?;
        slot.tax_paid = aggregator.sum_tax(&range, account_ids).await?;
        slot.net_income = aggregator.sum_net(&range, account_ids).await?;
        slot.contribution_paid = monthly_contribution;
    }

    Ok(months)
}

fn empty_month(month: u32) -> MonthlyTaxBreakdown {
    MonthlyTaxBreakdown {
        month,
        month_name: month_name(month).unwrap_or_default().to_string(),
        gross_income: Decimal::ZERO,
        tax_paid: Decimal::ZERO,
        net_income: Decimal::ZERO,
        contribution_paid: Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::testing::{FailingAggregator, MemoryAggregator, income};

    fn aggregator() -> MemoryAggregator {
        MemoryAggregator::new(vec![
            income(1, 2025, 1, 5, dec!(10000), dec!(600)),
            income(1, 2025, 1, 25, dec!(5000), dec!(300)),
            income(1, 2025, 3, 31, dec!(8000), dec!(480)),
            income(2, 2025, 3, 1, dec!(1000), dec!(60)),
            income(1, 2024, 12, 31, dec!(7777), dec!(466.62)),
        ])
    }

    #[tokio::test]
    async fn breakdown_has_twelve_named_months() {
        let aggregator = aggregator();

        let months = monthly_breakdown(&aggregator, 2025, &[1], None)
            .await
            .unwrap();

        let numbers: Vec<u32> = months.iter().map(|m| m.month).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<u32>>());
        assert_eq!(months[0].month_name, "Janeiro");
        assert_eq!(months[11].month_name, "Dezembro");
    }

    #[tokio::test]
    async fn breakdown_sums_each_month_independently() {
        let aggregator = aggregator();

        let months = monthly_breakdown(&aggregator, 2025, &[1], None)
            .await
            .unwrap();

        assert_eq!(months[0].gross_income, dec!(15000));
        assert_eq!(months[0].tax_paid, dec!(900));
        assert_eq!(months[0].net_income, dec!(14100));
        assert_eq!(months[1].gross_income, dec!(0));
        assert_eq!(months[2].gross_income, dec!(8000));
    }

    #[tokio::test]
    async fn breakdown_respects_account_scope() {
        let aggregator = aggregator();

        let months = monthly_breakdown(&aggregator, 2025, &[1, 2], None)
            .await
            .unwrap();

        assert_eq!(months[2].gross_income, dec!(9000));
    }

    #[tokio::test]
    async fn breakdown_applies_same_contribution_to_every_month() {
        let aggregator = aggregator();
        let config = ContributionConfig {
            base: dec!(15000),
            ceiling: dec!(7786.02),
            rate: dec!(0.11),
        };

        let months = monthly_breakdown(&aggregator, 2025, &[1], Some(&config))
            .await
            .unwrap();

        assert!(months.iter().all(|m| m.contribution_paid == dec!(856.4622)));
    }

    #[tokio::test]
    async fn breakdown_without_config_has_zero_contribution() {
        let aggregator = aggregator();

        let months = monthly_breakdown(&aggregator, 2025, &[1], None)
            .await
            .unwrap();

        assert!(months.iter().all(|m| m.contribution_paid.is_zero()));
    }

    #[tokio::test]
    async fn breakdown_propagates_aggregator_failure() {
        let result = monthly_breakdown(&FailingAggregator, 2025, &[1], None).await;

        assert_eq!(
            result.err(),
            Some(AggregatorError::Connection("ledger offline".to_string()))
        );
    }
}
