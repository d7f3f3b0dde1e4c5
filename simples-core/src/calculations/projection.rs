//! Year-to-date figures and straight-line full-year projection.
//!
//! The projector pulls aggregates from a [`TaxAggregator`] and combines them
//! with the bracket schedule:
//!
//! | Figure                  | Current year                        | Past year        |
//! |-------------------------|-------------------------------------|------------------|
//! | months elapsed `m`      | calendar month of the evaluation    | 12               |
//! | projected income        | `YTD gross / m × 12`                | YTD gross        |
//! | bracket basis `R`       | trailing 12 months, else projection | the year's gross |
//! | projected tax           | `calculate_tax(R, projected).tax`   | YTD tax          |
//! | projected contribution  | `monthly × 12`                      | `monthly × 12`   |
//! | projected net           | `income − tax − contribution`       | YTD net          |
//! | warning                 | computed                            | none             |
//!
//! The trailing window ends on the evaluation date, so `_at` variants are
//! fully determined by the clock they are given.
//!
//! Future years have no data yet and yield an all-zero projection stamped
//! with the year. Aggregator failures are returned unchanged.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, Local, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::calculations::contribution::contribution_for_months;
use crate::calculations::tax::TaxCalculator;
use crate::calculations::warning::{BracketWarningEngine, WarningThresholds};
use crate::db::{AggregatorError, TaxAggregator};
use crate::{BracketTable, BracketWarning, ContributionConfig, DateRange, TaxProjection};

const MONTHS_PER_YEAR: u32 = 12;

/// Builds [`TaxProjection`]s from aggregated income.
pub struct TaxProjector<'a, A: TaxAggregator + ?Sized> {
    aggregator: &'a A,
    table: &'a BracketTable,
    thresholds: WarningThresholds,
}

/// Summed figures for one date range.
struct Totals {
    gross: Decimal,
    tax: Decimal,
    net: Decimal,
}

impl<'a, A: TaxAggregator + ?Sized> TaxProjector<'a, A> {
    pub fn new(
        aggregator: &'a A,
        table: &'a BracketTable,
    ) -> Self {
        Self::with_thresholds(aggregator, table, WarningThresholds::default())
    }

    pub fn with_thresholds(
        aggregator: &'a A,
        table: &'a BracketTable,
        thresholds: WarningThresholds,
    ) -> Self {
        Self {
            aggregator,
            table,
            thresholds,
        }
    }

    /// Projection for the current calendar year, evaluated now.
    pub async fn tax_projection(
        &self,
        account_ids: &[i64],
        contribution_config: Option<&ContributionConfig>,
    ) -> Result<TaxProjection, AggregatorError> {
        self.tax_projection_at(Local::now(), account_ids, contribution_config)
            .await
    }

    /// Projection for the calendar year containing `now`.
    pub async fn tax_projection_at(
        &self,
        now: DateTime<Local>,
        account_ids: &[i64],
        contribution_config: Option<&ContributionConfig>,
    ) -> Result<TaxProjection, AggregatorError> {
        self.current_year(now, account_ids, contribution_config)
            .await
    }

    /// Projection for `year`, evaluated now.
    pub async fn tax_projection_for_year(
        &self,
        year: i32,
        account_ids: &[i64],
        contribution_config: Option<&ContributionConfig>,
    ) -> Result<TaxProjection, AggregatorError> {
        self.tax_projection_for_year_at(Local::now(), year, account_ids, contribution_config)
            .await
    }

    /// Projection for `year` as seen from `now`.
    ///
    /// Future years return the all-zero projection without querying the
    /// aggregator; past years report their closed actuals.
    pub async fn tax_projection_for_year_at(
        &self,
        now: DateTime<Local>,
        year: i32,
        account_ids: &[i64],
        contribution_config: Option<&ContributionConfig>,
    ) -> Result<TaxProjection, AggregatorError> {
        match year.cmp(&now.year()) {
            Ordering::Equal => {
                self.current_year(now, account_ids, contribution_config)
                    .await
            }
            Ordering::Less => {
                self.past_year(now, year, account_ids, contribution_config)
                    .await
            }
            Ordering::Greater => {
                debug!(year, "projection requested for a future year; no data yet");
                Ok(Self::empty(now, year))
            }
        }
    }

    async fn current_year(
        &self,
        now: DateTime<Local>,
        account_ids: &[i64],
        contribution_config: Option<&ContributionConfig>,
    ) -> Result<TaxProjection, AggregatorError> {
        let today = now.date_naive();
        let months_elapsed = today.month();
        let ytd = self.totals(&DateRange::year_to_date(today), account_ids).await?;

        let projected_annual_income = annualize(ytd.gross, months_elapsed);

        let trailing = self
            .aggregator
            .trailing_12_month_revenue(account_ids, today)
            .await?;
        let revenue_12m = if trailing > Decimal::ZERO {
            trailing
        } else {
            debug!("no trailing revenue; using projected annual income as bracket basis");
            projected_annual_income
        };

        let calculator = TaxCalculator::new(self.table);
        let info = calculator.bracket_info(revenue_12m);
        let projected_annual_tax = calculator
            .calculate_tax(revenue_12m, projected_annual_income)
            .tax_amount;

        let ytd_contribution = contribution_for_months(contribution_config, months_elapsed);
        let projected_annual_contribution =
            contribution_for_months(contribution_config, MONTHS_PER_YEAR);

        let warning = BracketWarningEngine::with_thresholds(self.table, self.thresholds)
            .bracket_warning(revenue_12m, projected_annual_income, info.bracket);

        info!(
            year = today.year(),
            months_elapsed,
            bracket = info.bracket,
            warning = %warning.level,
            "tax projection computed"
        );

        Ok(TaxProjection {
            year: today.year(),
            months_elapsed,
            ytd_gross_income: ytd.gross,
            ytd_tax: ytd.tax,
            ytd_net_income: ytd.net,
            ytd_contribution,
            projected_annual_income,
            projected_annual_tax,
            projected_net_income: projected_annual_income
                - projected_annual_tax
                - projected_annual_contribution,
            projected_annual_contribution,
            current_bracket: info.bracket,
            effective_rate_percent: info.effective_rate_percent,
            next_threshold: info.next_threshold,
            computed_at: now.with_timezone(&Utc),
            warning,
        })
    }

    async fn past_year(
        &self,
        now: DateTime<Local>,
        year: i32,
        account_ids: &[i64],
        contribution_config: Option<&ContributionConfig>,
    ) -> Result<TaxProjection, AggregatorError> {
        let Some(range) = DateRange::year(year) else {
            debug!(year, "year outside the supported calendar; returning empty projection");
            return Ok(Self::empty(now, year));
        };
        let actual = self.totals(&range, account_ids).await?;

        // A closed year's gross is exactly its own trailing twelve months.
        let info = TaxCalculator::new(self.table).bracket_info(actual.gross);
        let annual_contribution = contribution_for_months(contribution_config, MONTHS_PER_YEAR);

        Ok(TaxProjection {
            year,
            months_elapsed: MONTHS_PER_YEAR,
            ytd_gross_income: actual.gross,
            ytd_tax: actual.tax,
            ytd_net_income: actual.net,
            ytd_contribution: annual_contribution,
            projected_annual_income: actual.gross,
            projected_annual_tax: actual.tax,
            projected_net_income: actual.net,
            projected_annual_contribution: annual_contribution,
            current_bracket: info.bracket,
            effective_rate_percent: info.effective_rate_percent,
            next_threshold: info.next_threshold,
            computed_at: now.with_timezone(&Utc),
            warning: BracketWarning::default(),
        })
    }

    async fn totals(
        &self,
        range: &DateRange,
        account_ids: &[i64],
    ) -> Result<Totals, AggregatorError> {
        Ok(Totals {
            gross: self.aggregator.sum_gross(range, account_ids).await?,
            tax: self.aggregator.sum_tax(range, account_ids).await?,
            net: self.aggregator.sum_net(range, account_ids).await?,
        })
    }

    fn empty(
        now: DateTime<Local>,
        year: i32,
    ) -> TaxProjection {
        TaxProjection {
            year,
            computed_at: now.with_timezone(&Utc),
            ..TaxProjection::default()
        }
    }
}

/// Straight-line extrapolation of a partial-year total to twelve months.
fn annualize(
    total: Decimal,
    months_elapsed: u32,
) -> Decimal {
    if months_elapsed == 0 {
        return Decimal::ZERO;
    }
    total / Decimal::from(months_elapsed) * Decimal::from(MONTHS_PER_YEAR)
}
