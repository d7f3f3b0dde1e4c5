//! Effective-rate tax calculation over the bracket schedule.
//!
//! The effective rate for trailing revenue `R` in a bracket with nominal
//! rate `n` and deduction `d` is
//!
//! ```text
//! effective = (R × n − d) / R
//! ```
//!
//! and the tax on a gross payment is `gross × effective`. This is the only
//! place the crate computes tax; projections reuse it.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use simples_core::BracketTable;
//! use simples_core::calculations::TaxCalculator;
//! use simples_core::calculations::common::round_half_up;
//!
//! let table = BracketTable::simples_nacional();
//! let calculator = TaxCalculator::new(&table);
//!
//! let result = calculator.calculate_tax(dec!(270000), dec!(10000));
//!
//! assert_eq!(result.bracket, 2);
//! assert_eq!(round_half_up(result.tax_amount), dec!(773.33));
//! assert_eq!(result.net_amount, dec!(10000) - result.tax_amount);
//! ```

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculations::common::to_percent;
use crate::{BracketInfo, BracketTable, TaxBracket, TaxCalculation};

/// Calculator for tax on gross payments.
///
/// Borrows the bracket table; construction is free and the calculator holds
/// no other state.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    table: &'a BracketTable,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a BracketTable {
        self.table
    }

    /// Calculates tax on `gross_amount` with the bracket resolved from
    /// `revenue_12m`.
    ///
    /// When the entity has no trailing history (`revenue_12m <= 0`) the gross
    /// payment stands in as the lookup basis, so a first payment still lands
    /// in a sensible bracket. With neither figure positive the first
    /// bracket's nominal rate applies.
    pub fn calculate_tax(
        &self,
        revenue_12m: Decimal,
        gross_amount: Decimal,
    ) -> TaxCalculation {
        let basis = self.lookup_basis(revenue_12m, gross_amount);
        let bracket = self.table.lookup(basis);
        let effective_rate = self.effective_rate_or_nominal(bracket, basis);

        self.build(revenue_12m, gross_amount, basis, bracket, effective_rate, false)
    }

    /// Calculates tax with the bracket forced to `bracket_override`.
    ///
    /// An override of 0 or beyond the table falls back to
    /// [`calculate_tax`](Self::calculate_tax). When the revenue basis lies
    /// outside the forced bracket, the rate is computed from the bracket's
    /// representative revenue instead, so the reported rate stays realistic
    /// for that bracket.
    pub fn calculate_tax_manual(
        &self,
        revenue_12m: Decimal,
        gross_amount: Decimal,
        bracket_override: u8,
    ) -> TaxCalculation {
        let Some(bracket) = self.table.get(bracket_override) else {
            debug!(
                bracket_override,
                "bracket override out of range; using automatic lookup"
            );
            return self.calculate_tax(revenue_12m, gross_amount);
        };

        let actual = self.lookup_basis(revenue_12m, gross_amount);
        let basis = if actual > Decimal::ZERO && bracket.contains(actual) {
            actual
        } else {
            bracket.representative_revenue()
        };
        let effective_rate = self.effective_rate_or_nominal(bracket, basis);

        info!(
            bracket = bracket.index,
            revenue_12m = %revenue_12m,
            basis = %basis,
            representative = basis != actual,
            "manual bracket override applied"
        );

        self.build(revenue_12m, gross_amount, basis, bracket, effective_rate, true)
    }

    /// Resolves the bracket, effective rate (0-100) and next-bracket
    /// threshold for a trailing revenue figure.
    ///
    /// Non-positive revenue yields the first bracket with its nominal rate.
    pub fn bracket_info(
        &self,
        revenue_12m: Decimal,
    ) -> BracketInfo {
        if revenue_12m <= Decimal::ZERO {
            let first = self.table.first();
            return BracketInfo {
                bracket: first.index,
                effective_rate_percent: to_percent(first.nominal_rate),
                next_threshold: first.max_revenue,
            };
        }

        let bracket = self.table.lookup(revenue_12m);
        let effective_rate = self.effective_rate_or_nominal(bracket, revenue_12m);

        BracketInfo {
            bracket: bracket.index,
            effective_rate_percent: to_percent(effective_rate),
            next_threshold: bracket.max_revenue,
        }
    }

    /// Picks the revenue used for bracket lookup.
    fn lookup_basis(
        &self,
        revenue_12m: Decimal,
        gross_amount: Decimal,
    ) -> Decimal {
        if revenue_12m > Decimal::ZERO {
            return revenue_12m;
        }
        if revenue_12m < Decimal::ZERO {
            warn!(revenue_12m = %revenue_12m, "negative trailing revenue treated as no history");
        }
        if gross_amount > Decimal::ZERO {
            gross_amount
        } else {
            Decimal::ZERO
        }
    }

    fn effective_rate_or_nominal(
        &self,
        bracket: &TaxBracket,
        basis: Decimal,
    ) -> Decimal {
        bracket.effective_rate(basis).unwrap_or_else(|| {
            debug!(bracket = bracket.index, "no positive revenue; using nominal rate");
            bracket.nominal_rate
        })
    }

    fn build(
        &self,
        revenue_12m: Decimal,
        gross_amount: Decimal,
        revenue_basis: Decimal,
        bracket: &TaxBracket,
        effective_rate: Decimal,
        manual_override: bool,
    ) -> TaxCalculation {
        let tax_amount = gross_amount * effective_rate;

        TaxCalculation {
            gross_amount,
            revenue_12m,
            revenue_basis,
            bracket: bracket.index,
            effective_rate,
            tax_amount,
            net_amount: gross_amount - tax_amount,
            contribution_amount: None,
            manual_override,
        }
    }
}
