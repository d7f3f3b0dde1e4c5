use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of applying the effective-rate formula to one gross payment.
///
/// Produced per call and never persisted by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculation {
    pub gross_amount: Decimal,

    /// Trailing-12-month revenue as supplied by the caller.
    pub revenue_12m: Decimal,

    /// Revenue figure actually fed into the effective-rate formula.
    ///
    /// Differs from `revenue_12m` when the caller had no trailing history
    /// (the gross payment stands in) or when a manual override substituted
    /// the bracket's representative revenue.
    pub revenue_basis: Decimal,

    /// 1-based bracket applied.
    pub bracket: u8,

    /// Effective rate as a fraction.
    pub effective_rate: Decimal,

    pub tax_amount: Decimal,
    pub net_amount: Decimal,

    /// Social contribution, when a configuration was supplied.
    pub contribution_amount: Option<Decimal>,

    /// Set when the bracket was forced by the caller.
    pub manual_override: bool,
}

impl TaxCalculation {
    /// Effective rate on the 0-100 scale used at the interface boundary.
    pub fn effective_rate_percent(&self) -> Decimal {
        self.effective_rate * Decimal::ONE_HUNDRED
    }

    /// Attaches a contribution amount computed elsewhere.
    pub fn with_contribution(
        mut self,
        contribution: Decimal,
    ) -> Self {
        self.contribution_amount = Some(contribution);
        self
    }
}
