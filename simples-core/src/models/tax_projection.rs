use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BracketWarning;

/// Bracket position resolved from a trailing revenue figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketInfo {
    /// 1-based bracket index.
    pub bracket: u8,

    /// Effective rate on the 0-100 scale.
    pub effective_rate_percent: Decimal,

    /// Trailing revenue above which the next bracket applies.
    pub next_threshold: Decimal,
}

/// Year-to-date figures and their full-year extrapolation.
///
/// Computed fresh on every request. `Default` is the all-zero projection
/// returned for years with no data yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxProjection {
    pub year: i32,
    pub months_elapsed: u32,

    // Year-to-date actuals
    pub ytd_gross_income: Decimal,
    pub ytd_tax: Decimal,
    pub ytd_net_income: Decimal,
    pub ytd_contribution: Decimal,

    // Full-year projection
    pub projected_annual_income: Decimal,
    pub projected_annual_tax: Decimal,
    pub projected_net_income: Decimal,
    pub projected_annual_contribution: Decimal,

    // Bracket position
    pub current_bracket: u8,
    pub effective_rate_percent: Decimal,
    pub next_threshold: Decimal,

    pub computed_at: DateTime<Utc>,
    pub warning: BracketWarning,
}
