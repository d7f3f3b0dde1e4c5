//! Flat social-contribution calculation capped at a ceiling.
//!
//! Independent of the bracket schedule:
//!
//! ```text
//! contribution = min(base, ceiling) × rate
//! ```
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use simples_core::ContributionConfig;
//! use simples_core::calculations::contribution;
//!
//! let config = ContributionConfig {
//!     base: dec!(15000),
//!     ceiling: dec!(7786.02),
//!     rate: dec!(0.11),
//! };
//!
//! assert_eq!(contribution(Some(&config)), dec!(856.4622));
//! assert_eq!(contribution(None), dec!(0));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::ContributionConfig;

/// Monthly contribution for `config`, or zero when no configuration is given
/// or the base is not positive. Never fails.
pub fn contribution(config: Option<&ContributionConfig>) -> Decimal {
    let Some(config) = config else {
        return Decimal::ZERO;
    };

    if config.base <= Decimal::ZERO {
        debug!(base = %config.base, "no contribution base; contribution is zero");
        return Decimal::ZERO;
    }

    config.base.min(config.ceiling) * config.rate
}

/// Contribution accumulated over `months` months of an unchanged configuration.
pub fn contribution_for_months(
    config: Option<&ContributionConfig>,
    months: u32,
) -> Decimal {
    contribution(config) * Decimal::from(months)
}
