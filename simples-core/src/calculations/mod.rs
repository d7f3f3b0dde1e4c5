//! Tax-domain calculators.
//!
//! Everything here is a pure function of its inputs and the bracket table,
//! apart from the aggregator reads in [`projection`] and [`breakdown`].

pub mod breakdown;
pub mod common;
pub mod contribution;
pub mod projection;
pub mod tax;
pub mod warning;

#[cfg(test)]
pub(crate) mod testing;

pub use breakdown::monthly_breakdown;
pub use contribution::{contribution, contribution_for_months};
pub use projection::TaxProjector;
pub use tax::TaxCalculator;
pub use warning::{BracketWarningEngine, WarningThresholds};
