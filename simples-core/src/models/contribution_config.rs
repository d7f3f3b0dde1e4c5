use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by [`ContributionConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContributionConfigError {
    #[error("contribution ceiling must be non-negative, got {0}")]
    NegativeCeiling(Decimal),

    #[error("contribution rate must be between 0 and 1, got {0}")]
    InvalidRate(Decimal),
}

/// Caller-supplied parameters for the social contribution.
///
/// Absent configuration (`None` at call sites) skips the contribution
/// entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionConfig {
    /// Monthly contribution base (for example, the declared pro-labore).
    pub base: Decimal,

    /// Maximum base subject to contribution.
    pub ceiling: Decimal,

    /// Contribution rate as a fraction.
    pub rate: Decimal,
}

impl ContributionConfig {
    /// Checks that the ceiling and rate are usable.
    ///
    /// The calculator never fails on its own; this is for configuration
    /// loaders that want to reject bad input early.
    pub fn validate(&self) -> Result<(), ContributionConfigError> {
        if self.ceiling < Decimal::ZERO {
            return Err(ContributionConfigError::NegativeCeiling(self.ceiling));
        }
        if self.rate < Decimal::ZERO || self.rate > Decimal::ONE {
            return Err(ContributionConfigError::InvalidRate(self.rate));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn config() -> ContributionConfig {
        ContributionConfig {
            base: dec!(15000),
            ceiling: dec!(7786.02),
            rate: dec!(0.11),
        }
    }

    #[test]
    fn validate_accepts_regular_config() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_ceiling() {
        let cfg = ContributionConfig {
            ceiling: dec!(-1),
            ..config()
        };

        assert_eq!(
            cfg.validate(),
            Err(ContributionConfigError::NegativeCeiling(dec!(-1)))
        );
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let cfg = ContributionConfig {
            rate: dec!(1.5),
            ..config()
        };

        assert_eq!(
            cfg.validate(),
            Err(ContributionConfigError::InvalidRate(dec!(1.5)))
        );
    }
}
