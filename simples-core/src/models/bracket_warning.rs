use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Severity of a bracket-proximity warning, ordered from least to most urgent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl WarningLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for WarningLevel {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proximity of an entity to the next bracket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketWarning {
    pub is_approaching: bool,

    /// Revenue left before the current bracket's ceiling, never negative.
    pub amount_until_next: Decimal,

    /// Share of the current bracket already traversed, 0-100.
    pub percent_to_next: Decimal,

    pub level: WarningLevel,
    pub message: String,

    /// Nominal rate of the next bracket, 0-100. `None` at the last bracket.
    pub next_bracket_rate_percent: Option<Decimal>,

    /// Bracket the projected revenue lands in under the current trend.
    pub projected_bracket: u8,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(WarningLevel::None < WarningLevel::Low);
        assert!(WarningLevel::Low < WarningLevel::Medium);
        assert!(WarningLevel::Medium < WarningLevel::High);
        assert!(WarningLevel::High < WarningLevel::Critical);
    }

    #[test]
    fn level_displays_lowercase_name() {
        assert_eq!(WarningLevel::None.to_string(), "none");
        assert_eq!(WarningLevel::Critical.to_string(), "critical");
    }

    #[test]
    fn default_warning_is_none() {
        let warning = BracketWarning::default();

        assert_eq!(warning.level, WarningLevel::None);
        assert!(!warning.is_approaching);
    }
}
