use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Number of brackets in the regime schedule.
pub const BRACKET_COUNT: usize = 6;

/// One revenue band of the progressive schedule.
///
/// Bounds are inclusive and expressed in trailing-12-month revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// 1-based position in the schedule.
    pub index: u8,
    pub min_revenue: Decimal,
    pub max_revenue: Decimal,
    /// Rate printed on the schedule, as a fraction.
    pub nominal_rate: Decimal,
    /// Amount subtracted in the effective-rate formula.
    pub deduction: Decimal,
}

impl TaxBracket {
    /// Whether `revenue` falls within this bracket's inclusive bounds.
    pub fn contains(
        &self,
        revenue: Decimal,
    ) -> bool {
        revenue >= self.min_revenue && revenue <= self.max_revenue
    }

    /// Effective rate for a positive trailing revenue, as a fraction.
    ///
    /// Returns `None` when `revenue` is zero or negative; the formula is
    /// undefined there and callers pick their own default.
    pub fn effective_rate(
        &self,
        revenue: Decimal,
    ) -> Option<Decimal> {
        if revenue <= Decimal::ZERO {
            return None;
        }
        Some((revenue * self.nominal_rate - self.deduction) / revenue)
    }

    /// Revenue representative of the bracket: its midpoint, or half the
    /// ceiling for a bracket starting at zero.
    pub fn representative_revenue(&self) -> Decimal {
        if self.min_revenue.is_zero() {
            self.max_revenue / Decimal::TWO
        } else {
            (self.min_revenue + self.max_revenue) / Decimal::TWO
        }
    }
}

/// The fixed, ordered bracket schedule.
///
/// The table is immutable once built and is handed to every calculator
/// explicitly; nothing in the crate reads it from a global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTable {
    brackets: [TaxBracket; BRACKET_COUNT],
}

impl BracketTable {
    /// Builds a table from six brackets ordered by revenue.
    pub fn new(brackets: [TaxBracket; BRACKET_COUNT]) -> Self {
        Self { brackets }
    }

    /// The Simples Nacional service-activity schedule.
    pub fn simples_nacional() -> Self {
        Self::new([
            TaxBracket {
                index: 1,
                min_revenue: dec!(0.00),
                max_revenue: dec!(180000.00),
                nominal_rate: dec!(0.06),
                deduction: dec!(0),
            },
            TaxBracket {
                index: 2,
                min_revenue: dec!(180000.01),
                max_revenue: dec!(360000.00),
                nominal_rate: dec!(0.112),
                deduction: dec!(9360),
            },
            TaxBracket {
                index: 3,
                min_revenue: dec!(360000.01),
                max_revenue: dec!(720000.00),
                nominal_rate: dec!(0.135),
                deduction: dec!(17640),
            },
            TaxBracket {
                index: 4,
                min_revenue: dec!(720000.01),
                max_revenue: dec!(1800000.00),
                nominal_rate: dec!(0.16),
                deduction: dec!(35640),
            },
            TaxBracket {
                index: 5,
                min_revenue: dec!(1800000.01),
                max_revenue: dec!(3600000.00),
                nominal_rate: dec!(0.21),
                deduction: dec!(125640),
            },
            TaxBracket {
                index: 6,
                min_revenue: dec!(3600000.01),
                max_revenue: dec!(4800000.00),
                nominal_rate: dec!(0.33),
                deduction: dec!(648000),
            },
        ])
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn first(&self) -> &TaxBracket {
        &self.brackets[0]
    }

    pub fn last(&self) -> &TaxBracket {
        &self.brackets[BRACKET_COUNT - 1]
    }

    /// Maximum trailing revenue the regime supports.
    pub fn ceiling(&self) -> Decimal {
        self.last().max_revenue
    }

    /// Bracket by 1-based index; `None` outside `1..=6`.
    pub fn get(
        &self,
        index: u8,
    ) -> Option<&TaxBracket> {
        let position = usize::from(index).checked_sub(1)?;
        self.brackets.get(position)
    }

    /// Bracket by 1-based index, clamping out-of-range values into the table.
    pub fn get_clamped(
        &self,
        index: u8,
    ) -> &TaxBracket {
        let position = usize::from(index).clamp(1, BRACKET_COUNT) - 1;
        &self.brackets[position]
    }

    /// Whether `index` names the terminal bracket (or beyond it).
    pub fn is_last(
        &self,
        index: u8,
    ) -> bool {
        usize::from(index) >= BRACKET_COUNT
    }

    /// Finds the bracket containing `revenue`.
    ///
    /// Zero and negative revenue resolve to the first bracket, revenue above
    /// the ceiling to the last. Values falling in the sub-cent gap between two
    /// brackets resolve to the upper one.
    pub fn lookup(
        &self,
        revenue: Decimal,
    ) -> &TaxBracket {
        self.brackets
            .iter()
            .find(|b| revenue <= b.max_revenue)
            .unwrap_or_else(|| self.last())
    }
}

impl Default for BracketTable {
    fn default() -> Self {
        Self::simples_nacional()
    }
}
