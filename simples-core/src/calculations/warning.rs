//! Early warning for entities approaching the next bracket.
//!
//! Every call classifies from scratch; there is no stored state. Levels are
//! decided in this order:
//!
//! | Condition                                   | Level      |
//! |---------------------------------------------|------------|
//! | current bracket is the last one             | `none`     |
//! | projected revenue lands in a higher bracket | `critical` |
//! | bracket traversed ≥ `high` threshold        | `high`     |
//! | bracket traversed ≥ `medium` threshold      | `medium`   |
//! | bracket traversed ≥ `low` threshold         | `low`      |
//! | otherwise                                   | `none`     |
//!
//! A projected crossing outranks the percentage levels even when little of
//! the current bracket has been used: a spike carried forward is more urgent
//! than slow drift.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{clamp_percent, max, to_percent};
use crate::format::{format_currency, format_percent, ordinal};
use crate::{BracketTable, BracketWarning, TaxBracket, WarningLevel};

/// Percentage-of-bracket thresholds for each warning level, 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningThresholds {
    pub low: Decimal,
    pub medium: Decimal,
    pub high: Decimal,
}

impl Default for WarningThresholds {
    fn default() -> Self {
        Self {
            low: dec!(70),
            medium: dec!(85),
            high: dec!(95),
        }
    }
}

/// Classifies proximity to the next bracket.
#[derive(Debug, Clone, Copy)]
pub struct BracketWarningEngine<'a> {
    table: &'a BracketTable,
    thresholds: WarningThresholds,
}

impl<'a> BracketWarningEngine<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self::with_thresholds(table, WarningThresholds::default())
    }

    pub fn with_thresholds(
        table: &'a BracketTable,
        thresholds: WarningThresholds,
    ) -> Self {
        Self { table, thresholds }
    }

    /// Builds the warning for `current_revenue` in `current_bracket` given the
    /// `projected_revenue` for the full year.
    ///
    /// A bracket index outside the table is clamped into it.
    pub fn bracket_warning(
        &self,
        current_revenue: Decimal,
        projected_revenue: Decimal,
        current_bracket: u8,
    ) -> BracketWarning {
        let current = self.table.get_clamped(current_bracket);

        if self.table.is_last(current.index) {
            return BracketWarning {
                is_approaching: false,
                amount_until_next: Decimal::ZERO,
                percent_to_next: Decimal::ONE_HUNDRED,
                level: WarningLevel::None,
                message: "Você já está na última faixa do regime.".to_string(),
                next_bracket_rate_percent: None,
                projected_bracket: current.index,
            };
        }

        let amount_until_next = max(current.max_revenue - current_revenue, Decimal::ZERO);
        let percent_to_next = self.percent_traversed(current, current_revenue);
        let projected_bracket = self.table.lookup(projected_revenue).index;
        let crosses = projected_bracket > current.index;

        let level = self.level(percent_to_next, crosses);
        let next = self.table.get_clamped(current.index + 1);
        let next_rate_percent = to_percent(next.nominal_rate);

        debug!(
            current_bracket = current.index,
            projected_bracket,
            percent_to_next = %percent_to_next,
            level = %level,
            "bracket warning classified"
        );

        BracketWarning {
            is_approaching: percent_to_next >= self.thresholds.low || crosses,
            amount_until_next,
            percent_to_next,
            level,
            message: message(
                level,
                amount_until_next,
                percent_to_next,
                next_rate_percent,
                projected_bracket,
            ),
            next_bracket_rate_percent: Some(next_rate_percent),
            projected_bracket,
        }
    }

    /// Share of `bracket` traversed by `revenue`, clamped to 0-100.
    fn percent_traversed(
        &self,
        bracket: &TaxBracket,
        revenue: Decimal,
    ) -> Decimal {
        let width = bracket.max_revenue - bracket.min_revenue;
        if width <= Decimal::ZERO {
            return Decimal::ONE_HUNDRED;
        }
        clamp_percent((revenue - bracket.min_revenue) / width * Decimal::ONE_HUNDRED)
    }

    fn level(
        &self,
        percent_to_next: Decimal,
        crosses: bool,
    ) -> WarningLevel {
        if crosses {
            WarningLevel::Critical
        } else if percent_to_next >= self.thresholds.high {
            WarningLevel::High
        } else if percent_to_next >= self.thresholds.medium {
            WarningLevel::Medium
        } else if percent_to_next >= self.thresholds.low {
            WarningLevel::Low
        } else {
            WarningLevel::None
        }
    }
}

fn message(
    level: WarningLevel,
    amount_until_next: Decimal,
    percent_to_next: Decimal,
    next_rate_percent: Decimal,
    projected_bracket: u8,
) -> String {
    let amount = format_currency(amount_until_next);
    let rate = format_percent(next_rate_percent);

    match level {
        WarningLevel::None => String::new(),
        WarningLevel::Low => format!(
            "Você atingiu {} da faixa atual. Faltam {amount} para a próxima faixa (alíquota nominal de {rate}).",
            format_percent(percent_to_next)
        ),
        WarningLevel::Medium => format!(
            "Atenção: faltam apenas {amount} para a próxima faixa (alíquota nominal de {rate})."
        ),
        WarningLevel::High => format!(
            "Alerta: você está a {amount} de mudar de faixa. A próxima faixa tem alíquota nominal de {rate}."
        ),
        WarningLevel::Critical => format!(
            "Crítico: no ritmo atual o faturamento projetado leva à {} faixa. Faltam {amount} para sair da faixa atual; a próxima tem alíquota nominal de {rate}.",
            ordinal(projected_bracket)
        ),
    }
}
