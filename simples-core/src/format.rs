//! Brazilian Portuguese rendering of amounts, rates and bracket ordinals.
//!
//! Presentation only: nothing in the calculators depends on these strings.
//! Output follows the pt-BR convention of a comma as the decimal separator
//! and a dot between thousands.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Formats a currency amount as `R$ 1.234,56`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use simples_core::format::format_currency;
///
/// assert_eq!(format_currency(dec!(1234567.891)), "R$ 1.234.567,89");
/// assert_eq!(format_currency(dec!(-54000)), "-R$ 54.000,00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}R$ {}", format_number(rounded.abs(), 2))
}

/// Formats a 0-100 percentage as `11,20%`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use simples_core::format::format_percent;
///
/// assert_eq!(format_percent(dec!(11.2)), "11,20%");
/// ```
pub fn format_percent(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{}%", format_number(rounded.abs(), 2))
}

/// Feminine ordinal used for brackets ("faixa"): `2ª`.
pub fn ordinal(n: u8) -> String {
    format!("{n}ª")
}

/// Localized month name for a 1-based month, or `None` outside 1-12.
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(index).copied()
}

/// Renders a non-negative value with `decimals` fraction digits, grouping the
/// integer part in thousands.
fn format_number(
    value: Decimal,
    decimals: usize,
) -> String {
    let plain = format!("{value:.decimals$}");
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), ""));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit);
    }

    if frac_part.is_empty() {
        grouped
    } else {
        format!("{grouped},{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // format_currency tests
    // =========================================================================

    #[test]
    fn currency_small_amount_has_no_grouping() {
        assert_eq!(format_currency(dec!(856.4622)), "R$ 856,46");
    }

    #[test]
    fn currency_groups_thousands_with_dots() {
        assert_eq!(format_currency(dec!(4800000)), "R$ 4.800.000,00");
    }

    #[test]
    fn currency_rounds_half_up() {
        assert_eq!(format_currency(dec!(0.005)), "R$ 0,01");
    }

    #[test]
    fn currency_zero() {
        assert_eq!(format_currency(dec!(0)), "R$ 0,00");
    }

    #[test]
    fn currency_negative_keeps_sign_in_front() {
        assert_eq!(format_currency(dec!(-1234.5)), "-R$ 1.234,50");
    }

    // =========================================================================
    // format_percent tests
    // =========================================================================

    #[test]
    fn percent_uses_comma_separator() {
        assert_eq!(format_percent(dec!(7.7333333)), "7,73%");
    }

    #[test]
    fn percent_whole_number() {
        assert_eq!(format_percent(dec!(33)), "33,00%");
    }

    // =========================================================================
    // ordinal / month_name tests
    // =========================================================================

    #[test]
    fn ordinal_uses_feminine_suffix() {
        assert_eq!(ordinal(2), "2ª");
    }

    #[test]
    fn month_names_cover_the_year() {
        assert_eq!(month_name(1), Some("Janeiro"));
        assert_eq!(month_name(3), Some("Março"));
        assert_eq!(month_name(12), Some("Dezembro"));
    }

    #[test]
    fn month_name_rejects_out_of_range() {
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
