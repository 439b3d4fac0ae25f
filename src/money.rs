//! Monetary parsing and formatting.
//!
//! Values reach the engine in many shapes: exact decimals from the catalog,
//! or text typed by a user in either `1.234,56` or `1,234.56` notation.
//! This module turns all of them into an optional [`Decimal`] and renders
//! decimals back in the `U$D 1.234,56` display format.
//!
//! "No value" is distinct from zero: arithmetic treats it as zero, but
//! display renders it as `—`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Prefix used when displaying amounts.
pub const CURRENCY_PREFIX: &str = "U$D";

/// Placeholder rendered for values that could not be parsed.
pub const NO_VALUE: &str = "—";

/// A user-editable monetary value.
///
/// Either an exact decimal (catalog data, JSON numbers) or raw text as it
/// was typed. Raw text is resolved lazily through [`parse_money_str`].
///
/// # Example
///
/// ```
/// use budget_engine::money::MoneyInput;
/// use rust_decimal::Decimal;
///
/// let typed = MoneyInput::from("1.234,56");
/// assert_eq!(typed.value(), Some(Decimal::new(123456, 2)));
///
/// let garbage = MoneyInput::from("n/a");
/// assert_eq!(garbage.value(), None);
/// assert_eq!(garbage.amount_or_zero(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoneyInput {
    /// An exact decimal amount.
    Amount(Decimal),
    /// Raw text, possibly using `,` as the decimal separator.
    Text(String),
}

impl MoneyInput {
    /// Resolves the input to a decimal, or `None` when it is not a number.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            MoneyInput::Amount(amount) => Some(*amount),
            MoneyInput::Text(text) => parse_money_str(text),
        }
    }

    /// Resolves the input for arithmetic, degrading "no value" to zero.
    pub fn amount_or_zero(&self) -> Decimal {
        self.value().unwrap_or(Decimal::ZERO)
    }
}

impl From<Decimal> for MoneyInput {
    fn from(value: Decimal) -> Self {
        MoneyInput::Amount(value)
    }
}

impl From<&str> for MoneyInput {
    fn from(value: &str) -> Self {
        MoneyInput::Text(value.to_string())
    }
}

impl From<String> for MoneyInput {
    fn from(value: String) -> Self {
        MoneyInput::Text(value)
    }
}

impl fmt::Display for MoneyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyInput::Amount(amount) => write!(f, "{}", amount),
            MoneyInput::Text(text) => f.write_str(text),
        }
    }
}

/// Parses a monetary input of any supported shape.
///
/// Equivalent to [`MoneyInput::value`].
pub fn parse_money(value: &MoneyInput) -> Option<Decimal> {
    value.value()
}

/// Parses a floating point number; non-finite values yield `None`.
pub fn parse_money_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Parses a monetary string using either `.` or `,` as decimal separator.
///
/// Everything except digits, `.`, `,` and `-` is discarded first, so
/// currency labels such as `"U$D"` are tolerated. When both separators are
/// present, the rightmost one is the decimal separator and the other one
/// groups thousands. A lone comma is always the decimal separator.
///
/// # Examples
///
/// ```
/// use budget_engine::money::parse_money_str;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_money_str("1.234,56"), Some(Decimal::new(123456, 2)));
/// assert_eq!(parse_money_str("1,234.56"), Some(Decimal::new(123456, 2)));
/// assert_eq!(parse_money_str("1234,5"), Some(Decimal::new(12345, 1)));
/// assert_eq!(parse_money_str("U$D 99"), Some(Decimal::new(99, 0)));
/// assert_eq!(parse_money_str(""), None);
/// assert_eq!(parse_money_str("abc"), None);
/// ```
pub fn parse_money_str(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    if cleaned.is_empty() || matches!(cleaned.as_str(), "-" | "." | ",") {
        return None;
    }

    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');

    let normalized = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replacen(',', ".", 1),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replacen(',', ".", 1),
        _ => cleaned,
    };

    parse_plain_decimal(&normalized)
}

/// Parses `-?digits[.digits]`, tolerating a bare leading or trailing point.
fn parse_plain_decimal(text: &str) -> Option<Decimal> {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let body = body.strip_suffix('.').unwrap_or(body);

    let well_formed = body.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && body.bytes().filter(|b| *b == b'.').count() <= 1;
    if !well_formed || !body.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let padded = if body.starts_with('.') {
        format!("{sign}0{body}")
    } else {
        format!("{sign}{body}")
    };

    Decimal::from_str(&padded).ok()
}

/// Rounds an amount to cents for presentation.
///
/// Midpoints round away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with `.` thousands grouping and `,` decimals.
///
/// # Example
///
/// ```
/// use budget_engine::money::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(12345678, 1)), "1.234.567,80");
/// assert_eq!(format_amount(Decimal::ZERO), "0,00");
/// ```
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = round_money(value);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.set_sign_positive(true);
    rounded.rescale(2);

    let text = rounded.to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if negative {
        format!("-{},{}", grouped, fraction)
    } else {
        format!("{},{}", grouped, fraction)
    }
}

/// Formats an amount with the currency prefix.
pub fn format_usd_amount(value: Decimal) -> String {
    format!("{} {}", CURRENCY_PREFIX, format_amount(value))
}

/// Formats any monetary input, rendering unparsable input as `—`.
///
/// # Example
///
/// ```
/// use budget_engine::money::{format_usd, MoneyInput};
///
/// assert_eq!(format_usd(&MoneyInput::from("1234567.8")), "U$D 1.234.567,80");
/// assert_eq!(format_usd(&MoneyInput::from("")), "—");
/// ```
pub fn format_usd(value: &MoneyInput) -> String {
    match value.value() {
        Some(amount) => format_usd_amount(amount),
        None => NO_VALUE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain_dot_decimal() {
        assert_eq!(parse_money_str("1234.56"), Some(dec("1234.56")));
    }

    #[test]
    fn test_parse_comma_decimal() {
        assert_eq!(parse_money_str("1234,56"), Some(dec("1234.56")));
    }

    #[test]
    fn test_parse_dot_grouping_with_comma_decimal() {
        assert_eq!(parse_money_str("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_money_str("1.234.567,89"), Some(dec("1234567.89")));
    }

    #[test]
    fn test_parse_comma_grouping_with_dot_decimal() {
        assert_eq!(parse_money_str("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_money_str("1,234,567.89"), Some(dec("1234567.89")));
    }

    #[test]
    fn test_parse_strips_currency_labels_and_spaces() {
        assert_eq!(parse_money_str("  U$D 1.500,00 "), Some(dec("1500.00")));
        assert_eq!(parse_money_str("USD 42"), Some(dec("42")));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(parse_money_str("-12,5"), Some(dec("-12.5")));
    }

    #[test]
    fn test_parse_leading_and_trailing_point() {
        assert_eq!(parse_money_str(".5"), Some(dec("0.5")));
        assert_eq!(parse_money_str("5."), Some(dec("5")));
        assert_eq!(parse_money_str("-,25"), Some(dec("-0.25")));
    }

    #[test]
    fn test_parse_empty_and_separator_only_is_no_value() {
        assert_eq!(parse_money_str(""), None);
        assert_eq!(parse_money_str("   "), None);
        assert_eq!(parse_money_str("-"), None);
        assert_eq!(parse_money_str("."), None);
        assert_eq!(parse_money_str(","), None);
    }

    #[test]
    fn test_parse_non_numeric_is_no_value() {
        assert_eq!(parse_money_str("abc"), None);
        assert_eq!(parse_money_str("1.2.3"), None);
        assert_eq!(parse_money_str("1,2,3"), None);
        assert_eq!(parse_money_str("5-5"), None);
    }

    #[test]
    fn test_parse_f64_rejects_non_finite() {
        assert_eq!(parse_money_f64(f64::NAN), None);
        assert_eq!(parse_money_f64(f64::INFINITY), None);
        assert_eq!(parse_money_f64(2.5), Some(dec("2.5")));
    }

    #[test]
    fn test_money_input_amount_or_zero() {
        assert_eq!(MoneyInput::from("oops").amount_or_zero(), Decimal::ZERO);
        assert_eq!(MoneyInput::from(dec("10.5")).amount_or_zero(), dec("10.5"));
    }

    #[test]
    fn test_money_input_deserializes_numbers_and_text() {
        let number: MoneyInput = serde_json::from_str("21").unwrap();
        assert_eq!(number.value(), Some(dec("21")));

        let text: MoneyInput = serde_json::from_str("\"1.234,56\"").unwrap();
        assert_eq!(text.value(), Some(dec("1234.56")));

        let garbage: MoneyInput = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(garbage, MoneyInput::Text("abc".to_string()));
    }

    #[test]
    fn test_round_money_midpoint_away_from_zero() {
        assert_eq!(round_money(dec("1.005")), dec("1.01"));
        assert_eq!(round_money(dec("-1.005")), dec("-1.01"));
        assert_eq!(round_money(dec("1.004")), dec("1.00"));
    }

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(dec("0")), "0,00");
        assert_eq!(format_amount(dec("999.9")), "999,90");
        assert_eq!(format_amount(dec("1000")), "1.000,00");
        assert_eq!(format_amount(dec("1234567.8")), "1.234.567,80");
    }

    #[test]
    fn test_format_amount_negative() {
        assert_eq!(format_amount(dec("-1234.5")), "-1.234,50");
        assert_eq!(format_amount(dec("-0.001")), "0,00");
    }

    #[test]
    fn test_format_usd_no_value() {
        assert_eq!(format_usd(&MoneyInput::from("n/a")), NO_VALUE);
        assert_eq!(format_usd(&MoneyInput::from("250")), "U$D 250,00");
    }

    proptest! {
        #[test]
        fn prop_format_then_parse_round_trips(cents in 0i64..100_000_000_000i64) {
            let value = Decimal::new(cents, 2);
            let parsed = parse_money_str(&format_usd_amount(value)).unwrap();
            prop_assert!((parsed - value).abs() <= dec("0.01"));
        }
    }
}
