//! Numeric token handling shared by the amount and line item rules.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::NUMBER_TOKEN;

/// Parse one numeric token. Malformed or overflowing tokens give `None`.
pub fn parse_number(token: &str) -> Option<Decimal> {
    Decimal::from_str(token.trim()).ok()
}

/// All numeric tokens in `text`, as written.
pub fn numeric_tokens(text: &str) -> Vec<&str> {
    NUMBER_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

/// All parseable amounts in `text`; unparseable tokens are dropped.
pub fn amounts_in(text: &str) -> Vec<Decimal> {
    numeric_tokens(text)
        .into_iter()
        .filter_map(parse_number)
        .collect()
}

/// Largest parseable amount in `text`.
pub fn max_amount(text: &str) -> Option<Decimal> {
    amounts_in(text).into_iter().max()
}
