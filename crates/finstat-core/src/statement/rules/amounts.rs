//! Amount tokenization for fixed-layout statement lines.

use crate::error::AmountError;

use super::patterns::AMOUNT_TOKEN;

/// Raw amount tokens of a line, left to right.
pub fn amount_tokens(line: &str) -> Vec<&str> {
    AMOUNT_TOKEN.find_iter(line).map(|m| m.as_str()).collect()
}

/// Parse one amount token (e.g. "1,234.56" or "1,234.56-").
///
/// Commas are dropped and a trailing minus negates the value. A token that
/// is left without a parseable number is an error.
pub fn parse_amount(token: &str) -> Result<f64, AmountError> {
    let cleaned = token.replace(',', "");
    let (magnitude, negative) = match cleaned.strip_suffix('-') {
        Some(rest) => (rest, true),
        None => (cleaned.as_str(), false),
    };

    let value: f64 = magnitude.parse().map_err(|_| AmountError {
        token: token.to_string(),
    })?;

    Ok(if negative { -value } else { value })
}

/// Tokenize a line into amounts, failing on the first malformed token.
pub fn tokenize_amounts(line: &str) -> Result<Vec<f64>, AmountError> {
    AMOUNT_TOKEN
        .find_iter(line)
        .map(|m| parse_amount(m.as_str()))
        .collect()
}

/// Parse the first `count` tokens of a line.
///
/// Returns `Ok(None)` when the line carries fewer than `count` tokens.
pub fn leading_amounts(line: &str, count: usize) -> Result<Option<Vec<f64>>, AmountError> {
    let tokens = amount_tokens(line);
    if tokens.len() < count {
        return Ok(None);
    }

    tokens[..count]
        .iter()
        .map(|t| parse_amount(t))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
