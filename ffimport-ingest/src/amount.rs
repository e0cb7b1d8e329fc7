//! Amount text -> signed decimal.

use std::str::FromStr;

use log::warn;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::types::{Direction, SignConvention};

const CURRENCY_SYMBOLS: [char; 3] = ['₹', '$', '€'];

/// A well-formed number too large to carry as a two-decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("amount `{raw}` is out of range")]
pub struct AmountRangeError {
    pub raw: String,
}

/// Parse statement amount text into a signed value rounded to two decimals.
///
/// Whitespace and thousands separators are dropped, then a leading currency
/// symbol. If the remainder is not a number, every character other than
/// digits, `.` and `-` is filtered out and parsing is retried. Text that is
/// still not a number is zero. Only numbers beyond `Decimal`'s range fail.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountRangeError> {
    let out_of_range = || AmountRangeError {
        raw: raw.to_string(),
    };

    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let unsymboled = cleaned.trim_start_matches(CURRENCY_SYMBOLS).trim();

    let value = match parse_decimal(unsymboled) {
        Some(v) => v,
        None if is_number(unsymboled) => return Err(out_of_range()),
        None => {
            let filtered: String = unsymboled
                .chars()
                .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
                .collect();
            match parse_decimal(&filtered) {
                Some(v) => {
                    warn!("amount `{raw}` read as {v} after dropping non-numeric characters");
                    v
                }
                None if is_number(&filtered) => return Err(out_of_range()),
                None => {
                    warn!("amount `{raw}` is not a number; using 0.00");
                    Decimal::ZERO
                }
            }
        }
    };

    Ok(value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Split a signed amount into its magnitude (scale 2) and direction.
///
/// `None` when the magnitude is too large to hold two fraction digits.
pub fn split_sign(value: Decimal, convention: SignConvention) -> Option<(Decimal, Direction)> {
    let direction = convention.direction(value < Decimal::ZERO);
    let mut magnitude = value.abs();
    magnitude.rescale(2);
    // rescale silently settles for a smaller scale near the top of the range
    if magnitude.scale() != 2 {
        return None;
    }
    Some((magnitude, direction))
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// `[+-]digits[.digits][e[+-]digits]`
fn is_number(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e.strip_prefix(['+', '-']).unwrap_or(e))),
        None => (unsigned, None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());

    !(int.is_empty() && frac.is_empty())
        && digits(int)
        && digits(frac)
        && exponent.is_none_or(|e| !e.is_empty() && digits(e))
}
