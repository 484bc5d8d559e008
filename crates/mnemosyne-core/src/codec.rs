//! Decimal split/join codec
//!
//! Backend time-series columns hold a single double each, which silently
//! loses digits past ordinary float precision. The codec decomposes a
//! [`BigFloat`] into three integers that each fit a numeric column (the
//! whole part, the fractional digits read as an integer, and the count of
//! fractional leading zeros the integer reading drops) and reassembles the
//! exact value from them.
//!
//! Both directions are pure and deterministic: `join(split(x)) == x`.

use crate::bigfloat::BigFloat;
use crate::error::{CacheError, Result};

/// Split a value into `(whole, fraction_digits, leading_zero_count)`.
///
/// The fractional text is scanned from the left: consecutive `'0'`
/// characters up to the first non-zero digit become `leading_zero_count`,
/// the remaining suffix becomes `fraction_digits`. An all-zero fractional
/// text yields `(_, 0, 0)`.
///
/// # Example
/// ```
/// use mnemosyne_core::{codec, BigFloat};
///
/// let value: BigFloat = "1000000000.000000000012".parse().unwrap();
/// assert_eq!(codec::split(&value).unwrap(), (1000000000, 12, 10));
/// ```
pub fn split(value: &BigFloat) -> Result<(i64, i64, i64)> {
    let whole = parse_component(value.whole())?;
    let fraction = value.fraction();
    let leading_zeros = fraction.bytes().take_while(|b| *b == b'0').count();
    let digits = &fraction[leading_zeros..];
    if digits.is_empty() {
        // all-zero fractional text carries no digits and no zero count
        return Ok((whole, 0, 0));
    }
    Ok((whole, parse_component(digits)?, leading_zeros as i64))
}

/// Reassemble a value from its split components.
///
/// The fractional text is `leading_zero_count` zero characters followed by
/// the digits of `fraction_digits`; when both components are zero it is the
/// single digit `0`. Negative components are invalid.
pub fn join(whole: i64, fraction_digits: i64, leading_zero_count: i64) -> Result<BigFloat> {
    if whole < 0 || fraction_digits < 0 || leading_zero_count < 0 {
        return Err(CacheError::InvalidEncoding(format!(
            "negative component in ({}, {}, {})",
            whole, fraction_digits, leading_zero_count
        )));
    }
    let fraction = if fraction_digits == 0 && leading_zero_count == 0 {
        "0".to_string()
    } else {
        format!(
            "{}{}",
            "0".repeat(leading_zero_count as usize),
            fraction_digits
        )
    };
    BigFloat::new(&whole.to_string(), &fraction)
}

fn parse_component(digits: &str) -> Result<i64> {
    digits.parse::<i64>().map_err(|_| {
        CacheError::InvalidEncoding(format!("numeric component out of range: '{}'", digits))
    })
}
