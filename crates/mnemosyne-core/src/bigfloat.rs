//! High-precision decimal values
//!
//! Ordinary 64-bit floats cannot round-trip decimals with long fractional
//! parts (12+ fractional digits at arbitrary whole-part magnitude), so the
//! cache keeps such values as exact digit strings and only narrows them to
//! numeric columns at the codec boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// An immutable decimal value with exact string round-trip.
///
/// Holds the whole part and the fractional part as digit strings, so values
/// like `1000000000.000000000012` keep every fractional digit, including
/// leading zeros. Values are non-negative; signs are rejected on parse.
///
/// # Example
/// ```
/// use mnemosyne_core::BigFloat;
///
/// let price: BigFloat = "1000000000.000000000012".parse().unwrap();
/// assert_eq!(price.to_string(), "1000000000.000000000012");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BigFloat {
    whole: String,
    fraction: String,
}

impl BigFloat {
    /// Create a value from whole-part and fractional-part digit strings.
    ///
    /// The whole part is normalized (leading zeros stripped, `0` kept for
    /// zero); the fractional text is kept verbatim. Non-digit characters or
    /// an empty component are rejected.
    pub fn new(whole: &str, fraction: &str) -> Result<Self, CacheError> {
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CacheError::InvalidEncoding(format!(
                "invalid whole part: '{}'",
                whole
            )));
        }
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CacheError::InvalidEncoding(format!(
                "invalid fractional part: '{}'",
                fraction
            )));
        }
        let trimmed = whole.trim_start_matches('0');
        let whole = if trimmed.is_empty() { "0" } else { trimmed };
        Ok(Self {
            whole: whole.to_string(),
            fraction: fraction.to_string(),
        })
    }

    /// Whole-part digits (no leading zeros)
    pub fn whole(&self) -> &str {
        &self.whole
    }

    /// Fractional digits, verbatim (may carry leading zeros)
    pub fn fraction(&self) -> &str {
        &self.fraction
    }
}

impl FromStr for BigFloat {
    type Err = CacheError;

    /// Parse a decimal string such as `"100.12"` or `"0.000000000012"`.
    /// A string without a fractional part parses with fractional text `"0"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((whole, fraction)) => Self::new(whole, fraction),
            None => Self::new(s, "0"),
        }
    }
}

impl fmt::Display for BigFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.whole, self.fraction)
    }
}

impl TryFrom<String> for BigFloat {
    type Error = CacheError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BigFloat> for String {
    fn from(value: BigFloat) -> Self {
        value.to_string()
    }
}
