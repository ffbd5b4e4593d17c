use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Number as JsonNumber;

use crate::{hash::hash_bytes, ParseError};

/// Significant digits kept after an arithmetic combination, enough to hide
/// binary floating-point representation error such as `0.1 + 0.2`.
pub const SIGNIFICANT_DIGITS: usize = 15;

/// Represents a JSON number using IEEE-754 double precision.
#[derive(Clone, Copy, Debug, PartialOrd)]
pub struct Number(f64);

impl Number {
    /// Creates a new [`Number`] after validating finiteness.
    ///
    /// ```
    /// # use json_addition_core::Number;
    /// let num = Number::new(42.0)?;
    /// assert_eq!(num.get(), 42.0);
    /// # Ok::<(), json_addition_core::ParseError>(())
    /// ```
    pub fn new(value: f64) -> Result<Self, ParseError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(ParseError::NotFinite { value })
        }
    }

    /// Returns the raw floating-point value.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Indicates whether the number has no fractional part.
    #[must_use]
    pub fn is_integral(self) -> bool {
        self.0.fract() == 0.0
    }

    /// Rounds the number to `digits` significant digits.
    ///
    /// ```
    /// # use json_addition_core::Number;
    /// let sum = Number::new(0.1 + 0.2)?;
    /// assert_eq!(sum.round_significant(15).get(), 0.3);
    /// # Ok::<(), json_addition_core::ParseError>(())
    /// ```
    #[must_use]
    pub fn round_significant(self, digits: usize) -> Self {
        if self.0 == 0.0 || digits == 0 {
            return self;
        }
        let rendered = format!("{:.*e}", digits - 1, self.0);
        match rendered.parse::<f64>() {
            Ok(rounded) if rounded.is_finite() => Self(rounded),
            _ => self,
        }
    }

    /// Computes the structural hash code of the number.
    #[must_use]
    pub fn hash_code(self) -> crate::hash::HashCode {
        // 0.0 and -0.0 compare equal and must hash alike.
        let normalized = if self.0 == 0.0 { 0.0_f64 } else { self.0 };
        hash_bytes(&normalized.to_le_bytes())
    }

    /// Converts the number into a `serde_json::Number` using minimal integer representation when possible.
    #[must_use]
    pub fn to_json_number(self) -> JsonNumber {
        if self.is_integral() {
            if (i64::MIN as f64) <= self.0 && self.0 < (i64::MAX as f64) {
                return JsonNumber::from(self.0 as i64);
            }
            if self.0 >= 0.0 && self.0 < (u64::MAX as f64) {
                return JsonNumber::from(self.0 as u64);
            }
        }
        // Finiteness is checked on construction.
        JsonNumber::from_f64(self.0).unwrap_or_else(|| JsonNumber::from(0))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

/// Shortest round-trip digits, laid out like ECMAScript `Number#toString`:
/// plain decimals for magnitudes in `[1e-6, 1e21)`, exponent form otherwise
/// (`2e-7`, `1e+21`). Negative zero prints as `0`.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            return f.write_str("0");
        }
        let scientific = format!("{:e}", self.0.abs());
        let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
        let count = i32::try_from(digits.len()).unwrap_or(i32::MAX);
        // Position of the decimal point relative to the first digit.
        let point = exponent + 1;

        if self.0 < 0.0 {
            f.write_str("-")?;
        }
        if count <= point && point <= 21 {
            let zeros = usize::try_from(point - count).unwrap_or(0);
            write!(f, "{digits}{}", "0".repeat(zeros))
        } else if 0 < point && point <= 21 {
            let (int, frac) = digits.split_at(usize::try_from(point).unwrap_or(0));
            write!(f, "{int}.{frac}")
        } else if -6 < point && point <= 0 {
            let zeros = usize::try_from(-point).unwrap_or(0);
            write!(f, "0.{}{digits}", "0".repeat(zeros))
        } else {
            let (first, rest) = digits.split_at(1);
            let sign = if exponent < 0 { '-' } else { '+' };
            if rest.is_empty() {
                write!(f, "{first}e{sign}{}", exponent.unsigned_abs())
            } else {
                write!(f, "{first}.{rest}e{sign}{}", exponent.unsigned_abs())
            }
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json_number().serialize(serializer)
    }
}
