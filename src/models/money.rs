//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Provides safe arithmetic operations and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
///
/// Using i64 cents avoids floating-point precision issues and supports
/// amounts up to approximately $92 quadrillion (both positive and negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use budgetbook::models::Money;
    /// let amount = Money::from_cents(1050); // $10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole dollars portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Convert to floating-point dollars (for summary arithmetic)
    pub fn to_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Format as a plain signed two-decimal string without a currency symbol
    ///
    /// `-1234` cents formats as `"-12.34"`. This is the canonical form used
    /// in content signatures, so it must stay byte-stable.
    pub fn format_plain(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "1,050.25", "(12.34)"
    /// (accounting negative), "10" (whole dollars).
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        // Strip currency symbols, thousands separators, and whitespace
        let cleaned: String = s
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '(' | ')'))
            .collect();

        // Parentheses denote negatives in accounting exports
        let (negative, cleaned) = if cleaned.starts_with('(') && cleaned.ends_with(')') {
            (true, &cleaned[1..cleaned.len() - 1])
        } else if let Some(stripped) = cleaned.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, cleaned.as_str())
        };

        if cleaned.is_empty() || cleaned.contains('(') || cleaned.contains(')') {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let cents = if let Some((whole, frac)) = cleaned.split_once('.') {
            if frac.contains('.') {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }
            let dollars: i64 = if whole.is_empty() {
                0
            } else {
                whole
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
            };
            // Pad or truncate the fractional part to 2 digits
            let frac_cents: i64 = match frac.len() {
                0 => 0,
                1 => {
                    frac.parse::<i64>()
                        .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                        * 10
                }
                _ => frac[..2]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?,
            };
            dollars * 100 + frac_cents
        } else {
            cleaned
                .parse::<i64>()
                .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                * 100
        };

        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
