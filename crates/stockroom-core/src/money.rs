//! # Money Module
//!
//! Provides the `Money` type for purchase and selling prices.
//!
//! ## Storage vs. Wire vs. Arithmetic
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE A PRICE LIVES                                                    │
//! │                                                                         │
//! │  JSON wire      12.5            ← decimal number (UI contract)         │
//! │  SQLite         REAL 12.5                                              │
//! │  MySQL          DECIMAL(10,2) 12.50                                    │
//! │  In memory      Money(1250)     ← integer cents, all arithmetic here   │
//! │                                                                         │
//! │  Decimal → cents rounds half away from zero on the binary value, so    │
//! │  2.005 (really 2.00499…) becomes 200. The UI sends two decimals.       │
//! │                                                                         │
//! │  +, -, × and += saturate at i64::MIN / i64::MAX instead of panicking.  │
//! │  Stock counts are unbounded client input.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price = Money::from_decimal(18.0).unwrap();
//! let stock_value = price * 200;
//! assert_eq!(stock_value.cents(), 360_000);
//! assert_eq!(stock_value.to_string(), "3600.00");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centimes).
///
/// ## Design Decisions
/// - **i64 (signed)**: margins can be negative when a product sells at a loss
/// - **Serialized as a decimal number**: the UI and the HTTP API speak
///   `12.5`, not `1250`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a decimal amount, rounding to the nearest cent.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.5).unwrap().cents(), 1250);
    /// assert!(Money::from_decimal(f64::NAN).is_err());
    /// ```
    pub fn from_decimal(amount: f64) -> CoreResult<Self> {
        if !amount.is_finite() {
            return Err(CoreError::InvalidAmount(amount.to_string()));
        }
        Ok(Money((amount * 100.0).round() as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal amount (for storage and the wire).
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity (price × units in stock).
    ///
    /// Saturates on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1800);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 5400);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses `"12.5"`, `" 18 "` or `"2.50"`.
///
/// MySQL drivers and HTML form fields both hand prices around as strings.
impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let amount: f64 = trimmed
            .parse()
            .map_err(|_| CoreError::InvalidAmount(trimmed.to_string()))?;
        Money::from_decimal(amount)
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal amount as a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom(format!("amount out of range: {v}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Money)
            .ok_or_else(|| E::custom(format!("amount out of range: {v}")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_decimal(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two decimals, no currency symbol (the UI appends "DH").
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_rounds_to_cents() {
        assert_eq!(Money::from_decimal(12.5).unwrap().cents(), 1250);
        assert_eq!(Money::from_decimal(0.1 + 0.2).unwrap().cents(), 30);
        assert_eq!(Money::from_decimal(2.005).unwrap().cents(), 200);
        assert!(Money::from_decimal(f64::INFINITY).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1250).to_string(), "12.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1800);
        let b = Money::from_cents(1250);

        assert_eq!((a - b).cents(), 550);
        assert_eq!((a + b).cents(), 3050);
        assert_eq!((b - a).cents(), -550);
        assert!((b - a).is_negative());
        assert_eq!((a * 200).cents(), 360_000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let price = Money::from_cents(1800);
        assert_eq!(price.multiply_quantity(10_i64.pow(16)), Money::from_cents(i64::MAX));
        assert_eq!(price * -(10_i64.pow(16)), Money::from_cents(i64::MIN));

        let mut total = Money::from_cents(i64::MAX - 1);
        total += price;
        assert_eq!(total.cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - price).cents(), i64::MIN);
        assert_eq!(Money::from_cents(i64::MAX) + price, Money::from_cents(i64::MAX));

        // Display must not overflow on the extreme value
        assert_eq!(Money::from_cents(i64::MIN).to_string(), "-92233720368547758.08");
    }

    #[test]
    fn test_parse_from_string() {
        assert_eq!("12.5".parse::<Money>().unwrap().cents(), 1250);
        assert_eq!(" 18 ".parse::<Money>().unwrap().cents(), 1800);
        assert!("douze".parse::<Money>().is_err());
    }

    #[test]
    fn test_serde_uses_decimal_numbers() {
        let price = Money::from_cents(1250);
        assert_eq!(serde_json::to_string(&price).unwrap(), "12.5");

        let from_float: Money = serde_json::from_str("18.0").unwrap();
        let from_int: Money = serde_json::from_str("18").unwrap();
        let from_text: Money = serde_json::from_str("\"18.00\"").unwrap();
        assert_eq!(from_float, from_int);
        assert_eq!(from_int, from_text);
        assert!(serde_json::from_str::<Money>("null").is_err());
    }
}
