//! # Money Module
//!
//! Provides the `Money` type for package prices and booking totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The catalog endpoint sends prices as JSON numbers: 1299.99            │
//! │    1299.99 * 2 = 2599.9799999999996  ❌ WRONG!                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Parse once at the wire boundary: 1299.99 → 129999 cents             │
//! │    129999 * 2 = 259998 cents → serialized back as 2599.98              │
//! │                                                                         │
//! │  Price filters compare cents too, so [min, max] is exact.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use wayfare_core::money::Money;
//!
//! let price = Money::from_cents(129_999); // $1299.99
//! let total = price * 2;                  // $2599.98
//! assert_eq!(total.to_string(), "$2599.98");
//! assert!(Money::from_major(10_000) > total);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Mul, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Wire Format
/// Serialized as a decimal JSON number (`1299.99`) because that is what the
/// remote catalog speaks. Conversion happens only at the serde boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Like [`Money::from_major`], but `None` when the amount has no cents
    /// representation in an `i64`.
    #[inline]
    pub const fn checked_from_major(major: i64) -> Option<Self> {
        match major.checked_mul(100) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Largest whole-unit amount [`Money::checked_from_major`] accepts.
    pub const MAX_MAJOR: i64 = i64::MAX / 100;

    /// Creates a Money value from a decimal amount, rounding to the nearest cent.
    ///
    /// Returns `None` for NaN or infinite input.
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        Some(Money((amount * 100.0).round() as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal amount (for the wire and display only).
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the amount is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount)
            .ok_or_else(|| serde::de::Error::custom("amount must be a finite number"))
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
        assert_eq!(Money::from_decimal(1299.99), Some(Money::from_cents(129_999)));
        assert_eq!(Money::from_decimal(0.1 + 0.2), Some(Money::from_cents(30)));
        assert_eq!(Money::from_decimal(f64::NAN), None);
        assert_eq!(Money::from_decimal(f64::INFINITY), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(129_999).to_string(), "$1299.99");
        assert_eq!(Money::from_major(5).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_checked_from_major_bounds() {
        assert_eq!(
            Money::checked_from_major(Money::MAX_MAJOR),
            Some(Money::from_cents(Money::MAX_MAJOR * 100))
        );
        assert_eq!(Money::checked_from_major(Money::MAX_MAJOR + 1), None);
        assert_eq!(Money::checked_from_major(100_000_000_000_000_000), None);
        assert_eq!(Money::checked_from_major(-3), Some(Money::from_cents(-300)));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert!((b - a).is_negative());
    }

    #[test]
    fn test_serializes_as_decimal_number() {
        let json = serde_json::to_string(&Money::from_cents(259_998)).unwrap();
        assert_eq!(json, "2599.98");

        let parsed: Money = serde_json::from_str("10000").unwrap();
        assert_eq!(parsed, Money::from_major(10_000));

        let parsed: Money = serde_json::from_str("899.99").unwrap();
        assert_eq!(parsed.cents(), 89_999);
    }
}
