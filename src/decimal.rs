//! Exact currency amounts.
//!
//! Wraps `rust_decimal::Decimal` so every balance comparison is done in
//! base 10. Arithmetic is never rescaled or rounded.

use rust_decimal::Decimal;
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

/// A currency amount with exact decimal arithmetic.
///
/// Equality and ordering are by numeric value, so `100` and `100.00` are
/// the same amount.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use moneybox::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

/// Errors produced when parsing a `Money` from text.
#[derive(Error, Debug)]
pub enum ParseMoneyError {
    #[error("invalid amount: {0}")]
    Invalid(#[from] rust_decimal::Error),

    /// The amount has digits below one cent.
    #[error("amount {0} is finer than one cent")]
    TooPrecise(String),
}

impl Money {
    /// Fractional digits accepted when parsing and shown when displaying.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Builds an amount from a whole number of cents.
    pub const fn from_cents(cents: u32) -> Self {
        Money(Decimal::from_parts(cents, 0, 0, false, Self::SCALE))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly below zero.
    pub fn is_negative(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_negative()
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Subtracts two amounts, returning `None` on overflow.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Money)
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        if decimal.normalize().scale() > Self::SCALE {
            return Err(ParseMoneyError::TooPrecise(trimmed.to_string()));
        }
        Ok(Money(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_zero() {
            return write!(f, "0.00");
        }
        // Drop trailing zeros past the cents, but never round real digits away.
        let mut value = self.0;
        if value.scale() > Self::SCALE && value.normalize().scale() <= Self::SCALE {
            value.rescale(Self::SCALE);
        }
        if value.scale() < Self::SCALE {
            write!(f, "{:.2}", value)
        } else {
            write!(f, "{}", value)
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}
