//! Money type with exact minor-unit arithmetic and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! An `Amount` stores integer minor units (e.g. cents). Scalar math goes
//! through `rust_decimal::Decimal` and rounds with Banker's Rounding at the
//! currency's exponent.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by amount construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Input could not be parsed, or carries more fractional digits than the
    /// currency allows.
    #[error("Invalid amount format: {input:?}")]
    InvalidFormat {
        /// The rejected input.
        input: String,
    },

    /// Two amounts of different currencies were combined.
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: Currency,
        /// Currency of the right operand.
        right: Currency,
    },

    /// Division (or distribution) by zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// Result does not fit into the minor-unit range.
    #[error("Amount overflow")]
    Overflow,

    /// Unknown ISO 4217 code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

impl AmountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidFormat { .. } => "INVALID_FORMAT",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::Overflow => "AMOUNT_OVERFLOW",
            Self::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
        }
    }
}

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Indonesian Rupiah
    Idr,
    /// Euro
    #[default]
    Eur,
    /// Singapore Dollar
    Sgd,
    /// Japanese Yen
    Jpy,
    /// Swiss Franc
    Chf,
    /// Pound Sterling
    Gbp,
}

impl Currency {
    /// Number of fractional digits of the minor unit.
    #[must_use]
    pub const fn exponent(self) -> u32 {
        match self {
            Self::Jpy => 0,
            Self::Usd | Self::Idr | Self::Eur | Self::Sgd | Self::Chf | Self::Gbp => 2,
        }
    }

    /// Minor units per major unit (`10^exponent`).
    #[must_use]
    pub const fn minor_per_major(self) -> i64 {
        10_i64.pow(self.exponent())
    }

    /// Returns the ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Idr => "IDR",
            Self::Eur => "EUR",
            Self::Sgd => "SGD",
            Self::Jpy => "JPY",
            Self::Chf => "CHF",
            Self::Gbp => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "IDR" => Ok(Self::Idr),
            "EUR" => Ok(Self::Eur),
            "SGD" => Ok(Self::Sgd),
            "JPY" => Ok(Self::Jpy),
            "CHF" => Ok(Self::Chf),
            "GBP" => Ok(Self::Gbp),
            _ => Err(AmountError::UnknownCurrency(s.to_string())),
        }
    }
}

/// A monetary amount in integer minor units.
///
/// `i64::MIN` is excluded from the value range, so negation never overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AmountRepr", into = "AmountRepr")]
pub struct Amount {
    minor_units: i64,
    currency: Currency,
}

#[derive(Serialize, Deserialize)]
struct AmountRepr {
    minor_units: i64,
    currency: Currency,
}

impl TryFrom<AmountRepr> for Amount {
    type Error = AmountError;

    fn try_from(repr: AmountRepr) -> Result<Self, Self::Error> {
        Self::from_minor_units(repr.minor_units, repr.currency)
    }
}

impl From<Amount> for AmountRepr {
    fn from(amount: Amount) -> Self {
        Self {
            minor_units: amount.minor_units,
            currency: amount.currency,
        }
    }
}

impl Amount {
    /// Creates an amount from integer minor units.
    pub fn from_minor_units(minor_units: i64, currency: Currency) -> Result<Self, AmountError> {
        if minor_units == i64::MIN {
            return Err(AmountError::Overflow);
        }
        Ok(Self {
            minor_units,
            currency,
        })
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            minor_units: 0,
            currency,
        }
    }

    /// Parses a decimal string such as `"123.45"` or `"-7"`.
    ///
    /// Significant fractional digits may not exceed the currency's exponent;
    /// trailing zeros are ignored, as in [`from_decimal`](Self::from_decimal).
    pub fn parse(input: &str, currency: Currency) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        let invalid = || AmountError::InvalidFormat {
            input: input.to_string(),
        };
        let well_formed = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'));
        if !well_formed {
            return Err(invalid());
        }
        let value = Decimal::from_str(trimmed).map_err(|_| invalid())?;
        if !fits_exponent(value, currency) {
            return Err(invalid());
        }
        Self::from_exact_decimal(value, currency)
    }

    /// Creates an amount from a decimal with at most `exponent` significant
    /// fractional digits.
    pub fn from_decimal(value: Decimal, currency: Currency) -> Result<Self, AmountError> {
        if !fits_exponent(value, currency) {
            return Err(AmountError::InvalidFormat {
                input: value.to_string(),
            });
        }
        Self::from_exact_decimal(value, currency)
    }

    /// Rounds a decimal to the currency exponent with Banker's Rounding.
    pub fn from_decimal_rounded(value: Decimal, currency: Currency) -> Result<Self, AmountError> {
        let rounded =
            value.round_dp_with_strategy(currency.exponent(), RoundingStrategy::MidpointNearestEven);
        Self::from_exact_decimal(rounded, currency)
    }

    fn from_exact_decimal(value: Decimal, currency: Currency) -> Result<Self, AmountError> {
        let minor = value
            .checked_mul(Decimal::from(currency.minor_per_major()))
            .ok_or(AmountError::Overflow)?;
        let minor_units = minor.trunc().to_i64().ok_or(AmountError::Overflow)?;
        Self::from_minor_units(minor_units, currency)
    }

    /// The value in minor units.
    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.minor_units
    }

    /// The currency of this amount.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// The value as a decimal at the currency exponent.
    #[must_use]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.minor_units, self.currency.exponent())
    }

    fn ensure_same_currency(&self, other: &Self) -> Result<(), AmountError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(AmountError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            })
        }
    }

    /// Adds two amounts of the same currency.
    pub fn add(&self, other: &Self) -> Result<Self, AmountError> {
        self.ensure_same_currency(other)?;
        let units = self
            .minor_units
            .checked_add(other.minor_units)
            .ok_or(AmountError::Overflow)?;
        Self::from_minor_units(units, self.currency)
    }

    /// Subtracts `other` from `self`.
    pub fn subtract(&self, other: &Self) -> Result<Self, AmountError> {
        self.ensure_same_currency(other)?;
        let units = self
            .minor_units
            .checked_sub(other.minor_units)
            .ok_or(AmountError::Overflow)?;
        Self::from_minor_units(units, self.currency)
    }

    /// Returns the amount with its sign flipped.
    #[must_use]
    pub const fn negate(&self) -> Self {
        Self {
            minor_units: -self.minor_units,
            currency: self.currency,
        }
    }

    /// Returns the absolute value.
    #[must_use]
    pub const fn abs(&self) -> Self {
        Self {
            minor_units: self.minor_units.abs(),
            currency: self.currency,
        }
    }

    /// Multiplies by a scalar, rounding half-to-even at the currency exponent.
    pub fn multiply(&self, factor: Decimal) -> Result<Self, AmountError> {
        let product = self
            .to_decimal()
            .checked_mul(factor)
            .ok_or(AmountError::Overflow)?;
        Self::from_decimal_rounded(product, self.currency)
    }

    /// Divides by a scalar, rounding half-to-even at the currency exponent.
    pub fn divide(&self, divisor: Decimal) -> Result<Self, AmountError> {
        if divisor.is_zero() {
            return Err(AmountError::DivisionByZero);
        }
        let quotient = self
            .to_decimal()
            .checked_div(divisor)
            .ok_or(AmountError::Overflow)?;
        Self::from_decimal_rounded(quotient, self.currency)
    }

    /// Sums amounts of `currency`; the empty sum is zero.
    pub fn sum<'a, I>(currency: Currency, amounts: I) -> Result<Self, AmountError>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::zero(currency), |acc, amount| acc.add(amount))
    }

    /// Compares two amounts of the same currency.
    pub fn checked_cmp(&self, other: &Self) -> Result<Ordering, AmountError> {
        self.ensure_same_currency(other)?;
        Ok(self.minor_units.cmp(&other.minor_units))
    }

    /// Returns true if `self < other`.
    pub fn less_than(&self, other: &Self) -> Result<bool, AmountError> {
        Ok(self.checked_cmp(other)? == Ordering::Less)
    }

    /// Returns true if `self > other`.
    pub fn greater_than(&self, other: &Self) -> Result<bool, AmountError> {
        Ok(self.checked_cmp(other)? == Ordering::Greater)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.minor_units == 0
    }

    /// Returns true if the amount is greater than zero.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.minor_units > 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.minor_units < 0
    }
}

fn fits_exponent(value: Decimal, currency: Currency) -> bool {
    value.normalize().scale() <= currency.exponent()
}

/// Canonical machine-readable form, e.g. `123.45`, `-0.05`, `1500` (JPY).
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
