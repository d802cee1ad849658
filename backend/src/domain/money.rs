//! Monetary amounts with a currency.
//!
//! Amounts are held as integer minor units (cents) so arithmetic is exact.
//! Construction from a decimal rounds half away from zero to two places.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency used when callers do not supply one.
pub const DEFAULT_CURRENCY: &str = "BRL";

const MINOR_UNIT_SCALE: u32 = 2;

/// Validation and arithmetic failures for [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    /// Amounts may not be negative.
    #[error("Amount must be non-negative")]
    Negative,
    /// The amount does not fit in the supported range.
    #[error("Amount is out of range")]
    OutOfRange,
    /// Currency codes are three ASCII letters.
    #[error("Invalid currency code: {code}")]
    InvalidCurrency { code: String },
    /// Arithmetic between different currencies.
    #[error("Currency mismatch")]
    CurrencyMismatch,
    /// Subtraction would drop below zero.
    #[error("Resulting amount cannot be negative")]
    NegativeResult,
}

/// Upper-case three letter currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency(String);

impl Currency {
    /// Normalise and validate a currency code.
    ///
    /// # Examples
    /// ```
    /// use ticketing::domain::Currency;
    ///
    /// let usd = Currency::new(" usd ").unwrap();
    /// assert_eq!(usd.as_str(), "USD");
    /// assert!(Currency::new("dollars").is_err());
    /// ```
    pub fn new(code: impl AsRef<str>) -> Result<Self, MoneyError> {
        let normalised = code.as_ref().trim().to_ascii_uppercase();
        let valid = normalised.len() == 3 && normalised.chars().all(|c| c.is_ascii_uppercase());
        if !valid {
            return Err(MoneyError::InvalidCurrency {
                code: code.as_ref().to_owned(),
            });
        }
        Ok(Self(normalised))
    }

    /// Borrow the code.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(DEFAULT_CURRENCY.to_owned())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-negative amount of money in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Money {
    cents: i64,
    currency: Currency,
}

impl Money {
    /// Build money from a decimal amount, rounding to two decimal places.
    ///
    /// # Examples
    /// ```
    /// use rust_decimal::Decimal;
    /// use ticketing::domain::{Currency, Money};
    ///
    /// let price = Money::new(Decimal::new(10_005, 3), Currency::default()).unwrap();
    /// assert_eq!(price.cents(), 1_001);
    /// ```
    pub fn new(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        let rounded =
            amount.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        let cents = rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|value| value.to_i64())
            .ok_or(MoneyError::OutOfRange)?;
        Self::from_cents(cents, currency)
    }

    /// Build money from integer minor units.
    pub fn from_cents(cents: i64, currency: Currency) -> Result<Self, MoneyError> {
        if cents < 0 {
            return Err(MoneyError::Negative);
        }
        Ok(Self { cents, currency })
    }

    /// Zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self { cents: 0, currency }
    }

    /// Decimal amount with two decimal places.
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.cents, MINOR_UNIT_SCALE)
    }

    /// Amount in minor units.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Currency of the amount.
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Sum two amounts of the same currency.
    pub fn add(&self, other: &Self) -> Result<Self, MoneyError> {
        self.ensure_same_currency(other)?;
        let cents = self
            .cents
            .checked_add(other.cents)
            .ok_or(MoneyError::OutOfRange)?;
        Ok(Self {
            cents,
            currency: self.currency.clone(),
        })
    }

    /// Subtract `other`, refusing to go below zero.
    pub fn subtract(&self, other: &Self) -> Result<Self, MoneyError> {
        self.ensure_same_currency(other)?;
        if other.cents > self.cents {
            return Err(MoneyError::NegativeResult);
        }
        Ok(Self {
            cents: self.cents - other.cents,
            currency: self.currency.clone(),
        })
    }

    /// Multiply by a unit count, e.g. ticket price times quantity.
    pub fn multiply(&self, quantity: u32) -> Result<Self, MoneyError> {
        let cents = self
            .cents
            .checked_mul(i64::from(quantity))
            .ok_or(MoneyError::OutOfRange)?;
        Ok(Self {
            cents,
            currency: self.currency.clone(),
        })
    }

    /// Whether `self` is at least `other`; both must share a currency.
    pub fn covers(&self, other: &Self) -> Result<bool, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.cents >= other.cents)
    }

    fn ensure_same_currency(&self, other: &Self) -> Result<(), MoneyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount(), self.currency)
    }
}
