//! Amount type
//!
//! Domain primitives for monetary values.
//! Amounts are validated at construction time and stored as integer
//! minor units (cents), so ledger aggregation is always exact.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum amount accepted for a single movement (1 trillion)
const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Maximum decimal places (cents)
const MAX_SCALE: u32 = 2;

/// Amount represents a validated, strictly positive monetary value.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - Maximum 2 decimal places
/// - Maximum value is 1 trillion
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use piggy_bank::domain::Amount;
///
/// let amount = Amount::new(Decimal::new(1050, 2)).unwrap();
/// assert_eq!(amount.minor_units(), 1050);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "AmountInput", into = "Decimal")]
pub struct Amount {
    minor: i64,
}

/// Errors that can occur when creating an Amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be positive (got {0})")]
    NotPositive(Decimal),

    #[error("Amount has too many decimal places (max {MAX_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Amount exceeds maximum allowed value ({MAX_AMOUNT})")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    /// - `AmountError::TooManyDecimals` if more than 2 significant decimal places
    /// - `AmountError::Overflow` if value > 1 trillion
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }

        // 10.50 and 10.5 are the same amount; only significant digits count
        let scale = value.normalize().scale();
        if scale > MAX_SCALE {
            return Err(AmountError::TooManyDecimals(scale));
        }

        if value > Decimal::from(MAX_AMOUNT) {
            return Err(AmountError::Overflow);
        }

        let minor = (value * Decimal::ONE_HUNDRED)
            .to_i64()
            .ok_or(AmountError::Overflow)?;

        Ok(Self { minor })
    }

    /// Create an Amount from a whole number of currency units.
    pub fn from_integer(value: i64) -> Result<Self, AmountError> {
        Self::new(Decimal::from(value))
    }

    /// Get the value as a Decimal with two decimal places.
    pub fn value(&self) -> Decimal {
        Decimal::new(self.minor, MAX_SCALE)
    }

    /// Value in minor units, as persisted in the transaction log.
    pub fn minor_units(&self) -> i64 {
        self.minor
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let decimal = Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_err(|e| AmountError::ParseError(e.to_string()))?;
        Amount::new(decimal)
    }
}

impl TryFrom<&serde_json::Number> for Amount {
    type Error = AmountError;

    /// JSON numbers go through their textual form so that `10.1` stays
    /// `10.1` instead of picking up binary float noise.
    fn try_from(value: &serde_json::Number) -> Result<Self, Self::Error> {
        Amount::from_str(&value.to_string())
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

/// Wire forms accepted for an amount: `12.5` or `"12.50"`
#[derive(Deserialize)]
#[serde(untagged)]
enum AmountInput {
    Number(serde_json::Number),
    Text(String),
}

impl TryFrom<AmountInput> for Amount {
    type Error = AmountError;

    fn try_from(input: AmountInput) -> Result<Self, Self::Error> {
        match input {
            AmountInput::Number(n) => Amount::try_from(&n),
            AmountInput::Text(s) => Amount::from_str(&s),
        }
    }
}

/// Balance is the aggregate of an account's ledger entries.
///
/// It is never persisted; every Balance comes from summing the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(into = "Decimal")]
pub struct Balance(i64);

impl Balance {
    /// Create a zero balance
    pub fn zero() -> Self {
        Self(0)
    }

    /// Build a balance from an aggregated sum of minor units
    pub fn from_minor_units(minor: i64) -> Self {
        Self(minor)
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }

    /// Get the value as a Decimal with two decimal places
    pub fn value(&self) -> Decimal {
        Decimal::new(self.0, MAX_SCALE)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if balance is sufficient for a withdrawal of `amount`
    pub fn covers(&self, amount: &Amount) -> bool {
        self.0 >= amount.minor_units()
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl From<Balance> for Decimal {
    fn from(balance: Balance) -> Self {
        balance.value()
    }
}
