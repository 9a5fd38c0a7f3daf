//! Money value object: exact decimal amount bound to a currency.
//!
//! Never use floating point for monetary amounts; `rust_decimal::Decimal`
//! keeps sums exact so balance checks can use strict equality.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Currencies accepted by the bookkeeping core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Vietnamese Dong (default bookkeeping currency).
    Vnd,
    /// US Dollar.
    Usd,
    /// Euro.
    Eur,
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Vnd => f.write_str("VND"),
            Self::Usd => f.write_str("USD"),
            Self::Eur => f.write_str("EUR"),
        }
    }
}

impl core::str::FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VND" => Ok(Self::Vnd),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            other => Err(DomainError::validation(format!("unknown currency: {other}"))),
        }
    }
}

/// A non-negative decimal amount in a single currency.
///
/// Journal amounts are never negative; direction is carried by the
/// debit/credit side of a line, not by the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Create a validated amount. Fails on negative input.
    pub fn new(amount: Decimal, currency: Currency) -> DomainResult<Self> {
        if amount.is_sign_negative() {
            return Err(DomainError::validation(format!(
                "amount must not be negative, got {amount}"
            )));
        }
        Ok(Self { amount, currency })
    }

    /// Zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    fn ensure_same_currency(&self, other: &Self) -> DomainResult<()> {
        if self.currency != other.currency {
            return Err(DomainError::validation(format!(
                "currency mismatch: {} vs {}",
                self.currency, other.currency
            )));
        }
        Ok(())
    }

    /// Checked addition; both operands must share a currency.
    pub fn try_add(&self, other: &Self) -> DomainResult<Self> {
        self.ensure_same_currency(other)?;
        Ok(Self {
            amount: self.amount + other.amount,
            currency: self.currency,
        })
    }

    /// Checked subtraction; result must not go negative.
    pub fn try_sub(&self, other: &Self) -> DomainResult<Self> {
        self.ensure_same_currency(other)?;
        let result = self.amount - other.amount;
        if result.is_sign_negative() {
            return Err(DomainError::validation(format!(
                "subtraction would produce a negative amount: {} - {}",
                self.amount, other.amount
            )));
        }
        Ok(Self {
            amount: result,
            currency: self.currency,
        })
    }

    /// Compare two amounts. Ordering across currencies is undefined, so a
    /// mismatch is an error rather than a silent answer.
    pub fn try_cmp(&self, other: &Self) -> DomainResult<core::cmp::Ordering> {
        self.ensure_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    /// Sum an iterator of amounts into the given currency.
    ///
    /// An empty iterator sums to zero. Fails on the first currency mismatch.
    pub fn sum<'a>(
        monies: impl IntoIterator<Item = &'a Money>,
        currency: Currency,
    ) -> DomainResult<Self> {
        let mut total = Self::zero(currency);
        for money in monies {
            total = total.try_add(money)?;
        }
        Ok(total)
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
