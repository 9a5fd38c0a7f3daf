//! Domain error model.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// lifecycle, balance). Infrastructure concerns belong elsewhere. None of
/// these is fatal: the caller recovers by correcting input or choosing an
/// alternate action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank required field, negative amount,
    /// future-dated document).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An operation was attempted against an aggregate in the wrong lifecycle
    /// state (e.g. adding a line to a posted entry).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Debit/credit sums differed at post time.
    #[error("unbalanced entry: total debit {total_debit} != total credit {total_credit}")]
    Unbalanced {
        total_debit: Decimal,
        total_credit: Decimal,
    },

    /// A uniqueness or concurrency conflict (e.g. duplicate entry number).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,

    /// Authorization failure at the domain boundary.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn unbalanced(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self::Unbalanced {
            total_debit,
            total_credit,
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
