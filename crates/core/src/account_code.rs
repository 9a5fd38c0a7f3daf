//! Account code value object.
//!
//! Chart-of-accounts codes are 3 digits at summary level (111, 131, 511)
//! and 4 digits at detail level (5111, 6321).

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Validated account code: 3 or 4 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountCode(String);

impl AccountCode {
    /// Parse and validate a code. Surrounding whitespace is trimmed.
    pub fn new(code: &str) -> DomainResult<Self> {
        let code = code.trim();
        if code.is_empty() {
            return Err(DomainError::validation("account code must not be blank"));
        }
        if !(3..=4).contains(&code.len()) || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "account code '{code}' must be 3-4 digits (e.g. 111, 131, 5111)"
            )));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Summary-level code (3 digits).
    pub fn is_summary_level(&self) -> bool {
        self.0.len() == 3
    }

    /// Detail-level code (4 digits).
    pub fn is_detail_level(&self) -> bool {
        self.0.len() == 4
    }

    /// The 3-digit summary code this code rolls up to.
    pub fn summary_code(&self) -> AccountCode {
        Self(self.0[..3].to_string())
    }
}

impl ValueObject for AccountCode {}

impl core::fmt::Display for AccountCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for AccountCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_summary_and_detail_codes() {
        assert!(AccountCode::new("111").unwrap().is_summary_level());
        assert!(AccountCode::new("5111").unwrap().is_detail_level());
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(AccountCode::new(" 131 ").unwrap().as_str(), "131");
    }

    #[test]
    fn rejects_malformed_codes() {
        for bad in ["", "  ", "11", "12345", "11a", "1.1"] {
            assert!(AccountCode::new(bad).is_err(), "expected rejection: {bad:?}");
        }
    }

    #[test]
    fn detail_code_rolls_up() {
        let code = AccountCode::new("5111").unwrap();
        assert_eq!(code.summary_code(), AccountCode::new("511").unwrap());
    }
}
