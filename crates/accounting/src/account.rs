//! Chart of accounts: account entity and keyed registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bookforge_core::{AccountCode, DomainError, DomainResult, Entity};

/// High-level account kind (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
    OtherIncome,
    OtherExpense,
}

/// Account in the chart of accounts.
///
/// Accounts referenced by posted entries are never hard-deleted; retire
/// them with [`Account::deactivate`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    code: AccountCode,
    name: String,
    kind: AccountKind,
    parent_code: Option<AccountCode>,
    active: bool,
}

impl Account {
    pub fn new(
        code: AccountCode,
        name: impl Into<String>,
        kind: AccountKind,
        parent_code: Option<AccountCode>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("account name must not be blank"));
        }
        Ok(Self {
            code,
            name,
            kind,
            parent_code,
            active: true,
        })
    }

    pub fn code(&self) -> &AccountCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn parent_code(&self) -> Option<&AccountCode> {
        self.parent_code.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn activate(&mut self) {
        self.active = true;
    }
}

impl Entity for Account {
    type Id = AccountCode;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

/// Account lookup seam consumed by entry intake.
///
/// The registry below implements it; a persistence-backed host would
/// implement it over its own store.
pub trait AccountDirectory {
    fn find_by_code(&self, code: &AccountCode) -> Option<Account>;
}

/// Keyed store of accounts by code.
///
/// Registering an existing code replaces that account in place; a code is
/// never reassigned to an unrelated account because the code *is* the
/// identity.
#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    accounts: BTreeMap<AccountCode, Account>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the account stored under its code.
    pub fn register(&mut self, account: Account) {
        self.accounts.insert(account.code.clone(), account);
    }

    pub fn find_by_code(&self, code: &AccountCode) -> Option<&Account> {
        self.accounts.get(code)
    }

    pub fn get_by_code(&self, code: &AccountCode) -> DomainResult<&Account> {
        self.accounts.get(code).ok_or(DomainError::NotFound)
    }

    /// All accounts of a kind, ordered by code.
    pub fn by_kind(&self, kind: AccountKind) -> Vec<&Account> {
        self.accounts.values().filter(|a| a.kind == kind).collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountDirectory for AccountRegistry {
    fn find_by_code(&self, code: &AccountCode) -> Option<Account> {
        self.accounts.get(code).cloned()
    }
}
