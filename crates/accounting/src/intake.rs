//! Entry intake: the collaborator-facing seam in front of the journal
//! entry aggregate.
//!
//! The aggregate itself has no registry access (see [`crate::journal`]),
//! so entry-number uniqueness and account resolution happen here, before
//! any aggregate is constructed or mutated.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use bookforge_core::{AccountCode, DomainError, DomainResult, Money};

use crate::account::AccountDirectory;
use crate::journal::JournalEntry;

/// Uniqueness check for business entry numbers.
pub trait EntryNumberIndex {
    fn exists(&self, entry_number: &str) -> bool;

    /// Record a number as taken. Called after the entry is created.
    fn record(&mut self, entry_number: &str);
}

/// In-memory index; a host backs this with its entry store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntryNumberIndex {
    numbers: HashSet<String>,
}

impl InMemoryEntryNumberIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntryNumberIndex for InMemoryEntryNumberIndex {
    fn exists(&self, entry_number: &str) -> bool {
        self.numbers.contains(entry_number)
    }

    fn record(&mut self, entry_number: &str) {
        self.numbers.insert(entry_number.to_string());
    }
}

/// Validated entry construction against a chart of accounts and an
/// entry-number index.
#[derive(Debug)]
pub struct EntryIntake<D, N> {
    directory: D,
    numbers: N,
}

impl<D: AccountDirectory, N: EntryNumberIndex> EntryIntake<D, N> {
    pub fn new(directory: D, numbers: N) -> Self {
        Self { directory, numbers }
    }

    /// Create a draft entry, reserving its entry number.
    pub fn create_entry(
        &mut self,
        entry_number: &str,
        original_document_number: &str,
        entry_date: DateTime<Utc>,
        original_document_date: DateTime<Utc>,
        description: &str,
        reference: Option<String>,
    ) -> DomainResult<JournalEntry> {
        if self.numbers.exists(entry_number) {
            return Err(DomainError::conflict(format!(
                "entry number '{entry_number}' already exists"
            )));
        }
        let entry = JournalEntry::create(
            entry_number,
            original_document_number,
            entry_date,
            original_document_date,
            description,
            reference,
        )?;
        self.numbers.record(entry_number);
        Ok(entry)
    }

    /// Append a line after resolving its account code.
    pub fn add_line(
        &self,
        entry: &mut JournalEntry,
        account_code: &AccountCode,
        debit: Money,
        credit: Money,
        description: &str,
    ) -> DomainResult<()> {
        let account = self
            .directory
            .find_by_code(account_code)
            .ok_or_else(|| {
                DomainError::validation(format!("unknown account code {account_code}"))
            })?;
        if !account.is_active() {
            return Err(DomainError::validation(format!(
                "account {account_code} is inactive"
            )));
        }
        entry.add_line(account_code.clone(), debit, credit, description)
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }
}
