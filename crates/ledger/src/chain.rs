//! The append-only hash chain and its single-writer critical section.

use std::sync::{Mutex, PoisonError};

use tracing::info;

use bookforge_accounting::JournalEntry;
use bookforge_core::DomainResult;

use crate::entry::{LedgerEntry, GENESIS_HASH};

/// Append-only, hash-chained sequence of posted-entry snapshots.
///
/// The chain tail (sequence counter + head hash) is state owned by one
/// ledger instance; independent ledgers never share it, and tests simply
/// construct a fresh instance.
///
/// All mutation goes through one mutex-guarded critical section, so two
/// concurrent appends can never observe the same chain head. Readers take
/// a point-in-time [`ImmutableLedger::snapshot`] instead of locking out
/// writers for the duration of a verification pass.
#[derive(Debug, Default)]
pub struct ImmutableLedger {
    chain: Mutex<Vec<LedgerEntry>>,
}

impl ImmutableLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a posted journal entry to the chain.
    ///
    /// Sequence assignment and previous-hash consumption happen atomically
    /// under the chain lock. Fails if the entry is not Posted.
    pub fn append(&self, entry: &JournalEntry, recorded_by: &str) -> DomainResult<LedgerEntry> {
        self.append_guarded(entry, recorded_by, || Ok(()))
    }

    /// Append with a caller-supplied gate re-evaluated *inside* the
    /// critical section.
    ///
    /// The gate closes the time-of-check/time-of-use gap between "the
    /// owning period is open" and "the entry is in the chain": a period
    /// close that races this append is observed either fully before the
    /// gate or fully after the entry is sealed.
    pub fn append_guarded<F>(
        &self,
        entry: &JournalEntry,
        recorded_by: &str,
        gate: F,
    ) -> DomainResult<LedgerEntry>
    where
        F: FnOnce() -> DomainResult<()>,
    {
        let mut chain = self.chain.lock().unwrap_or_else(PoisonError::into_inner);
        gate()?;

        let sequence_number = chain.len() as u64 + 1;
        let previous_hash = chain
            .last()
            .map(|e| e.hash().to_string())
            .unwrap_or_else(|| GENESIS_HASH.to_string());

        let sealed = LedgerEntry::seal(sequence_number, entry, previous_hash, recorded_by)?;
        chain.push(sealed.clone());

        info!(
            sequence = sequence_number,
            entry_number = entry.entry_number(),
            recorded_by,
            "ledger entry appended"
        );
        Ok(sealed)
    }

    /// Point-in-time copy of the chain for verification or queries.
    pub fn snapshot(&self) -> Vec<LedgerEntry> {
        self.chain
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Hash of the current chain head, or the genesis sentinel when empty.
    pub fn head_hash(&self) -> String {
        self.chain
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|e| e.hash().to_string())
            .unwrap_or_else(|| GENESIS_HASH.to_string())
    }

    pub fn len(&self) -> usize {
        self.chain
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
