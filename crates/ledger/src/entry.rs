//! Ledger entry: an immutable, hash-sealed snapshot of a posted journal
//! entry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use bookforge_accounting::JournalEntry;
use bookforge_core::{DomainError, DomainResult, JournalEntryId};

/// Previous-hash sentinel carried by the first chain element
/// (all-zero digest, like a genesis block's parent hash).
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// One journal line as captured into the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLine {
    pub account_code: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub description: String,
}

/// The critical fields of a posted journal entry, captured at append time.
///
/// Serialized with `serde_json` in declaration order; that serialization is
/// the canonical hash input, so field order here is load-bearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    journal_entry_id: JournalEntryId,
    entry_number: String,
    original_document_number: String,
    entry_date: DateTime<Utc>,
    original_document_date: DateTime<Utc>,
    description: String,
    reference: Option<String>,
    posted_by: String,
    posted_at: DateTime<Utc>,
    total_debit: Decimal,
    total_credit: Decimal,
    lines: Vec<SnapshotLine>,
}

impl EntrySnapshot {
    /// Capture a posted entry. Fails if the entry is not Posted (drafts
    /// have no business in the system of record).
    pub fn capture(entry: &JournalEntry) -> DomainResult<Self> {
        if !entry.is_posted() {
            return Err(DomainError::invalid_state(format!(
                "entry {} is {:?}; only posted entries enter the ledger",
                entry.entry_number(),
                entry.status()
            )));
        }
        let (posted_at, posted_by) = match (entry.posted_at(), entry.posted_by()) {
            (Some(at), Some(by)) => (at, by.to_string()),
            _ => {
                return Err(DomainError::invalid_state(format!(
                    "posted entry {} is missing its posting stamp",
                    entry.entry_number()
                )));
            }
        };

        Ok(Self {
            journal_entry_id: entry.id_typed(),
            entry_number: entry.entry_number().to_string(),
            original_document_number: entry.original_document_number().to_string(),
            entry_date: entry.entry_date(),
            original_document_date: entry.original_document_date(),
            description: entry.description().to_string(),
            reference: entry.reference().map(str::to_string),
            posted_by,
            posted_at,
            total_debit: entry.total_debit(),
            total_credit: entry.total_credit(),
            lines: entry
                .lines()
                .iter()
                .map(|l| SnapshotLine {
                    account_code: l.account_code().as_str().to_string(),
                    debit: l.debit().amount(),
                    credit: l.credit().amount(),
                    description: l.description().to_string(),
                })
                .collect(),
        })
    }

    pub fn journal_entry_id(&self) -> JournalEntryId {
        self.journal_entry_id
    }

    pub fn entry_number(&self) -> &str {
        &self.entry_number
    }

    pub fn entry_date(&self) -> DateTime<Utc> {
        self.entry_date
    }

    pub fn posted_by(&self) -> &str {
        &self.posted_by
    }

    pub fn posted_at(&self) -> DateTime<Utc> {
        self.posted_at
    }

    pub fn total_debit(&self) -> Decimal {
        self.total_debit
    }

    pub fn total_credit(&self) -> Decimal {
        self.total_credit
    }

    pub fn lines(&self) -> &[SnapshotLine] {
        &self.lines
    }

    fn canonical_json(&self) -> DomainResult<String> {
        serde_json::to_string(self).map_err(|e| {
            DomainError::validation(format!("snapshot serialization failed: {e}"))
        })
    }
}

/// One element of the hash chain.
///
/// All fields are private and no mutating method exists: once sealed, an
/// entry can only be read or verified. The chain assigns sequence numbers;
/// callers never supply them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    sequence_number: u64,
    snapshot: EntrySnapshot,
    previous_hash: String,
    hash: String,
    timestamp: DateTime<Utc>,
    recorded_by: String,
}

impl LedgerEntry {
    /// Seal a posted journal entry into a chain element.
    ///
    /// Only [`crate::ImmutableLedger`] calls this; it owns sequence
    /// assignment and previous-hash consumption.
    pub(crate) fn seal(
        sequence_number: u64,
        entry: &JournalEntry,
        previous_hash: String,
        recorded_by: &str,
    ) -> DomainResult<Self> {
        let snapshot = EntrySnapshot::capture(entry)?;
        let timestamp = Utc::now();
        let hash = compute_hash(
            sequence_number,
            timestamp,
            recorded_by,
            &previous_hash,
            &snapshot,
        )?;
        Ok(Self {
            sequence_number,
            snapshot,
            previous_hash,
            hash,
            timestamp,
            recorded_by: recorded_by.to_string(),
        })
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn snapshot(&self) -> &EntrySnapshot {
        &self.snapshot
    }

    pub fn entry_number(&self) -> &str {
        self.snapshot.entry_number()
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn recorded_by(&self) -> &str {
        &self.recorded_by
    }

    pub fn is_genesis(&self) -> bool {
        self.previous_hash == GENESIS_HASH
    }

    /// Recompute the digest from stored fields and compare with the stored
    /// hash. Any altered field makes this return false.
    pub fn verify_integrity(&self) -> bool {
        compute_hash(
            self.sequence_number,
            self.timestamp,
            &self.recorded_by,
            &self.previous_hash,
            &self.snapshot,
        )
        .is_ok_and(|computed| computed == self.hash)
    }
}

/// SHA-256 over every sealed field, in fixed order, hex-encoded.
fn compute_hash(
    sequence_number: u64,
    timestamp: DateTime<Utc>,
    recorded_by: &str,
    previous_hash: &str,
    snapshot: &EntrySnapshot,
) -> DomainResult<String> {
    let payload = snapshot.canonical_json()?;

    let mut hasher = Sha256::new();
    hasher.update(sequence_number.to_be_bytes());
    hasher.update(timestamp.to_rfc3339().as_bytes());
    hasher.update(recorded_by.as_bytes());
    hasher.update(previous_hash.as_bytes());
    hasher.update(payload.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

// Test-only corruption paths. Tamper tests rebuild a record with one field
// altered instead of mutating a sealed one; production code has no way to
// do either.
#[cfg(test)]
impl LedgerEntry {
    pub(crate) fn with_tampered_hash(mut self, hash: &str) -> Self {
        self.hash = hash.to_string();
        self
    }

    pub(crate) fn with_tampered_previous_hash(mut self, previous_hash: &str) -> Self {
        self.previous_hash = previous_hash.to_string();
        self
    }

    pub(crate) fn with_tampered_sequence(mut self, sequence_number: u64) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    pub(crate) fn with_tampered_description(mut self, description: &str) -> Self {
        self.snapshot.description = description.to_string();
        self
    }

    pub(crate) fn with_tampered_debit(mut self, line: usize, debit: Decimal) -> Self {
        self.snapshot.lines[line].debit = debit;
        self
    }
}
