//! Chain verification: whole-chain validity, and tamper localization.
//!
//! Detection is a report, not an error; callers decide whether a finding
//! is fatal.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::entry::{LedgerEntry, GENESIS_HASH};

/// Re-verify a single record against its stored hash.
pub fn verify_integrity(entry: &LedgerEntry) -> bool {
    entry.verify_integrity()
}

/// Whole-chain check over entries in chain order.
///
/// Holds iff every record passes self-integrity, the first record carries
/// the genesis sentinel, every adjacent pair links `hash ->
/// previous_hash`, and sequence numbers run 1..=N. Removing, reordering,
/// or editing any element breaks at least one of these.
pub fn verify_chain(entries: &[LedgerEntry]) -> bool {
    for (i, entry) in entries.iter().enumerate() {
        if !entry.verify_integrity() {
            return false;
        }
        if entry.sequence_number() != i as u64 + 1 {
            return false;
        }
        match i.checked_sub(1).map(|prev| &entries[prev]) {
            None => {
                if entry.previous_hash() != GENESIS_HASH {
                    return false;
                }
            }
            Some(previous) => {
                if entry.previous_hash() != previous.hash() {
                    return false;
                }
            }
        }
    }
    true
}

/// Localized tamper findings for a chain.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TamperReport {
    pub tampered_indices: BTreeSet<usize>,
    pub details: Vec<String>,
}

impl TamperReport {
    pub fn has_tampering(&self) -> bool {
        !self.tampered_indices.is_empty()
    }

    fn flag(&mut self, index: usize, detail: String) {
        self.tampered_indices.insert(index);
        self.details.push(detail);
    }
}

/// Like [`verify_chain`], but collects *every* failing index instead of
/// stopping at the first: each record's self-integrity and each link are
/// checked independently.
pub fn detect_tampering(entries: &[LedgerEntry]) -> TamperReport {
    let mut report = TamperReport::default();

    for (i, entry) in entries.iter().enumerate() {
        let seq = entry.sequence_number();
        if !entry.verify_integrity() {
            report.flag(i, format!("entry {i} (seq {seq}) fails self-integrity"));
        }
        if seq != i as u64 + 1 {
            report.flag(
                i,
                format!("entry {i} has sequence {seq}, expected {}", i + 1),
            );
        }
        match i.checked_sub(1).map(|prev| &entries[prev]) {
            None => {
                if entry.previous_hash() != GENESIS_HASH {
                    report.flag(i, format!("entry {i} does not carry the genesis sentinel"));
                }
            }
            Some(previous) => {
                if entry.previous_hash() != previous.hash() {
                    report.flag(i, format!("broken link into entry {i} (seq {seq})"));
                }
            }
        }
    }

    if report.has_tampering() {
        warn!(
            tampered = report.tampered_indices.len(),
            total = entries.len(),
            "ledger tampering detected"
        );
    }
    report
}

/// The last record whose prefix of the chain is still fully valid, if any.
pub fn find_last_valid(entries: &[LedgerEntry]) -> Option<&LedgerEntry> {
    let mut last_valid = None;
    for (i, entry) in entries.iter().enumerate() {
        if !verify_chain(&entries[..=i]) {
            break;
        }
        last_valid = Some(entry);
    }
    last_valid
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityStatus {
    Empty,
    Valid,
    Compromised,
}

/// Summary produced for audit consumers.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub status: IntegrityStatus,
    pub total_entries: usize,
    pub tampered_entries: usize,
    pub first_hash: Option<String>,
    pub last_hash: Option<String>,
    pub details: Vec<String>,
    pub verified_at: DateTime<Utc>,
}

/// Run tamper detection and fold the findings into a report.
pub fn report(entries: &[LedgerEntry]) -> IntegrityReport {
    let verified_at = Utc::now();
    if entries.is_empty() {
        return IntegrityReport {
            status: IntegrityStatus::Empty,
            total_entries: 0,
            tampered_entries: 0,
            first_hash: None,
            last_hash: None,
            details: Vec::new(),
            verified_at,
        };
    }

    let findings = detect_tampering(entries);
    let status = if findings.has_tampering() {
        IntegrityStatus::Compromised
    } else {
        IntegrityStatus::Valid
    };
    IntegrityReport {
        status,
        total_entries: entries.len(),
        tampered_entries: findings.tampered_indices.len(),
        first_hash: entries.first().map(|e| e.hash().to_string()),
        last_hash: entries.last().map(|e| e.hash().to_string()),
        details: findings.details,
        verified_at,
    }
}
