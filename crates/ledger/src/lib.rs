//! Immutable ledger: append-only, hash-chained record of posted journal
//! entries, plus the validator that detects and localizes tampering.
//!
//! Pure domain logic only: no IO, no persistence concerns. Durability of
//! the chain is a collaborator's job; tamper evidence is this crate's.

pub mod chain;
pub mod entry;
pub mod integrity;

#[cfg(test)]
pub(crate) mod testutil;

pub use chain::ImmutableLedger;
pub use entry::{EntrySnapshot, LedgerEntry, SnapshotLine, GENESIS_HASH};
pub use integrity::{
    detect_tampering, find_last_valid, report, verify_chain, verify_integrity, IntegrityReport,
    IntegrityStatus, TamperReport,
};
