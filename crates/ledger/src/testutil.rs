//! Shared fixtures for this crate's tests.

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use bookforge_accounting::JournalEntry;
use bookforge_core::{AccountCode, Currency, Money};

/// A balanced, posted cash-sale entry (debit 111 / credit 511).
pub(crate) fn posted_entry(number: &str) -> JournalEntry {
    let date = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let mut entry =
        JournalEntry::create(number, "INV-001", date, date, "Cash sale", None).unwrap();
    entry
        .add_line(
            AccountCode::new("111").unwrap(),
            Money::new(dec!(1000000), Currency::Vnd).unwrap(),
            Money::zero(Currency::Vnd),
            "Cash",
        )
        .unwrap();
    entry
        .add_line(
            AccountCode::new("511").unwrap(),
            Money::zero(Currency::Vnd),
            Money::new(dec!(1000000), Currency::Vnd).unwrap(),
            "Revenue",
        )
        .unwrap();
    entry.post("accountant").unwrap();
    entry
}
