//! Persistence seam for the period locking service.

use std::collections::HashMap;

use bookforge_accounting::{AccountingPeriod, JournalEntry};
use bookforge_core::{DomainError, DomainResult, JournalEntryId, PeriodId};

use crate::history::PeriodLockHistory;

/// Storage the locking service operates against.
///
/// Durability is a host concern. The service needs point reads, a
/// whole-calendar scan for the reopen ordering rule, entry lookups by
/// date range, and the append-only history log; nothing else.
pub trait PeriodStore {
    fn get(&self, id: PeriodId) -> Option<AccountingPeriod>;

    /// Every known period, in no particular order.
    fn all(&self) -> Vec<AccountingPeriod>;

    /// Journal entries dated inside the period's fiscal month.
    fn entries_for(&self, period: &AccountingPeriod) -> Vec<JournalEntry>;

    fn find_entry(&self, id: JournalEntryId) -> Option<JournalEntry>;

    /// Persist a period's new state. Upsert by id.
    fn save(&mut self, period: &AccountingPeriod);

    fn append_history(&mut self, record: PeriodLockHistory);

    /// History records for one period, oldest first.
    fn history_for(&self, id: PeriodId) -> Vec<PeriodLockHistory>;
}

/// Reference store backed by hash maps; used by tests and embeddable
/// hosts that keep the books in memory.
#[derive(Debug, Default)]
pub struct InMemoryPeriodStore {
    periods: HashMap<PeriodId, AccountingPeriod>,
    entries: HashMap<JournalEntryId, JournalEntry>,
    history: Vec<PeriodLockHistory>,
}

impl InMemoryPeriodStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a period. At most one period may exist per fiscal month.
    pub fn add_period(&mut self, period: AccountingPeriod) -> DomainResult<PeriodId> {
        let duplicate = self
            .periods
            .values()
            .any(|p| p.year() == period.year() && p.month() == period.month());
        if duplicate {
            return Err(DomainError::conflict(format!(
                "period {period} already exists"
            )));
        }
        let id = period.id_typed();
        self.periods.insert(id, period);
        Ok(id)
    }

    /// Insert or replace a journal entry.
    pub fn put_entry(&mut self, entry: JournalEntry) {
        self.entries.insert(entry.id_typed(), entry);
    }
}

impl PeriodStore for InMemoryPeriodStore {
    fn get(&self, id: PeriodId) -> Option<AccountingPeriod> {
        self.periods.get(&id).cloned()
    }

    fn all(&self) -> Vec<AccountingPeriod> {
        self.periods.values().cloned().collect()
    }

    fn entries_for(&self, period: &AccountingPeriod) -> Vec<JournalEntry> {
        self.entries
            .values()
            .filter(|e| period.contains(e.entry_date()))
            .cloned()
            .collect()
    }

    fn find_entry(&self, id: JournalEntryId) -> Option<JournalEntry> {
        self.entries.get(&id).cloned()
    }

    fn save(&mut self, period: &AccountingPeriod) {
        self.periods.insert(period.id_typed(), period.clone());
    }

    fn append_history(&mut self, record: PeriodLockHistory) {
        self.history.push(record);
    }

    fn history_for(&self, id: PeriodId) -> Vec<PeriodLockHistory> {
        self.history
            .iter()
            .filter(|r| r.period_id == id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn one_period_per_fiscal_month() {
        let mut store = InMemoryPeriodStore::new();
        store
            .add_period(AccountingPeriod::new(2024, 1).unwrap())
            .unwrap();

        let err = store
            .add_period(AccountingPeriod::new(2024, 1).unwrap())
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        store
            .add_period(AccountingPeriod::new(2024, 2).unwrap())
            .unwrap();
        assert_eq!(store.all().len(), 2);
    }

    #[test]
    fn entries_are_associated_by_date_range() {
        let mut store = InMemoryPeriodStore::new();
        let january = AccountingPeriod::new(2024, 1).unwrap();
        let id = store.add_period(january).unwrap();

        let in_january = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
        let in_february = Utc.with_ymd_and_hms(2024, 2, 3, 0, 0, 0).unwrap();
        store.put_entry(
            JournalEntry::create("BT-0001", "INV-001", in_january, in_january, "jan", None)
                .unwrap(),
        );
        store.put_entry(
            JournalEntry::create("BT-0002", "INV-002", in_february, in_february, "feb", None)
                .unwrap(),
        );

        let period = store.get(id).unwrap();
        let entries = store.entries_for(&period);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_number(), "BT-0001");
    }

    #[test]
    fn save_replaces_by_id() {
        let mut store = InMemoryPeriodStore::new();
        let id = store
            .add_period(AccountingPeriod::new(2024, 3).unwrap())
            .unwrap();

        let mut period = store.get(id).unwrap();
        period.close("accountant").unwrap();
        store.save(&period);

        assert_eq!(store.get(id).unwrap().closed_by(), Some("accountant"));
        assert_eq!(store.all().len(), 1);
    }
}
