//! Trial balance: per-account debit/credit totals over a period's posted
//! entries. This is the aggregate check the close path consumes, not a
//! financial report.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bookforge_core::AccountCode;

use crate::journal::JournalEntry;
use crate::period::{AccountingPeriod, TrialBalanceStatus};

/// Totals accumulated for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceLine {
    pub account_code: AccountCode,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

impl TrialBalanceLine {
    /// Debit-normal balance (negative means a credit balance).
    pub fn balance(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// Per-account totals for one fiscal month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    lines: Vec<TrialBalanceLine>,
}

impl TrialBalance {
    /// Accumulate the posted entries dated inside `period`.
    ///
    /// Draft/cancelled/adjusted entries and entries dated outside the
    /// period are skipped; they are not part of the books being sealed.
    pub fn for_period(period: &AccountingPeriod, entries: &[JournalEntry]) -> Self {
        let mut totals: BTreeMap<AccountCode, (Decimal, Decimal)> = BTreeMap::new();

        for entry in entries {
            if !entry.is_posted() || !period.contains(entry.entry_date()) {
                continue;
            }
            for line in entry.lines() {
                let slot = totals
                    .entry(line.account_code().clone())
                    .or_insert((Decimal::ZERO, Decimal::ZERO));
                slot.0 += line.debit().amount();
                slot.1 += line.credit().amount();
            }
        }

        let lines = totals
            .into_iter()
            .map(|(account_code, (total_debit, total_credit))| TrialBalanceLine {
                account_code,
                total_debit,
                total_credit,
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[TrialBalanceLine] {
        &self.lines
    }

    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.total_debit).sum()
    }

    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.total_credit).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }

    pub fn status(&self) -> TrialBalanceStatus {
        if self.is_balanced() {
            TrialBalanceStatus::Balanced
        } else {
            TrialBalanceStatus::Unbalanced
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookforge_core::{Currency, Money};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn vnd(amount: Decimal) -> Money {
        Money::new(amount, Currency::Vnd).unwrap()
    }

    fn code(s: &str) -> AccountCode {
        AccountCode::new(s).unwrap()
    }

    fn posted_entry(number: &str, day: u32, amount: Decimal) -> JournalEntry {
        let date = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        let mut entry =
            JournalEntry::create(number, "INV-001", date, date, "sale", None).unwrap();
        entry
            .add_line(code("111"), vnd(amount), Money::zero(Currency::Vnd), "cash")
            .unwrap();
        entry
            .add_line(code("511"), Money::zero(Currency::Vnd), vnd(amount), "revenue")
            .unwrap();
        entry.post("accountant").unwrap();
        entry
    }

    #[test]
    fn accumulates_per_account_and_balances() {
        let period = AccountingPeriod::new(2024, 1).unwrap();
        let entries = vec![
            posted_entry("BT-0001", 5, dec!(100)),
            posted_entry("BT-0002", 20, dec!(250)),
        ];

        let tb = TrialBalance::for_period(&period, &entries);
        assert_eq!(tb.lines().len(), 2);
        assert_eq!(tb.total_debit(), dec!(350));
        assert_eq!(tb.total_credit(), dec!(350));
        assert!(tb.is_balanced());
        assert_eq!(tb.status(), TrialBalanceStatus::Balanced);

        let cash = &tb.lines()[0];
        assert_eq!(cash.account_code, code("111"));
        assert_eq!(cash.balance(), dec!(350));
    }

    #[test]
    fn skips_drafts_and_other_months() {
        let period = AccountingPeriod::new(2024, 1).unwrap();
        let february = Utc.with_ymd_and_hms(2024, 2, 3, 0, 0, 0).unwrap();

        let draft = JournalEntry::create(
            "BT-0003",
            "INV-002",
            Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
            "unposted",
            None,
        )
        .unwrap();
        let mut outside =
            JournalEntry::create("BT-0004", "INV-003", february, february, "later", None)
                .unwrap();
        outside
            .add_line(code("111"), vnd(dec!(9)), Money::zero(Currency::Vnd), "cash")
            .unwrap();
        outside
            .add_line(code("511"), Money::zero(Currency::Vnd), vnd(dec!(9)), "revenue")
            .unwrap();
        outside.post("accountant").unwrap();

        let tb = TrialBalance::for_period(&period, &[draft, outside]);
        assert!(tb.lines().is_empty());
        assert!(tb.is_balanced());
    }
}
