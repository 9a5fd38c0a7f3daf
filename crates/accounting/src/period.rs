//! Accounting period: one fiscal month with a close/reopen/lock lifecycle.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bookforge_core::{DomainError, DomainResult, Entity, PeriodId};

/// Period lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Accepts postings.
    Open,
    /// Transient state while close checks and closing entries run.
    Closing,
    /// Sealed; reopenable by an administrator.
    Closed,
    /// Permanently sealed after year-end finalization. Terminal.
    Locked,
}

/// Result of the period's aggregate balance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialBalanceStatus {
    Balanced,
    Unbalanced,
}

/// One fiscal month. At most one period exists per `(year, month)`;
/// journal entries belong to the period whose month contains their
/// entry date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingPeriod {
    id: PeriodId,
    year: i32,
    month: u32,
    status: PeriodStatus,
    trial_balance_status: TrialBalanceStatus,
    closed_at: Option<DateTime<Utc>>,
    closed_by: Option<String>,
    locked_at: Option<DateTime<Utc>>,
    locked_by: Option<String>,
    reopen_reason: Option<String>,
    reopen_count: u32,
}

impl AccountingPeriod {
    /// Create an Open period for the given fiscal month.
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        if !(2000..=2100).contains(&year) {
            return Err(DomainError::validation(format!(
                "fiscal year {year} out of range"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "month must be 1-12, got {month}"
            )));
        }
        Ok(Self {
            id: PeriodId::new(),
            year,
            month,
            status: PeriodStatus::Open,
            trial_balance_status: TrialBalanceStatus::Balanced,
            closed_at: None,
            closed_by: None,
            locked_at: None,
            locked_by: None,
            reopen_reason: None,
            reopen_count: 0,
        })
    }

    pub fn id_typed(&self) -> PeriodId {
        self.id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn quarter(&self) -> u32 {
        (self.month - 1) / 3 + 1
    }

    pub fn status(&self) -> PeriodStatus {
        self.status
    }

    pub fn trial_balance_status(&self) -> TrialBalanceStatus {
        self.trial_balance_status
    }

    pub fn set_trial_balance_status(&mut self, status: TrialBalanceStatus) {
        self.trial_balance_status = status;
    }

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    pub fn closed_by(&self) -> Option<&str> {
        self.closed_by.as_deref()
    }

    pub fn reopen_reason(&self) -> Option<&str> {
        self.reopen_reason.as_deref()
    }

    pub fn reopen_count(&self) -> u32 {
        self.reopen_count
    }

    /// First day of the fiscal month.
    pub fn start_date(&self) -> NaiveDate {
        // Month already validated in `new`.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated year/month")
    }

    /// Last day of the fiscal month.
    pub fn end_date(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .expect("validated year/month")
            .pred_opt()
            .expect("first of month has a predecessor")
    }

    /// Whether a timestamp falls inside this fiscal month.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let date = at.date_naive();
        date.year() == self.year && date.month() == self.month
    }

    /// Strictly later in calendar order than `other`.
    pub fn is_after(&self, other: &AccountingPeriod) -> bool {
        (self.year, self.month) > (other.year, other.month)
    }

    pub fn can_post_entries(&self) -> bool {
        self.status == PeriodStatus::Open
    }

    /// Mark the period Closing while close-out work (checks, closing
    /// entries) runs. Observers can distinguish an in-flight close from a
    /// sealed period.
    pub fn begin_close(&mut self) -> DomainResult<()> {
        if self.status != PeriodStatus::Open {
            return Err(DomainError::invalid_state(format!(
                "period {self} is {:?}, not open",
                self.status
            )));
        }
        self.status = PeriodStatus::Closing;
        Ok(())
    }

    /// Seal the period. Accepts Open (direct close) or Closing.
    pub fn close(&mut self, closed_by: impl Into<String>) -> DomainResult<()> {
        if matches!(self.status, PeriodStatus::Closed | PeriodStatus::Locked) {
            return Err(DomainError::invalid_state(format!(
                "period {self} is already {:?}",
                self.status
            )));
        }
        let closed_by = closed_by.into();
        if closed_by.trim().is_empty() {
            return Err(DomainError::validation("closed_by must not be blank"));
        }

        self.status = PeriodStatus::Closed;
        self.closed_at = Some(Utc::now());
        self.closed_by = Some(closed_by);
        Ok(())
    }

    /// Reopen a closed period. The reason is mandatory and recorded.
    pub fn reopen(&mut self, reopened_by: impl Into<String>, reason: &str) -> DomainResult<()> {
        if self.status == PeriodStatus::Locked {
            return Err(DomainError::invalid_state(format!(
                "period {self} is permanently locked"
            )));
        }
        if self.status != PeriodStatus::Closed {
            return Err(DomainError::invalid_state(format!(
                "period {self} is not closed"
            )));
        }
        let reopened_by = reopened_by.into();
        if reopened_by.trim().is_empty() {
            return Err(DomainError::validation("reopened_by must not be blank"));
        }
        if reason.trim().is_empty() {
            return Err(DomainError::validation("a reopen reason is required"));
        }

        self.status = PeriodStatus::Open;
        self.reopen_reason = Some(reason.trim().to_string());
        self.reopen_count += 1;
        self.closed_at = None;
        self.closed_by = None;
        Ok(())
    }

    /// Permanently lock a closed period (year-end finalization).
    pub fn lock(&mut self, locked_by: impl Into<String>) -> DomainResult<()> {
        if self.status != PeriodStatus::Closed {
            return Err(DomainError::invalid_state(format!(
                "period {self} must be closed before locking"
            )));
        }
        let locked_by = locked_by.into();
        if locked_by.trim().is_empty() {
            return Err(DomainError::validation("locked_by must not be blank"));
        }

        self.status = PeriodStatus::Locked;
        self.locked_at = Some(Utc::now());
        self.locked_by = Some(locked_by);
        Ok(())
    }
}

impl Entity for AccountingPeriod {
    type Id = PeriodId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for AccountingPeriod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_validates_year_and_month() {
        assert!(AccountingPeriod::new(2024, 0).is_err());
        assert!(AccountingPeriod::new(2024, 13).is_err());
        assert!(AccountingPeriod::new(1999, 6).is_err());
        assert!(AccountingPeriod::new(2024, 6).is_ok());
    }

    #[test]
    fn quarter_follows_the_month() {
        for (month, quarter) in [(1, 1), (3, 1), (4, 2), (6, 2), (7, 3), (10, 4), (12, 4)] {
            let period = AccountingPeriod::new(2024, month).unwrap();
            assert_eq!(period.quarter(), quarter, "month {month}");
        }
    }

    #[test]
    fn date_range_covers_the_month() {
        let period = AccountingPeriod::new(2024, 2).unwrap();
        assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        // 2024 is a leap year.
        assert_eq!(period.end_date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let december = AccountingPeriod::new(2024, 12).unwrap();
        assert_eq!(
            december.end_date(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn contains_matches_the_fiscal_month() {
        let period = AccountingPeriod::new(2024, 1).unwrap();
        let inside = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let outside = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        assert!(period.contains(inside));
        assert!(!period.contains(outside));
    }

    #[test]
    fn begin_close_marks_the_period_closing() {
        let mut period = AccountingPeriod::new(2024, 1).unwrap();
        period.begin_close().unwrap();
        assert_eq!(period.status(), PeriodStatus::Closing);
        assert!(!period.can_post_entries());

        period.close("accountant").unwrap();
        assert_eq!(period.status(), PeriodStatus::Closed);
        assert!(period.begin_close().is_err());
    }

    #[test]
    fn close_is_not_repeatable() {
        let mut period = AccountingPeriod::new(2024, 1).unwrap();
        period.close("accountant").unwrap();
        assert_eq!(period.status(), PeriodStatus::Closed);
        assert_eq!(period.closed_by(), Some("accountant"));

        let err = period.close("accountant").unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn reopen_requires_closed_and_a_reason() {
        let mut period = AccountingPeriod::new(2024, 1).unwrap();
        assert!(period.reopen("admin", "fix").is_err());

        period.close("accountant").unwrap();
        assert!(period.reopen("admin", "  ").is_err());

        period.reopen("admin", "correction needed").unwrap();
        assert_eq!(period.status(), PeriodStatus::Open);
        assert_eq!(period.reopen_reason(), Some("correction needed"));
        assert_eq!(period.reopen_count(), 1);
        assert!(period.closed_at().is_none());
    }

    #[test]
    fn locked_is_terminal() {
        let mut period = AccountingPeriod::new(2024, 12).unwrap();
        assert!(period.lock("cfo").is_err(), "must close before locking");

        period.close("accountant").unwrap();
        period.lock("cfo").unwrap();
        assert_eq!(period.status(), PeriodStatus::Locked);

        assert!(period.reopen("admin", "no").is_err());
        assert!(period.close("accountant").is_err());
    }

    #[test]
    fn calendar_ordering() {
        let jan = AccountingPeriod::new(2024, 1).unwrap();
        let feb = AccountingPeriod::new(2024, 2).unwrap();
        let next_jan = AccountingPeriod::new(2025, 1).unwrap();

        assert!(feb.is_after(&jan));
        assert!(next_jan.is_after(&feb));
        assert!(!jan.is_after(&jan));
    }
}
