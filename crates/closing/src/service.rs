//! Close/reopen orchestration over accounting periods.

use thiserror::Error;
use tracing::{info, warn};

use bookforge_accounting::{AccountingPeriod, PeriodStatus, TrialBalanceStatus};
use bookforge_auth::{authorize, Actor, AuthorizationPolicy, AuthzError, PeriodAction};
use bookforge_core::{DomainError, JournalEntryId, PeriodId};

use crate::history::{PeriodLockAction, PeriodLockHistory};
use crate::store::PeriodStore;

/// Why a close or reopen was refused.
///
/// These are ordinary control flow for the caller: every refusal carries
/// enough detail to correct course (post the stragglers, pick a later
/// period, escalate to an admin).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeriodLockError {
    #[error(transparent)]
    Unauthorized(#[from] AuthzError),

    #[error("period not found")]
    PeriodNotFound,

    #[error("period is already closed")]
    AlreadyClosed,

    #[error("period is not closed")]
    NotClosed,

    #[error("period is permanently locked")]
    PeriodLocked,

    #[error("{count} entries in the period are not yet posted")]
    UnpostedEntries { count: usize },

    #[error("trial balance is unbalanced")]
    TrialBalanceUnbalanced,

    #[error("period {year}/{month:02} is already closed; later periods must reopen first")]
    SubsequentPeriodClosed { year: i32, month: u32 },

    #[error("a reason is required")]
    MissingReason,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Orchestrates period close/reopen against a store and an authorization
/// policy.
///
/// The service never panics; refusals come back as [`PeriodLockError`]
/// values, and a refused operation leaves no partial state behind (the
/// period is transitioned on a copy and saved only after every check
/// passed).
#[derive(Debug)]
pub struct PeriodLockingService<S, P> {
    store: S,
    policy: P,
}

impl<S: PeriodStore, P: AuthorizationPolicy> PeriodLockingService<S, P> {
    pub fn new(store: S, policy: P) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Close a fiscal month.
    ///
    /// Checks run in order: authorization, period existence, current
    /// status, unposted entries, trial balance. The close is refused while
    /// any entry dated in the period is not Posted.
    pub fn close_period(
        &mut self,
        period_id: PeriodId,
        actor: &Actor,
        reason: &str,
    ) -> Result<(), PeriodLockError> {
        authorize(&self.policy, actor, PeriodAction::Close)?;

        let mut period = self
            .store
            .get(period_id)
            .ok_or(PeriodLockError::PeriodNotFound)?;
        match period.status() {
            PeriodStatus::Locked => return Err(PeriodLockError::PeriodLocked),
            PeriodStatus::Closed => return Err(PeriodLockError::AlreadyClosed),
            PeriodStatus::Open | PeriodStatus::Closing => {}
        }

        let unposted = self
            .store
            .entries_for(&period)
            .iter()
            .filter(|e| !e.is_posted())
            .count();
        if unposted > 0 {
            warn!(period = %period, unposted, "close refused: unposted entries");
            return Err(PeriodLockError::UnpostedEntries { count: unposted });
        }
        if period.trial_balance_status() != TrialBalanceStatus::Balanced {
            warn!(period = %period, "close refused: trial balance unbalanced");
            return Err(PeriodLockError::TrialBalanceUnbalanced);
        }

        if period.status() == PeriodStatus::Open {
            period.begin_close()?;
        }
        period.close(actor.name())?;
        self.store.save(&period);
        self.store.append_history(PeriodLockHistory::record(
            period_id,
            PeriodLockAction::Close,
            actor.name(),
            reason,
        ));
        info!(period = %period, performed_by = actor.name(), reason, "period closed");
        Ok(())
    }

    /// Reopen a closed fiscal month.
    ///
    /// Requires the stricter reopen authorization and a non-blank reason.
    /// Refused while any strictly later period is Closed or Locked: books
    /// reopen back-to-front, so reopening the middle of a sealed run would
    /// break the chronological integrity of everything after it.
    pub fn reopen_period(
        &mut self,
        period_id: PeriodId,
        actor: &Actor,
        reason: &str,
    ) -> Result<(), PeriodLockError> {
        authorize(&self.policy, actor, PeriodAction::Reopen)?;

        let mut period = self
            .store
            .get(period_id)
            .ok_or(PeriodLockError::PeriodNotFound)?;
        match period.status() {
            PeriodStatus::Locked => return Err(PeriodLockError::PeriodLocked),
            PeriodStatus::Open | PeriodStatus::Closing => return Err(PeriodLockError::NotClosed),
            PeriodStatus::Closed => {}
        }
        if reason.trim().is_empty() {
            return Err(PeriodLockError::MissingReason);
        }

        let blocking = self
            .store
            .all()
            .into_iter()
            .filter(|p| {
                p.is_after(&period)
                    && matches!(p.status(), PeriodStatus::Closed | PeriodStatus::Locked)
            })
            .min_by_key(|p| (p.year(), p.month()));
        if let Some(later) = blocking {
            warn!(period = %period, later = %later, "reopen refused: later period closed");
            return Err(PeriodLockError::SubsequentPeriodClosed {
                year: later.year(),
                month: later.month(),
            });
        }

        period.reopen(actor.name(), reason)?;
        self.store.save(&period);
        self.store.append_history(PeriodLockHistory::record(
            period_id,
            PeriodLockAction::Reopen,
            actor.name(),
            reason,
        ));
        info!(period = %period, performed_by = actor.name(), reason, "period reopened");
        Ok(())
    }

    /// Whether new journal entries may currently be dated into the period.
    pub fn can_add_entry_to_period(&self, period_id: PeriodId) -> bool {
        self.store
            .get(period_id)
            .is_some_and(|p| p.can_post_entries())
    }

    /// Whether the entry's owning period (resolved by entry date) is Open.
    /// Unknown entries and entries outside any known period are not
    /// modifiable.
    pub fn can_modify_entry(&self, entry_id: JournalEntryId) -> bool {
        let Some(entry) = self.store.find_entry(entry_id) else {
            return false;
        };
        self.store
            .all()
            .iter()
            .find(|p| p.contains(entry.entry_date()))
            .is_some_and(|p| p.can_post_entries())
    }

    pub fn is_period_closed(&self, period_id: PeriodId) -> bool {
        self.store.get(period_id).is_some_and(|p| {
            matches!(p.status(), PeriodStatus::Closed | PeriodStatus::Locked)
        })
    }

    /// Closed (and locked) periods, ordered by year then month.
    pub fn closed_periods(&self) -> Vec<AccountingPeriod> {
        let mut periods: Vec<_> = self
            .store
            .all()
            .into_iter()
            .filter(|p| matches!(p.status(), PeriodStatus::Closed | PeriodStatus::Locked))
            .collect();
        periods.sort_by_key(|p| (p.year(), p.month()));
        periods
    }

    pub fn history_for(&self, period_id: PeriodId) -> Vec<PeriodLockHistory> {
        self.store.history_for(period_id)
    }
}
