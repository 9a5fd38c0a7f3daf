//! Append-only audit trail of period locking actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookforge_core::PeriodId;

/// Which transition was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodLockAction {
    Close,
    Reopen,
}

/// One audit record. Written on every successful close/reopen; never
/// updated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodLockHistory {
    pub id: Uuid,
    pub period_id: PeriodId,
    pub action: PeriodLockAction,
    pub performed_by: String,
    pub performed_at: DateTime<Utc>,
    pub reason: String,
}

impl PeriodLockHistory {
    pub fn record(
        period_id: PeriodId,
        action: PeriodLockAction,
        performed_by: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            period_id,
            action,
            performed_by: performed_by.into(),
            performed_at: Utc::now(),
            reason: reason.into(),
        }
    }
}
