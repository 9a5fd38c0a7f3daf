//! Period close/reopen orchestration.
//!
//! The service here enforces the ordering and authorization rules around
//! sealing a fiscal month: everything posted, trial balance balanced,
//! no later month already sealed when reopening. Failures are ordinary
//! values, never panics.

pub mod history;
pub mod service;
pub mod store;

pub use history::{PeriodLockAction, PeriodLockHistory};
pub use service::{PeriodLockError, PeriodLockingService};
pub use store::{InMemoryPeriodStore, PeriodStore};
