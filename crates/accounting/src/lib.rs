//! Accounting module (chart of accounts, journal entries, periods).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod account;
pub mod intake;
pub mod journal;
pub mod period;
pub mod trial_balance;

pub use account::{Account, AccountDirectory, AccountKind, AccountRegistry};
pub use intake::{EntryIntake, EntryNumberIndex, InMemoryEntryNumberIndex};
pub use journal::{JournalEntry, JournalEntryLine, JournalEntryStatus};
pub use period::{AccountingPeriod, PeriodStatus, TrialBalanceStatus};
pub use trial_balance::{TrialBalance, TrialBalanceLine};
