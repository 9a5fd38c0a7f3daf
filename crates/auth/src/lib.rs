//! `bookforge-auth`: actor identity and authorization policy.
//!
//! This crate is intentionally decoupled from HTTP and storage: the period
//! locking service consumes a boolean decision per action, nothing more.

pub mod actor;
pub mod policy;
pub mod roles;

pub use actor::Actor;
pub use policy::{authorize, AuthorizationPolicy, AuthzError, PeriodAction, RolePolicy};
pub use roles::Role;
