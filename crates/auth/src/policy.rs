use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Actor, Role};

/// Period transitions that require authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodAction {
    Close,
    Reopen,
}

impl core::fmt::Display for PeriodAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Close => f.write_str("close"),
            Self::Reopen => f.write_str("reopen"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("actor '{actor}' is not authorized to {action} a period")]
    Forbidden { actor: String, action: PeriodAction },
}

/// Authorization decision seam.
///
/// The period locking service depends on this trait, not on any identity
/// representation: hosts plug in whatever maps their users to yes/no.
pub trait AuthorizationPolicy {
    fn allows(&self, actor: &Actor, action: PeriodAction) -> bool;
}

/// Authorize an actor for a period action against a policy.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize<P: AuthorizationPolicy>(
    policy: &P,
    actor: &Actor,
    action: PeriodAction,
) -> Result<(), AuthzError> {
    if policy.allows(actor, action) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            actor: actor.name().to_string(),
            action,
        })
    }
}

/// Reference policy: per-action sets of allowed roles.
///
/// Reopening is deliberately stricter than closing; reopening rewrites
/// history that closing only sealed.
#[derive(Debug, Clone, Default)]
pub struct RolePolicy {
    allowed: HashMap<PeriodAction, HashSet<Role>>,
}

impl RolePolicy {
    /// Empty policy: nothing is allowed until roles are granted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard grants: accountant/admin/manager may close, only admin
    /// may reopen.
    pub fn standard() -> Self {
        let mut policy = Self::new();
        for role in ["accountant", "admin", "manager"] {
            policy.allow(PeriodAction::Close, Role::new(role));
        }
        policy.allow(PeriodAction::Reopen, Role::new("admin"));
        policy
    }

    pub fn allow(&mut self, action: PeriodAction, role: Role) -> &mut Self {
        self.allowed.entry(action).or_default().insert(role);
        self
    }
}

impl AuthorizationPolicy for RolePolicy {
    fn allows(&self, actor: &Actor, action: PeriodAction) -> bool {
        self.allowed
            .get(&action)
            .is_some_and(|roles| roles.iter().any(|role| actor.has_role(role)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_policy_lets_accountant_close_but_not_reopen() {
        let policy = RolePolicy::standard();
        let accountant = Actor::with_role("accountant");

        assert!(policy.allows(&accountant, PeriodAction::Close));
        assert!(!policy.allows(&accountant, PeriodAction::Reopen));
    }

    #[test]
    fn standard_policy_lets_admin_do_both() {
        let policy = RolePolicy::standard();
        let admin = Actor::with_role("admin");

        assert!(policy.allows(&admin, PeriodAction::Close));
        assert!(policy.allows(&admin, PeriodAction::Reopen));
    }

    #[test]
    fn unknown_role_is_forbidden() {
        let policy = RolePolicy::standard();
        let clerk = Actor::with_role("junior_clerk");

        let err = authorize(&policy, &clerk, PeriodAction::Close).unwrap_err();
        assert!(matches!(err, AuthzError::Forbidden { .. }));
    }

    #[test]
    fn decisions_use_roles_not_names() {
        let policy = RolePolicy::standard();
        let named_admin_without_role = Actor::new("admin", vec![]);

        assert!(!policy.allows(&named_admin_without_role, PeriodAction::Close));
    }
}
