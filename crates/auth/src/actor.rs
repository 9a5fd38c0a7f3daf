use serde::{Deserialize, Serialize};

use crate::Role;

/// Identity of the person or system performing an action.
///
/// Construction is intentionally decoupled from storage and transport: a
/// host derives actors from its own session/claims machinery. The domain
/// layer records `name` as `performed_by`/`posted_by` and never inspects
/// roles directly; policies do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    name: String,
    roles: Vec<Role>,
}

impl Actor {
    pub fn new(name: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            name: name.into(),
            roles,
        }
    }

    /// Convenience for an actor whose single role shares its name
    /// (e.g. the "accountant" user acting as the accountant role).
    pub fn with_role(name: impl Into<String>) -> Self {
        let name = name.into();
        let role = Role::new(name.clone());
        Self {
            name,
            roles: vec![role],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}

impl core::fmt::Display for Actor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}
