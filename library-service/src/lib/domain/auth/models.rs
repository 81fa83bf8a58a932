use std::collections::BTreeSet;

use chrono::DateTime;
use chrono::Utc;

use crate::principal::models::Principal;
use crate::principal::models::PrincipalId;
use crate::principal::models::Role;
use crate::principal::models::Username;

/// Identity resolved from a validated token.
///
/// Lives in a single request's extensions and is dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub principal_id: PrincipalId,
    pub username: Username,
    pub roles: BTreeSet<Role>,
}

impl AuthenticatedIdentity {
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Roles in their `ROLE_` authority form.
    pub fn authorities(&self) -> impl Iterator<Item = String> + '_ {
        self.roles.iter().map(Role::authority)
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities().any(|granted| granted == authority)
    }
}

impl From<&Principal> for AuthenticatedIdentity {
    fn from(principal: &Principal) -> Self {
        Self {
            principal_id: principal.id,
            username: principal.username.clone(),
            roles: principal.roles.clone(),
        }
    }
}

/// Public-safe projection of a principal. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPrincipal {
    pub id: PrincipalId,
    pub username: Username,
    pub name: String,
    pub roles: BTreeSet<Role>,
}

impl From<&Principal> for PublicPrincipal {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id,
            username: principal.username.clone(),
            name: principal.name.clone(),
            roles: principal.roles.clone(),
        }
    }
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub principal: PublicPrincipal,
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}
