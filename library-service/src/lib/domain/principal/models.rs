use std::collections::BTreeSet;
use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::principal::errors::PrincipalIdError;
use crate::principal::errors::RoleError;
use crate::principal::errors::UsernameError;

/// Principal aggregate entity.
///
/// An authenticatable account. The password is only ever held as the
/// opaque output of the hashing primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: PrincipalId,
    pub username: Username,
    pub name: String,
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
    pub created_at: DateTime<Utc>,
}

impl Principal {
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}

/// Principal unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    /// Generate a new random principal ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a principal ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, PrincipalIdError> {
        Uuid::parse_str(s)
            .map(PrincipalId)
            .map_err(|e| PrincipalIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Named permission grant.
///
/// Names are case-sensitive: `Admin` and `admin` are different roles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Role(String);

impl Role {
    pub const ADMIN: &'static str = "Admin";
    pub const USER: &'static str = "User";

    /// Prefix used when a role is exposed as an authority string.
    pub const AUTHORITY_PREFIX: &'static str = "ROLE_";

    pub fn new(name: impl Into<String>) -> Result<Self, RoleError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RoleError::Empty);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(RoleError::InvalidCharacters(name));
        }
        Ok(Self(name))
    }

    pub fn admin() -> Self {
        Self(Self::ADMIN.to_string())
    }

    pub fn user() -> Self {
        Self(Self::USER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Authority form of the role, e.g. `ROLE_Admin`.
    pub fn authority(&self) -> String {
        format!("{}{}", Self::AUTHORITY_PREFIX, self.0)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new principal with domain types
#[derive(Debug)]
pub struct CreatePrincipalCommand {
    pub username: Username,
    pub name: String,
    pub password: String,
    pub roles: BTreeSet<Role>,
}

impl CreatePrincipalCommand {
    /// Construct a new create principal command.
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `name` - Display name
    /// * `password` - Plain text password (will be hashed by service)
    /// * `roles` - Roles granted at creation
    pub fn new(username: Username, name: String, password: String, roles: BTreeSet<Role>) -> Self {
        Self {
            username,
            name,
            password,
            roles,
        }
    }
}

/// Command to update an existing principal.
///
/// Only provided fields are changed.
#[derive(Debug, Default)]
pub struct UpdatePrincipalCommand {
    pub username: Option<Username>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub roles: Option<BTreeSet<Role>>,
}
