use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried inside an issued token.
///
/// Timestamps are Unix epoch seconds. A token is only ever built through
/// [`Claims::new`], which keeps `exp` strictly after `iat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject issued at `now` and valid for `validity`.
    ///
    /// # Arguments
    /// * `subject` - Principal identifier
    /// * `now` - Issue instant
    /// * `validity` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with sub, iat and exp set
    pub fn new(subject: impl ToString, now: DateTime<Utc>, validity: Duration) -> Self {
        let issued_at = now.timestamp();

        Self {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at + validity.num_seconds(),
        }
    }

    /// Subject of the token.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Issue instant, if representable.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Expiry instant, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if the token is expired at `now`.
    ///
    /// A token is valid strictly before its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
