use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthenticatedIdentity;
use crate::domain::auth::models::LoginResult;

/// Port for authentication operations.
#[async_trait]
pub trait AuthenticationServicePort: Send + Sync + 'static {
    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `username` - Presented username
    /// * `password` - Presented plaintext password
    /// * `now` - Issue instant
    ///
    /// # Errors
    /// * `PrincipalNotFound` - No principal with this username
    /// * `InvalidCredentials` - Password does not match
    /// * `StoreUnavailable` - Principal lookup failed
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginResult, AuthError>;

    /// Resolve the identity a bearer token stands for.
    ///
    /// # Errors
    /// * `MalformedToken` / `SignatureInvalid` - Token cannot be trusted
    /// * `TokenExpired` - Token is past its expiry at `now`
    /// * `PrincipalNotFound` - Subject does not name a stored principal
    /// * `StoreUnavailable` - Principal lookup failed
    async fn resolve_identity(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedIdentity, AuthError>;
}
