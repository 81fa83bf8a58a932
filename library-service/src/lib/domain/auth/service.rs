use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthenticatedIdentity;
use crate::domain::auth::models::LoginResult;
use crate::domain::auth::models::PublicPrincipal;
use crate::domain::auth::ports::AuthenticationServicePort;
use crate::principal::models::PrincipalId;
use crate::principal::models::Username;
use crate::principal::ports::PrincipalStore;

/// Login and token-to-identity resolution over a principal store.
pub struct AuthenticationService<PS>
where
    PS: PrincipalStore,
{
    store: Arc<PS>,
    authenticator: Arc<Authenticator>,
}

impl<PS> AuthenticationService<PS>
where
    PS: PrincipalStore,
{
    pub fn new(store: Arc<PS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }
}

#[async_trait]
impl<PS> AuthenticationServicePort for AuthenticationService<PS>
where
    PS: PrincipalStore,
{
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginResult, AuthError> {
        // A name that cannot be valid cannot be stored either.
        let username = Username::new(username.to_string())
            .map_err(|_| AuthError::PrincipalNotFound(username.to_string()))?;

        let principal = self
            .store
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AuthError::PrincipalNotFound(username.to_string()))?;

        let result = self.authenticator.authenticate(
            password,
            &principal.password_hash,
            &principal.id.to_string(),
            now,
        )?;

        tracing::info!(
            principal_id = %principal.id,
            username = %principal.username,
            "Principal authenticated"
        );

        Ok(LoginResult {
            principal: PublicPrincipal::from(&principal),
            token: result.access_token,
            expires_at: result.claims.expires_at(),
        })
    }

    async fn resolve_identity(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedIdentity, AuthError> {
        // Nothing in the claims is trusted before the signature checks out.
        let claims = self.authenticator.validate_token(token)?;

        if claims.is_expired(now) {
            return Err(AuthError::TokenExpired);
        }

        let principal_id = PrincipalId::from_string(claims.subject())
            .map_err(|_| AuthError::PrincipalNotFound(claims.subject().to_string()))?;

        let principal = self
            .store
            .find_by_id(&principal_id)
            .await?
            .filter(|principal| principal.id == principal_id)
            .ok_or_else(|| AuthError::PrincipalNotFound(principal_id.to_string()))?;

        Ok(AuthenticatedIdentity::from(&principal))
    }
}
