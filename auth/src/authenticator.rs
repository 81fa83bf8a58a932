use chrono::DateTime;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::password::CredentialVerifier;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::PasswordHashing;

/// Authentication coordinator combining credential verification and token issuance.
pub struct Authenticator<H: PasswordHashing = PasswordHasher> {
    verifier: CredentialVerifier<H>,
    codec: TokenCodec,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,

    /// Claims the token was issued with
    pub claims: Claims,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator<PasswordHasher> {
    /// Create an authenticator backed by Argon2id.
    pub fn new(codec: TokenCodec) -> Self {
        Self::with_hasher(codec, PasswordHasher::new())
    }
}

impl<H: PasswordHashing> Authenticator<H> {
    /// Create an authenticator with an explicit hashing primitive.
    pub fn with_hasher(codec: TokenCodec, hasher: H) -> Self {
        Self {
            verifier: CredentialVerifier::new(hasher),
            codec,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.verifier.hasher().hash(password)
    }

    /// Verify credentials and issue a token for `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Principal identifier placed in the token
    /// * `now` - Issue instant
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match; no token is issued
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verifier.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let claims = Claims::new(subject, now, self.codec.validity());
        let access_token = self.codec.encode(&claims)?;

        Ok(AuthenticationResult {
            access_token,
            claims,
        })
    }

    /// Verify a token's signature and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.codec.decode(token)
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}
