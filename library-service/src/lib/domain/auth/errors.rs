use thiserror::Error;

use crate::principal::errors::PrincipalError;

/// Failures of login, token validation and authorization.
///
/// Token problems never reach callers directly: the request pipeline
/// recovers them locally and only `Unauthorized` / `Forbidden` surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Principal not found: {0}")]
    PrincipalNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Principal store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<auth::JwtError> for AuthError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::MalformedToken(reason) => AuthError::MalformedToken(reason),
            auth::JwtError::SignatureInvalid => AuthError::SignatureInvalid,
            auth::JwtError::EncodingFailed(reason)
            | auth::JwtError::InvalidConfiguration(reason) => AuthError::TokenIssuance(reason),
        }
    }
}

impl From<auth::AuthenticationError> for AuthError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            auth::AuthenticationError::JwtError(e) => AuthError::from(e),
        }
    }
}

impl From<PrincipalError> for AuthError {
    fn from(err: PrincipalError) -> Self {
        AuthError::StoreUnavailable(err.to_string())
    }
}
