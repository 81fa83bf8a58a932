//! Authentication primitives for the library service.
//!
//! - Password hashing (Argon2id) and credential verification
//! - Signed, expiring token issuance and validation
//! - Authentication coordination
//!
//! Everything here is pure computation: no I/O, no global state.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::CredentialVerifier;
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let verifier = CredentialVerifier::new(hasher);
//! assert!(verifier.verify("my_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenCodec;
//! use chrono::Utc;
//!
//! let codec = TokenCodec::with_defaults(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let now = Utc::now();
//! let token = codec.issue("user123", now).unwrap();
//! let claims = codec.decode(&token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! assert!(!codec.is_expired(&token, now));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//! use auth::TokenCodec;
//! use chrono::Utc;
//!
//! let codec = TokenCodec::with_defaults(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(codec);
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &hash, "user123", Utc::now()).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jsonwebtoken::Algorithm;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenCodec;
pub use password::CredentialVerifier;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordHashing;
