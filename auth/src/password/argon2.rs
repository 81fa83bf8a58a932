use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as _;
use argon2::password_hash::PasswordVerifier as _;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// One-way hashing primitive used to store and check credentials.
///
/// Implementations own salting and constant-time comparison.
pub trait PasswordHashing: Send + Sync {
    /// Hash a plaintext password into an opaque, self-describing string.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored hash.
    fn matches(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id hasher producing PHC strings with a fresh random salt per hash.
///
/// Verification reads the parameters back from the stored string, so hashes
/// made with older parameters keep verifying after a change here.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }

    /// # Errors
    /// * `HashingFailed` - Argon2 rejected the input or parameters
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|phc| phc.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// `Ok(false)` on a mismatch.
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored value is not a PHC string
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordError> {
        let phc = PasswordHash::new(stored)
            .map_err(|e| PasswordError::VerificationFailed(format!("Unreadable hash: {}", e)))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &phc)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHashing for PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        PasswordHasher::hash(self, password)
    }

    fn matches(&self, password: &str, hash: &str) -> bool {
        self.verify(password, hash).unwrap_or(false)
    }
}
