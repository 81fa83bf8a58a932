use super::argon2::PasswordHasher;
use super::argon2::PasswordHashing;

/// Compares presented credentials against stored hashes.
///
/// All comparison goes through the injected hashing primitive; plaintext
/// is never compared directly.
pub struct CredentialVerifier<H: PasswordHashing = PasswordHasher> {
    hasher: H,
}

impl<H: PasswordHashing> CredentialVerifier<H> {
    pub fn new(hasher: H) -> Self {
        Self { hasher }
    }

    /// Returns true if `password` matches `stored_hash`.
    ///
    /// A stored hash the primitive cannot parse never matches.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        self.hasher.matches(password, stored_hash)
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}

impl Default for CredentialVerifier<PasswordHasher> {
    fn default() -> Self {
        Self::new(PasswordHasher::new())
    }
}
