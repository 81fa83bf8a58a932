use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Lifetime of an issued token when none is configured.
pub const DEFAULT_VALIDITY_HOURS: i64 = 5;

/// Signs and verifies compact tokens (`header.claims.signature`).
///
/// Only HMAC algorithms are accepted: the codec holds a single
/// process-wide secret used for both issuing and verifying.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validity: Duration,
}

impl TokenCodec {
    /// Create a codec from a shared secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `algorithm` - HMAC algorithm (HS256, HS384 or HS512)
    /// * `validity` - Lifetime given to every issued token
    ///
    /// # Errors
    /// * `InvalidConfiguration` - Empty secret, non-HMAC algorithm or non-positive validity
    pub fn new(secret: &[u8], algorithm: Algorithm, validity: Duration) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidConfiguration(
                "secret must not be empty".to_string(),
            ));
        }

        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(JwtError::InvalidConfiguration(format!(
                "unsupported algorithm {:?}, expected an HMAC algorithm",
                algorithm
            )));
        }

        if validity <= Duration::zero() {
            return Err(JwtError::InvalidConfiguration(
                "validity window must be positive".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            validity,
        })
    }

    /// Create an HS256 codec with the default validity window.
    pub fn with_defaults(secret: &[u8]) -> Result<Self, JwtError> {
        Self::new(
            secret,
            Algorithm::HS256,
            Duration::hours(DEFAULT_VALIDITY_HOURS),
        )
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Issue a signed token for `subject`, valid from `now` for the configured window.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = Claims::new(subject, now, self.validity);
        self.encode(&claims)
    }

    /// Sign arbitrary claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify the signature of a token and return its claims.
    ///
    /// Expiry is not checked here, see [`TokenCodec::is_expired`].
    ///
    /// # Errors
    /// * `MalformedToken` - Token is not three segments or its parts cannot be parsed
    /// * `SignatureInvalid` - Signature or algorithm does not match the secret
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let segments = token.split('.').collect::<Vec<_>>();
        if segments.len() != 3 || segments.iter().any(|segment| segment.is_empty()) {
            return Err(JwtError::MalformedToken(format!(
                "expected 3 non-empty segments, got {}",
                segments.len()
            )));
        }

        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    JwtError::SignatureInvalid
                }
                _ => JwtError::MalformedToken(e.to_string()),
            })
    }

    /// Check whether a token is expired at `now`.
    ///
    /// Never fails: a token that cannot be decoded counts as expired.
    pub fn is_expired(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.decode(token)
            .map(|claims| claims.is_expired(now))
            .unwrap_or(true)
    }
}
