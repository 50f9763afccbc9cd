use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Identity embedded into a token at issue time.
///
/// Immutable once issued; the authoritative copy lives in the account store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    email: String,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed structure, signature mismatch, or expiry passed.
    /// One tag for all of them: callers get no oracle about which check failed.
    #[error("invalid or expired token")]
    Invalid,
    #[error("failed to sign token")]
    Signing,
}

/// HS256 token codec. Issuance and verification share one process-wide secret;
/// signature comparison is the constant-time HMAC verify of the JWT backend.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_seconds: u64, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Issue a signed token binding `identity` for the configured lifetime.
    /// No store write happens here; the token itself is the only artifact.
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: identity.id.clone(),
            username: identity.username.clone(),
            email: identity.email.clone(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(
            |e| {
                error!(error = %e, "failed to sign token");
                TokenError::Signing
            },
        )
    }

    /// Recompute the signature and check expiry. Total over arbitrary input:
    /// garbage, tampered and expired tokens all come back as `Invalid`.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::Invalid)?;

        Ok(Identity {
            id: data.claims.sub,
            username: data.claims.username,
            email: data.claims.email,
        })
    }
}
