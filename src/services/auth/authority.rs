use std::sync::{Arc, OnceLock};

use tracing::error;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::password::PasswordHasher;
use crate::services::auth::store::{AccountRecord, AccountStore};
use crate::services::auth::token_codec::TokenCodec;
use crate::services::auth::validator::ValidationOutcome;

/// The token authority: the sole source of truth for issuing and validating
/// identity tokens.
///
/// - `login`/`register` are the only paths that check credentials.
/// - `validate` is soft: an invalid token yields `isValid=false`, never an
///   error, because the same result is served over the wire to delegating
///   services.
#[derive(Clone)]
pub struct TokenAuthority {
    codec: TokenCodec,
    hasher: PasswordHasher,
    store: Arc<dyn AccountStore>,
}

impl TokenAuthority {
    pub fn new(codec: TokenCodec, hasher: PasswordHasher, store: Arc<dyn AccountStore>) -> Self {
        Self {
            codec,
            hasher,
            store,
        }
    }

    pub fn token_ttl_seconds(&self) -> u64 {
        self.codec.ttl_seconds()
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown identifier and wrong secret return the same
    /// `InvalidCredentials`, and the unknown path still pays for one hash
    /// verification so the two cannot be told apart by timing.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<String, AppError> {
        let account = self.store.find_by_email(identifier).await.map_err(|e| {
            error!(error = %e, "account lookup failed");
            AppError::Internal
        })?;

        let Some(account) = account else {
            let _ = self.hasher.verify(secret, placeholder_hash());
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(secret, &account.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        Ok(self.codec.issue(&account.identity())?)
    }

    /// Create an account and issue a token immediately (auto-login).
    /// Uniqueness of the identifier surfaces as `Conflict`.
    pub async fn register(
        &self,
        identifier: &str,
        username: &str,
        secret: &str,
    ) -> Result<String, AppError> {
        let password_hash = self.hasher.hash(secret)?;
        let account = self
            .store
            .create(identifier, username, &password_hash)
            .await?;

        Ok(self.codec.issue(&account.identity())?)
    }

    /// Verify a presented token. Never raises for a bad token: the outcome is
    /// the transport-serializable `{isValid, identity}` shape.
    pub fn validate(&self, token: &str) -> ValidationOutcome {
        match self.codec.verify(token) {
            Ok(identity) => ValidationOutcome {
                is_valid: true,
                identity: Some(identity),
            },
            Err(_) => ValidationOutcome {
                is_valid: false,
                identity: None,
            },
        }
    }

    pub async fn profile(&self, id: Uuid) -> Result<AccountRecord, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AppError::not_found("account"))
    }

    pub async fn update_username(
        &self,
        id: Uuid,
        username: &str,
    ) -> Result<AccountRecord, AppError> {
        self.store
            .update_username(id, username)
            .await?
            .ok_or(AppError::not_found("account"))
    }
}

// Verified against when the identifier is unknown, so both login failure
// paths cost one argon2 verification.
fn placeholder_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| {
        PasswordHasher::new()
            .hash("placeholder-credential")
            .unwrap_or_default()
    })
}
