use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::AppError;
use crate::services::auth::authority::TokenAuthority;
use crate::services::auth::token_codec::Identity;

/// Wire shape of a validate call. Soft by design: a bad token is
/// `isValid=false` with a 200, so delegating services can check the flag
/// instead of catching errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}

/// The single validate capability the middleware depends on.
///
/// Two implementations: in-process ([`LocalValidator`]) and over the network
/// ([`RemoteValidator`]). Callers must not special-case either.
///
/// `Err(_)` means the authority could not be consulted at all (a server-side
/// failure), never that the presented token is bad.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<ValidationOutcome, AppError>;
}

/// Validate against a colocated authority, no network hop.
pub struct LocalValidator {
    authority: Arc<TokenAuthority>,
}

impl LocalValidator {
    pub fn new(authority: Arc<TokenAuthority>) -> Self {
        Self { authority }
    }
}

#[async_trait]
impl TokenValidator for LocalValidator {
    async fn validate(&self, token: &str) -> Result<ValidationOutcome, AppError> {
        Ok(self.authority.validate(token))
    }
}

/// Validate against a remote authority over HTTP, forwarding the original
/// bearer token unchanged.
///
/// The call carries its own bounded timeout, separate from any general
/// request timeout. Transport failures (timeout, refused connection,
/// unexpected status) classify as `AuthorityUnavailable`; only an explicit
/// 401 or `isValid=false` from the authority counts against the token.
pub struct RemoteValidator {
    client: reqwest::Client,
    validate_url: String,
}

impl RemoteValidator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                error!(error = %e, "failed to build authority http client");
                AppError::Internal
            })?;

        Ok(Self {
            client,
            validate_url: format!("{}/api/v1/auth/validate", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl TokenValidator for RemoteValidator {
    async fn validate(&self, token: &str) -> Result<ValidationOutcome, AppError> {
        let response = self
            .client
            .post(&self.validate_url)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, timeout = e.is_timeout(), "token authority unreachable");
                AppError::AuthorityUnavailable
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(ValidationOutcome {
                is_valid: false,
                identity: None,
            });
        }
        if !status.is_success() {
            warn!(%status, "unexpected status from token authority");
            return Err(AppError::AuthorityUnavailable);
        }

        response.json::<ValidationOutcome>().await.map_err(|e| {
            warn!(error = %e, "malformed response from token authority");
            AppError::AuthorityUnavailable
        })
    }
}
