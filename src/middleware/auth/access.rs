//! Delegating bearer-token authentication.
//!
//! Extracts `Authorization: Bearer <token>`, asks a [`TokenValidator`]
//! (in-process or remote authority, the contract is identical), and on
//! success puts an [`AuthCtx`] into request extensions for the extractor.
//!
//! The middleware never retries the authority on its own: an outage surfaces
//! immediately as `AuthorityUnavailable` instead of being masked by hidden
//! retries that would amplify load.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use tracing::warn;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::validator::TokenValidator;

/// Apply bearer authentication to every route in `router`.
///
/// Example:
/// ```ignore
/// let protected = Router::new().route("/auth/profile", get(get_profile));
/// let protected = middleware::auth::access::apply(protected, state.validator.clone());
/// ```
pub fn apply<S>(router: Router<S>, validator: Arc<dyn TokenValidator>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(validator, access_middleware))
}

async fn access_middleware(
    State(validator): State<Arc<dyn TokenValidator>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?.to_string();

    // Transport-level failures reaching the authority propagate as-is
    // (AuthorityUnavailable); they are never downgraded to a token problem.
    let outcome = validator.validate(&token).await?;

    let identity = match outcome.identity {
        Some(identity) if outcome.is_valid => identity,
        _ => {
            warn!("token rejected by authority");
            return Err(AppError::InvalidToken);
        }
    };

    // Request-scoped handoff to the AuthCtx extractor; extensions die with
    // the request, so nothing leaks across requests.
    req.extensions_mut().insert(AuthCtx::new(identity));

    Ok(next.run(req).await)
}

/// Strict bearer extraction: the scheme is case-sensitive `Bearer`, followed
/// by exactly one space and a non-empty token. Anything else is
/// `MissingToken` and short-circuits before any validation work.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::MissingToken)?;

    let token = raw.strip_prefix("Bearer ").ok_or(AppError::MissingToken)?;
    if token.is_empty() || token.contains(' ') {
        return Err(AppError::MissingToken);
    }

    Ok(token)
}
