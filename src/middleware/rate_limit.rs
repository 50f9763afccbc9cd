//! Rate-limit middleware. Applied outside the auth middleware so the limiter
//! decision is made before any credential-check cost is paid.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use tracing::warn;

use crate::error::AppError;
use crate::services::rate_limit::{Acquire, Quota, RateLimiter, RouteClass};

#[derive(Clone)]
struct RateLimitPolicy {
    limiter: Arc<RateLimiter>,
    class: RouteClass,
    quota: Quota,
}

/// Apply a per-client budget for the given route class to every route in
/// `router`.
pub fn apply<S>(
    router: Router<S>,
    limiter: Arc<RateLimiter>,
    class: RouteClass,
    quota: Quota,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(
        RateLimitPolicy {
            limiter,
            class,
            quota,
        },
        rate_limit_middleware,
    ))
}

async fn rate_limit_middleware(
    State(policy): State<RateLimitPolicy>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&req);

    match policy.limiter.try_acquire(policy.class, &key, policy.quota) {
        Acquire::Allowed { .. } => Ok(next.run(req).await),
        Acquire::Rejected { retry_after } => {
            warn!(class = policy.class.as_str(), %key, "rate limit exceeded");
            Err(AppError::RateLimited {
                retry_after: Some(retry_after.as_secs().max(1)),
            })
        }
    }
}

// Client key: first X-Forwarded-For hop when present (we sit behind a proxy
// in production), otherwise the peer address.
fn client_key(req: &Request<Body>) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        && let Some(first) = forwarded.split(',').next()
        && !first.trim().is_empty()
    {
        return first.trim().to_string();
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}
