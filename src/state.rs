/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Clone-cheap: everything inside is Arc or Copy
 * - Built once at startup; no runtime mutation of configuration
 */
use std::sync::Arc;

use crate::services::auth::authority::TokenAuthority;
use crate::services::auth::validator::TokenValidator;
use crate::services::rate_limit::{RateLimiter, RouteQuotas};

#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<TokenAuthority>,
    /// Polymorphic validate capability: local in the authority process,
    /// remote in delegating services. Routes never special-case either.
    pub validator: Arc<dyn TokenValidator>,
    pub limiter: Arc<RateLimiter>,
    pub quotas: RouteQuotas,
}

impl AppState {
    pub fn new(
        authority: Arc<TokenAuthority>,
        validator: Arc<dyn TokenValidator>,
        limiter: Arc<RateLimiter>,
        quotas: RouteQuotas,
    ) -> Self {
        Self {
            authority,
            validator,
            limiter,
            quotas,
        }
    }
}
