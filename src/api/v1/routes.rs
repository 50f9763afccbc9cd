/*
 * Responsibility
 * - v1 URL structure and which pipeline stages guard each group
 * - Order per group: rate limit (outermost) → auth → handler, so the limiter
 *   decides before any credential or authority work
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    auth::{get_profile, login, register, update_profile, validate},
    health::health,
};
use crate::middleware::{auth::access, rate_limit};
use crate::services::rate_limit::RouteClass;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    // Credential checks are expensive and attackable: tightest budget.
    let credential = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register));
    let credential = rate_limit::apply(
        credential,
        state.limiter.clone(),
        RouteClass::Login,
        state.quotas.login,
    );

    let validation = Router::new().route("/auth/validate", post(validate));
    let validation = rate_limit::apply(
        validation,
        state.limiter.clone(),
        RouteClass::General,
        state.quotas.general,
    );

    // The authority's own protected surface sits behind the same delegating
    // middleware every other service uses.
    let profile = Router::new().route("/auth/profile", get(get_profile).put(update_profile));
    let profile = access::apply(profile, state.validator.clone());
    let profile = rate_limit::apply(
        profile,
        state.limiter.clone(),
        RouteClass::General,
        state.quotas.general,
    );

    Router::new()
        .route("/health", get(health))
        .merge(credential)
        .merge(validation)
        .merge(profile)
}
