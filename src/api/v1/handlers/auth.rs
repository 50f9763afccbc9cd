/*
 * Responsibility
 * - /auth handlers: login, register, validate, profile
 * - Shape validation on DTOs, then delegate to TokenAuthority
 */
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use uuid::Uuid;

use crate::api::v1::dto::auth::{
    LoginRequest, ProfileResponse, RegisterRequest, TokenResponse, UpdateProfileRequest,
};
use crate::api::v1::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::middleware::auth::access::bearer_token;
use crate::services::auth::validator::ValidationOutcome;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_REQUEST", m))?;

    let token = state.authority.login(&req.identifier, &req.secret).await?;

    Ok(Json(TokenResponse::bearer(
        token,
        state.authority.token_ttl_seconds(),
    )))
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_REQUEST", m))?;

    let token = state
        .authority
        .register(&req.identifier, &req.username, &req.secret)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse::bearer(
            token,
            state.authority.token_ttl_seconds(),
        )),
    ))
}

/// The remote half of the delegation contract. A bad token is a 200 with
/// `isValid=false`; only a missing/malformed header is a client error.
pub async fn validate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ValidationOutcome>, AppError> {
    let token = bearer_token(&headers)?;
    Ok(Json(state.authority.validate(token)))
}

pub async fn get_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<ProfileResponse>, AppError> {
    let id = parse_subject(&ctx.subject)?;
    let account = state.authority.profile(id).await?;
    Ok(Json(account.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_REQUEST", m))?;

    let id = parse_subject(&ctx.subject)?;
    let account = state.authority.update_username(id, &req.username).await?;
    Ok(Json(account.into()))
}

// Subjects are account UUIDs; anything else cannot have come from our issuer.
fn parse_subject(subject: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(subject).map_err(|_| AppError::InvalidToken)
}
