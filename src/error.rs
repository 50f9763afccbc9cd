/*
 * Responsibility
 * - App-wide AppError: the fixed failure taxonomy for the auth boundary
 * - IntoResponse implementation (HTTP status / JSON error body)
 * - Conversions from repo / token / hashing errors
 *
 * Every failure path constructs exactly one AppError and it flows outward
 * unchanged; internal details are logged at the failure site, never returned
 * to the caller.
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::password::PasswordError;
use crate::services::auth::token_codec::TokenError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// No Authorization header, or one that is not exactly `Bearer <token>`.
    #[error("access token required")]
    MissingToken,
    /// Signature/expiry failure, or the authority reported the token invalid.
    #[error("invalid or expired token")]
    InvalidToken,
    /// The token authority could not be consulted (transport-level failure).
    /// A server-side problem, never a statement about the client's token.
    #[error("authentication service unavailable")]
    AuthorityUnavailable,
    /// Unknown identifier or wrong secret. One shape for both, so responses
    /// cannot be used to enumerate accounts.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account already exists")]
    Conflict,
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("rate limit exceeded")]
    RateLimited { retry_after: Option<u64> },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::AuthorityUnavailable => "AUTHORITY_UNAVAILABLE",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Conflict => "CONFLICT",
            Self::BadRequest { code, .. } => code,
            Self::NotFound { .. } => "NOT_FOUND",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Whether the caller may retry the same request later.
    pub fn retryable(&self) -> bool {
        matches!(self, Self::AuthorityUnavailable | Self::RateLimited { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingToken | AppError::InvalidToken | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::AuthorityUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            AppError::BadRequest { message, .. } => message.clone(),
            AppError::NotFound { resource } => format!("{resource} not found."),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.kind(),
                message,
            },
        };

        let mut response = (status, Json(body)).into_response();

        if let AppError::RateLimited {
            retry_after: Some(secs),
        } = self
            && let Ok(value) = HeaderValue::from_str(&secs.to_string())
        {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }

        response
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::Conflict,
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid => AppError::InvalidToken,
            TokenError::Signing => AppError::Internal,
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(_: PasswordError) -> Self {
        AppError::Internal
    }
}
