/*
 * Responsibility
 * - Auth request/response DTOs
 * - validate() covers shape checks only; credential checks belong to the
 *   authority
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::auth::store::AccountRecord;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub secret: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.identifier.trim().is_empty() {
            return Err("identifier is required");
        }
        if self.secret.is_empty() {
            return Err("secret is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub identifier: String,
    pub secret: String,
    pub username: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.identifier.trim().is_empty() || !self.identifier.contains('@') {
            return Err("identifier must be an email address");
        }
        if self.secret.len() < 8 {
            return Err("secret must be at least 8 characters");
        }
        if self.username.trim().is_empty() {
            return Err("username is required");
        }
        if self.username.len() > 64 {
            return Err("username must be <= 64 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    /// Always "Bearer".
    pub token_type: &'static str,
    /// Seconds until expiry.
    pub expires_in: u64,
}

impl TokenResponse {
    pub fn bearer(token: String, expires_in: u64) -> Self {
        Self {
            token,
            token_type: "Bearer",
            expires_in,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<AccountRecord> for ProfileResponse {
    fn from(account: AccountRecord) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() {
            return Err("username is required");
        }
        if self.username.len() > 64 {
            return Err("username must be <= 64 chars");
        }
        Ok(())
    }
}
