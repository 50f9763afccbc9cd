/*
 * Responsibility
 * - The type handlers see for an authenticated request
 * - The access middleware verifies and inserts it; handlers only read it
 *
 * Notes
 * - Token verification lives in middleware/services; this is the contract
 * - Per-request and owned by the request's extensions; never persisted or
 *   shared across requests
 */

use crate::services::auth::token_codec::Identity;

/// Context attached to a request once the authority accepted its token.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub identity: Identity,
    /// Raw token subject, kept for audit/correlation.
    pub subject: String,
}

impl AuthCtx {
    pub fn new(identity: Identity) -> Self {
        let subject = identity.id.clone();
        Self { identity, subject }
    }
}
