/*!
 * Authenticated-request context
 *
 * Responsibility:
 * - Hand the identity resolved by the access middleware to handlers
 * - HTTP/axum plumbing stays in core, the contract type in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
