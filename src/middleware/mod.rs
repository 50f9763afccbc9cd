/*
 * Responsibility
 * - Request-pipeline stages shared by the authority and delegating services
 * - rate_limit runs strictly before auth so rejected requests never pay
 *   credential-check cost
 */
pub mod auth;
pub mod rate_limit;
