/*
 * authgate: central token authority + delegating bearer-auth middleware.
 *
 * - The binary runs the token authority (issue/validate + its own protected
 *   profile endpoints).
 * - Downstream services reuse `middleware::auth::access` and
 *   `middleware::rate_limit` in front of their protected routes, pointing a
 *   `RemoteValidator` at the authority.
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
