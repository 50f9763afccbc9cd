/*
 * Responsibility
 * - Config load → dependency construction → Router assembly
 * - tracing/panic-hook init, axum::serve() startup
 */
use std::net::SocketAddr;
use std::sync::Arc;
use std::{panic, process};

use anyhow::Result;
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::repos::account_repo::PgAccountStore;
use crate::services::auth::authority::TokenAuthority;
use crate::services::auth::password::PasswordHasher;
use crate::services::auth::token_codec::TokenCodec;
use crate::services::auth::validator::{LocalValidator, RemoteValidator, TokenValidator};
use crate::services::rate_limit::RateLimiter;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,authgate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get lost
        // (stderr can be hidden depending on how the process is launched).
        tracing::error!(?info, "panic");

        // In development, fail fast; in production, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting token authority in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    // connect-info feeds the rate limiter's client key when no proxy header
    // is present.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    let codec = TokenCodec::new(
        &config.token_secret,
        config.token_ttl_seconds,
        config.token_leeway_seconds,
    );
    let store = Arc::new(PgAccountStore::new(db));
    let authority = Arc::new(TokenAuthority::new(codec, PasswordHasher::new(), store));

    // Protected routes see the same validate contract whether the authority
    // is this process or a remote peer.
    let validator: Arc<dyn TokenValidator> = match &config.authority_base_url {
        Some(base_url) => {
            tracing::info!(%base_url, "delegating token validation to remote authority");
            Arc::new(RemoteValidator::new(base_url, config.authority_timeout)?)
        }
        None => Arc::new(LocalValidator::new(authority.clone())),
    };

    Ok(AppState::new(
        authority,
        validator,
        Arc::new(RateLimiter::new()),
        config.rate_limits,
    ))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
