/*
 * Responsibility
 * - Load environment configuration (token secret/TTL, authority URL, rate limits)
 * - Validate at startup (missing/invalid values fail the boot, never at runtime)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::rate_limit::{Quota, RouteQuotas};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub database_url: String,

    // Token authority signs and verifies with this process-wide secret.
    pub token_secret: String,
    pub token_ttl_seconds: u64,
    pub token_leeway_seconds: u64,

    // When set, protected routes delegate validation to a remote authority
    // instead of the in-process one.
    pub authority_base_url: Option<String>,
    pub authority_timeout: Duration,

    pub rate_limits: RouteQuotas,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parse_or("PORT", 4000);
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let token_secret =
            std::env::var("TOKEN_SECRET").map_err(|_| ConfigError::Missing("TOKEN_SECRET"))?;
        // Short HMAC secrets are brute-forceable; refuse to boot with one.
        if token_secret.len() < 32 {
            return Err(ConfigError::Invalid("TOKEN_SECRET"));
        }

        let token_ttl_seconds = parse_or("TOKEN_TTL_SECONDS", 86_400); // 24h
        let token_leeway_seconds = parse_or("TOKEN_LEEWAY_SECONDS", 60);

        let authority_base_url = std::env::var("AUTHORITY_BASE_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let authority_timeout = Duration::from_millis(parse_or("AUTHORITY_TIMEOUT_MS", 3_000));

        // login/register get the tightest budget; the expensive class covers
        // costly downstream routes (AI tasks etc.) in delegating services.
        let rate_limits = RouteQuotas {
            login: quota_from_env("LOGIN", 10, 60),
            general: quota_from_env("GENERAL", 120, 60),
            expensive: quota_from_env("EXPENSIVE", 20, 60),
        };

        Ok(Self {
            addr,
            app_env,
            database_url,
            token_secret,
            token_ttl_seconds,
            token_leeway_seconds,
            authority_base_url,
            authority_timeout,
            rate_limits,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn quota_from_env(class: &str, default_max: u32, default_window_secs: u64) -> Quota {
    Quota {
        max_requests: parse_or(&format!("RATE_LIMIT_{class}_MAX"), default_max),
        window: Duration::from_secs(parse_or(
            &format!("RATE_LIMIT_{class}_WINDOW_SECONDS"),
            default_window_secs,
        )),
    }
}
