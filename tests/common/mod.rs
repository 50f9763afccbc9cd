#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use http_body_util::BodyExt;
use uuid::Uuid;

use authgate::app::build_router;
use authgate::repos::error::RepoError;
use authgate::services::auth::password::PasswordHasher;
use authgate::services::auth::store::{AccountRecord, AccountStore};
use authgate::services::auth::{LocalValidator, TokenAuthority, TokenCodec, TokenValidator};
use authgate::services::rate_limit::{Quota, RateLimiter, RouteQuotas};
use authgate::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";

/// In-memory account store. Counts credential lookups so tests can assert the
/// limiter rejects before any credential work happens.
#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<Vec<AccountRecord>>,
    lookups: AtomicUsize,
}

impl MemoryStore {
    pub fn credential_lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, RepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, RepoError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<AccountRecord, RepoError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == email) {
            return Err(RepoError::Conflict);
        }
        let record = AccountRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        accounts.push(record.clone());
        Ok(record)
    }

    async fn update_username(
        &self,
        id: Uuid,
        username: &str,
    ) -> Result<Option<AccountRecord>, RepoError> {
        let mut accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter_mut().find(|a| a.id == id).map(|a| {
            a.username = username.to_string();
            a.clone()
        }))
    }
}

pub fn quotas(login_max: u32) -> RouteQuotas {
    RouteQuotas {
        login: Quota {
            max_requests: login_max,
            window: Duration::from_secs(60),
        },
        general: Quota {
            max_requests: 100,
            window: Duration::from_secs(60),
        },
        expensive: Quota {
            max_requests: 50,
            window: Duration::from_secs(60),
        },
    }
}

pub fn authority_state(quotas: RouteQuotas) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let authority = Arc::new(TokenAuthority::new(
        TokenCodec::new(TEST_SECRET, 3600, 0),
        PasswordHasher::new(),
        store.clone(),
    ));
    let validator: Arc<dyn TokenValidator> = Arc::new(LocalValidator::new(authority.clone()));
    let state = AppState::new(
        authority,
        validator,
        Arc::new(RateLimiter::new()),
        quotas,
    );
    (state, store)
}

pub fn authority_app(quotas: RouteQuotas) -> Router {
    build_router(authority_state(quotas).0)
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
