use async_trait::async_trait;
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::services::auth::token_codec::Identity;

/// Stored account row, limited to the fields authentication needs.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

impl AccountRecord {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.to_string(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Account lookup/creation used by the token authority.
///
/// Kept behind a trait so the authority can run against Postgres in
/// production and an in-memory store in tests.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, RepoError>;

    // Returns RepoError::Conflict when the email is already taken.
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<AccountRecord, RepoError>;

    async fn update_username(
        &self,
        id: Uuid,
        username: &str,
    ) -> Result<Option<AccountRecord>, RepoError>;
}
