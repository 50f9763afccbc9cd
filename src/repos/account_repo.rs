/*
 * Responsibility
 * - accounts table operations for the token authority
 * - unique-violation on email surfaces as RepoError::Conflict
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::services::auth::store::{AccountRecord, AccountStore};

#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    username: String,
    password_hash: String,
}

impl From<AccountRow> for AccountRecord {
    fn from(row: AccountRow) -> Self {
        AccountRecord {
            id: row.id,
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, RepoError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, username, password_hash
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(AccountRecord::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, RepoError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, username, password_hash
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(AccountRecord::from))
    }

    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<AccountRecord, RepoError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (email, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, username, password_hash
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row.into())
    }

    async fn update_username(
        &self,
        id: Uuid,
        username: &str,
    ) -> Result<Option<AccountRecord>, RepoError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts
            SET username = $2
            WHERE id = $1
            RETURNING id, email, username, password_hash
            "#,
        )
        .bind(id)
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(AccountRecord::from))
    }
}
