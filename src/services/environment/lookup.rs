//! Read-only lookups the resolver consumes, and their Postgres implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::types::Share;
use crate::repos::{error::RepoError, share_repo, user_repo};

#[async_trait]
pub trait ShareLookup: Send + Sync {
    async fn find_by_token(&self, token: &str) -> Result<Option<Share>, RepoError>;
}

#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn user_exists(&self, user_id: Uuid) -> Result<bool, RepoError>;
}

/// Shares and accounts backed by the application database.
#[derive(Clone, Debug)]
pub struct PgDirectory {
    db: PgPool,
}

impl PgDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ShareLookup for PgDirectory {
    async fn find_by_token(&self, token: &str) -> Result<Option<Share>, RepoError> {
        let row = share_repo::find_by_token(&self.db, token).await?;

        Ok(row.map(|r| Share {
            id: r.id,
            token: r.token,
            owner: r.owner_id,
            path: r.path,
            password_hash: r.password_hash,
            expires_at: r.expires_at,
        }))
    }
}

#[async_trait]
impl UserLookup for PgDirectory {
    async fn user_exists(&self, user_id: Uuid) -> Result<bool, RepoError> {
        user_repo::exists(&self.db, user_id).await
    }
}
