/*
 * Responsibility
 * - shares テーブル向け SQLx 操作 (read only)
 * - token から公開リンクの共有情報を引く
 * - DB エラーは RepoError として返す (CheckFailure への変換は上位の責務)
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct ShareRow {
    #[sqlx(rename = "shareId")]
    pub id: i64,
    pub token: String,
    #[sqlx(rename = "ownerId")]
    pub owner_id: Uuid,
    pub path: String,
    #[sqlx(rename = "passwordHash")]
    pub password_hash: Option<String>,
    #[sqlx(rename = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>,
}

pub async fn find_by_token(db: &PgPool, token: &str) -> Result<Option<ShareRow>, RepoError> {
    let row = sqlx::query_as::<_, ShareRow>(
        r#"
        SELECT "shareId", token, "ownerId", path, "passwordHash", "expiresAt"
        FROM shares
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
