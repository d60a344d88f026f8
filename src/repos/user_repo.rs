/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - 認可で必要なのは「アカウントがまだ存在するか」だけなので exists のみ提供
 */
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoError;

pub async fn exists(db: &PgPool, user_id: Uuid) -> Result<bool, RepoError> {
    let found: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM users
            WHERE "userId" = $1
        )
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;

    Ok(found)
}
