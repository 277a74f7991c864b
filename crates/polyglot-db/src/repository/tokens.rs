//! Personal access tokens. Only the SHA-256 hex digest of a token is stored.

use chrono::Utc;
use polyglot_common::any_row::timestamp;
use polyglot_common::models::AccessToken;
use sqlx::AnyPool;

/// Name given to tokens issued by register and login.
pub const API_TOKEN_NAME: &str = "api-token";

/// Store a freshly issued token for `user_id`.
pub async fn create_token(
    pool: &AnyPool,
    user_id: i64,
    name: &str,
    token_hash: &str,
) -> Result<AccessToken, sqlx::Error> {
    sqlx::query_as::<_, AccessToken>(
        r#"
        INSERT INTO personal_access_tokens (user_id, name, token_hash, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(token_hash)
    .bind(timestamp(Utc::now()))
    .fetch_one(pool)
    .await
}

pub async fn find_by_hash(
    pool: &AnyPool,
    token_hash: &str,
) -> Result<Option<AccessToken>, sqlx::Error> {
    sqlx::query_as::<_, AccessToken>("SELECT * FROM personal_access_tokens WHERE token_hash = ?")
        .bind(token_hash)
        .fetch_optional(pool)
        .await
}

/// Stamp `last_used_at` after a successful authentication.
pub async fn touch_last_used(pool: &AnyPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE personal_access_tokens SET last_used_at = ? WHERE id = ?")
        .bind(timestamp(Utc::now()))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Revoke one token. Returns whether a row was removed.
pub async fn delete_token(pool: &AnyPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM personal_access_tokens WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
