//! User repository: account creation and lookup.

use chrono::Utc;
use polyglot_common::any_row::timestamp;
use polyglot_common::models::User;
use sqlx::AnyPool;

/// Create a new user account. `password_hash` is already Argon2-hashed.
pub async fn create_user(
    pool: &AnyPool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let now = timestamp(Utc::now());
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(now.clone())
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Find a user by their unique ID.
pub async fn find_by_id(pool: &AnyPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find a user by email (case-insensitive).
pub async fn find_by_email(pool: &AnyPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER(?)")
        .bind(email)
        .fetch_optional(pool)
        .await
}
