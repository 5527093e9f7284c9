//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{User, UserCreate, UserUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, username, password_hash, first_name, last_name, email, phone_number, role, is_active, date_joined, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM user WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let user =
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM user WHERE username = ?"))
            .bind(username)
            .fetch_optional(pool)
            .await?;
    Ok(user)
}

pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM user ORDER BY username LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert a user. The password is hashed by the caller; this layer never
/// sees plaintext.
pub async fn create(pool: &SqlitePool, data: UserCreate, password_hash: String) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO user (id, username, password_hash, first_name, last_name, email, phone_number, role, is_active, date_joined, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?9, ?9)",
    )
    .bind(id)
    .bind(&data.username)
    .bind(&password_hash)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.email)
    .bind(&data.phone_number)
    .bind(data.role)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Update a user. `password_hash` replaces the stored hash when the caller
/// supplied a new password.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: UserUpdate,
    password_hash: Option<String>,
) -> RepoResult<User> {
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE user SET password_hash = COALESCE(?1, password_hash), first_name = COALESCE(?2, first_name), last_name = COALESCE(?3, last_name), email = COALESCE(?4, email), phone_number = COALESCE(?5, phone_number), role = COALESCE(?6, role), is_active = COALESCE(?7, is_active), updated_at = ?8 WHERE id = ?9",
    )
    .bind(&password_hash)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.email)
    .bind(&data.phone_number)
    .bind(data.role)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}
