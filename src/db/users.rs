// src/db/users.rs

use sqlx::PgPool;

use crate::{error::AppError, models::user::User};

/// Column changes for an update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UserChanges<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub role: Option<&'a str>,
}

pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: Option<&str>,
    password_hash: &str,
    role: &str,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, email, password, role, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password, role, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password, role, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password, role, created_at
        FROM users
        ORDER BY id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Applies `changes` and returns the updated row, or `None` if no such user.
pub async fn update_user(
    pool: &PgPool,
    id: i64,
    changes: &UserChanges<'_>,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            username = COALESCE($2, username),
            email    = COALESCE($3, email),
            password = COALESCE($4, password),
            role     = COALESCE($5, role)
        WHERE id = $1
        RETURNING id, username, email, password, role, created_at
        "#,
    )
    .bind(id)
    .bind(changes.username)
    .bind(changes.email)
    .bind(changes.password_hash)
    .bind(changes.role)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Deletes a user and, through the foreign key, their blogs.
pub async fn delete_user(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
