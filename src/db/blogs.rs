// src/db/blogs.rs

use sqlx::PgPool;

use crate::{
    error::AppError,
    models::blog::{Blog, BlogListParams},
};

/// Column changes for an update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct BlogChanges<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

pub async fn create_blog(
    pool: &PgPool,
    user_id: i64,
    title: &str,
    content: &str,
    image_url: Option<&str>,
) -> Result<Blog, AppError> {
    let blog = sqlx::query_as::<_, Blog>(
        r#"
        WITH inserted AS (
            INSERT INTO blogs (user_id, title, content, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
        )
        SELECT b.id, b.user_id, u.username AS author, b.title, b.content,
               b.image_url, b.created_at, b.updated_at
        FROM inserted b
        JOIN users u ON u.id = b.user_id
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(content)
    .bind(image_url)
    .fetch_one(pool)
    .await?;

    Ok(blog)
}

pub async fn find_blog(pool: &PgPool, id: i64) -> Result<Option<Blog>, AppError> {
    let blog = sqlx::query_as::<_, Blog>(
        r#"
        SELECT b.id, b.user_id, u.username AS author, b.title, b.content,
               b.image_url, b.created_at, b.updated_at
        FROM blogs b
        JOIN users u ON u.id = b.user_id
        WHERE b.id = $1 AND b.deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(blog)
}

/// Lists live blogs newest first, ordered by `(created_at, id)`.
///
/// The page cursor is `created_at` of the last row seen, optionally paired
/// with its id; without the id every row at that timestamp is skipped.
pub async fn list_blogs(pool: &PgPool, params: &BlogListParams) -> Result<Vec<Blog>, AppError> {
    let blogs = sqlx::query_as::<_, Blog>(
        r#"
        SELECT b.id, b.user_id, u.username AS author, b.title, b.content,
               b.image_url, b.created_at, b.updated_at
        FROM blogs b
        JOIN users u ON u.id = b.user_id
        WHERE b.deleted_at IS NULL
          AND (
                $1::TIMESTAMPTZ IS NULL
                OR b.created_at < $1
                OR ($2::BIGINT IS NOT NULL AND b.created_at = $1 AND b.id < $2)
          )
          AND ($3::BIGINT IS NULL OR b.user_id = $3)
        ORDER BY b.created_at DESC, b.id DESC
        LIMIT $4
        "#,
    )
    .bind(params.cursor)
    .bind(params.cursor_id)
    .bind(params.author)
    .bind(params.effective_limit())
    .fetch_all(pool)
    .await?;

    Ok(blogs)
}

/// Author id of a live blog.
pub async fn find_owner(pool: &PgPool, id: i64) -> Result<Option<i64>, AppError> {
    let owner = sqlx::query_scalar::<_, i64>(
        "SELECT user_id FROM blogs WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(owner)
}

pub async fn update_blog(
    pool: &PgPool,
    id: i64,
    changes: &BlogChanges<'_>,
) -> Result<Option<Blog>, AppError> {
    let blog = sqlx::query_as::<_, Blog>(
        r#"
        WITH updated AS (
            UPDATE blogs SET
                title      = COALESCE($2, title),
                content    = COALESCE($3, content),
                image_url  = COALESCE($4, image_url),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
        )
        SELECT b.id, b.user_id, u.username AS author, b.title, b.content,
               b.image_url, b.created_at, b.updated_at
        FROM updated b
        JOIN users u ON u.id = b.user_id
        "#,
    )
    .bind(id)
    .bind(changes.title)
    .bind(changes.content)
    .bind(changes.image_url)
    .fetch_optional(pool)
    .await?;

    Ok(blog)
}

/// Marks a blog deleted. Returns false if it was missing or already deleted.
pub async fn soft_delete_blog(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE blogs SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
