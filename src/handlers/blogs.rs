// src/handlers/blogs.rs

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    db::blogs::{self as blog_db, BlogChanges},
    error::AppError,
    extract::Payload,
    media::MediaClient,
    models::blog::{BlogListParams, CreateBlogRequest, UpdateBlogRequest},
    utils::{html::sanitize_content, jwt::Claims},
};

/// Multipart field carrying the uploaded file.
pub const IMAGE_FIELD: &str = "image";

/// List blogs (Recent first).
/// Supports cursor-based pagination and filtering by author.
pub async fn list_blogs(
    State(pool): State<PgPool>,
    Query(params): Query<BlogListParams>,
) -> Result<impl IntoResponse, AppError> {
    let blogs = blog_db::list_blogs(&pool, &params).await?;
    Ok(Json(blogs))
}

pub async fn get_blog(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let blog = blog_db::find_blog(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Blog not found".to_string()))?;

    Ok(Json(blog))
}

/// Create a new blog post for the authenticated user.
pub async fn create_blog(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Payload(payload): Payload<CreateBlogRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let content = sanitized(&payload.content)?;
    let blog = blog_db::create_blog(
        &pool,
        claims.user_id()?,
        payload.title.trim(),
        &content,
        payload.image_url.as_deref(),
    )
    .await?;

    tracing::info!(blog_id = blog.id, user_id = blog.user_id, "Blog created");
    Ok((StatusCode::CREATED, Json(blog)))
}

/// Update a blog post.
/// Requires: Login + (Author OR Admin).
pub async fn update_blog(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Payload(payload): Payload<UpdateBlogRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize_author(&pool, &claims, id).await?;
    payload.validate()?;

    let content = payload.content.as_deref().map(sanitized).transpose()?;
    let changes = BlogChanges {
        title: payload.title.as_deref().map(str::trim),
        content: content.as_deref(),
        image_url: payload.image_url.as_deref(),
    };

    let blog = blog_db::update_blog(&pool, id, &changes)
        .await?
        .ok_or(AppError::NotFound("Blog not found".to_string()))?;

    Ok(Json(blog))
}

/// Delete a blog post (Soft Delete).
/// Requires: Login + (Author OR Admin).
pub async fn delete_blog(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize_author(&pool, &claims, id).await?;

    if !blog_db::soft_delete_blog(&pool, id).await? {
        return Err(AppError::NotFound("Blog not found".to_string()));
    }

    tracing::info!(blog_id = id, "Blog deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Upload an image to the media provider.
///
/// Expects a multipart form with an `image` field whose content type is `image/*`.
pub async fn upload_image(
    State(media): State<MediaClient>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .filter(|ct| ct.starts_with("image/"))
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Only image uploads are accepted".to_string()))?;
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded image is empty".to_string()));
        }

        tracing::info!(
            user_id = %claims.sub,
            size = bytes.len(),
            "Forwarding image upload"
        );
        let image = media
            .upload_image(bytes.to_vec(), file_name, &content_type)
            .await?;
        return Ok((StatusCode::CREATED, Json(image)));
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field '{}'",
        IMAGE_FIELD
    )))
}

async fn authorize_author(pool: &PgPool, claims: &Claims, id: i64) -> Result<(), AppError> {
    let owner = blog_db::find_owner(pool, id)
        .await?
        .ok_or(AppError::NotFound("Blog not found".to_string()))?;

    if !claims.can_act_for(owner)? {
        return Err(AppError::Forbidden(
            "You are not the author of this blog".to_string(),
        ));
    }
    Ok(())
}

fn sanitized(content: &str) -> Result<String, AppError> {
    let cleaned = sanitize_content(content);
    if cleaned.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Content is empty after sanitizing".to_string(),
        ));
    }
    Ok(cleaned)
}
