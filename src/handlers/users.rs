// src/handlers/users.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    db::users::{self as user_db, UserChanges},
    error::AppError,
    extract::Payload,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest},
    utils::{
        hash::{hash_password, verify_password},
        jwt::{Claims, sign_jwt},
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(pool): State<PgPool>,
    Payload(payload): Payload<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hashed_password = hash_password(&payload.password)?;

    let user = user_db::create_user(
        &pool,
        &payload.username,
        payload.email.as_deref(),
        &hashed_password,
        "user",
    )
    .await
    .map_err(|e| match e {
        AppError::Conflict(_) => AppError::Conflict(format!(
            "Username '{}' or email already exists",
            payload.username
        )),
        other => other,
    })?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a JWT token.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Payload(payload): Payload<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invalid = || AppError::AuthError("Invalid username or password".to_string());

    let user = user_db::find_by_username(&pool, &payload.username)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(invalid());
    }

    let token = sign_jwt(
        user.id,
        &user.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        user,
    }))
}

/// Returns the authenticated user.
pub async fn me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_db::find_by_id(&pool, claims.user_id()?)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users = user_db::list_users(&pool).await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_db::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Updates a user's profile.
/// Requires: Login + (Self OR Admin). Changing roles is admin-only.
pub async fn update_user(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Payload(payload): Payload<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !claims.can_act_for(id)? {
        return Err(AppError::Forbidden(
            "You are not allowed to modify this user".to_string(),
        ));
    }
    if payload.role.is_some() && !claims.is_admin() {
        return Err(AppError::Forbidden("Only admins can change roles".to_string()));
    }
    payload.validate()?;

    let password_hash = payload
        .password
        .as_deref()
        .map(hash_password)
        .transpose()?;

    let changes = UserChanges {
        username: payload.username.as_deref(),
        email: payload.email.as_deref(),
        password_hash: password_hash.as_deref(),
        role: payload.role.as_deref(),
    };

    let user = user_db::update_user(&pool, id, &changes)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Deletes a user account together with its blogs.
/// Requires: Login + (Self OR Admin).
pub async fn delete_user(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !claims.can_act_for(id)? {
        return Err(AppError::Forbidden(
            "You are not allowed to delete this user".to_string(),
        ));
    }

    if !user_db::delete_user(&pool, id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
