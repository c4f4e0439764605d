// src/handlers/root.rs

use axum::{Json, response::IntoResponse};
use serde_json::Value;

use crate::extract::Payload;

/// Plaintext acknowledgment served at `GET /`.
pub const ROOT_MESSAGE: &str = "Express: backend";

pub async fn index() -> &'static str {
    ROOT_MESSAGE
}

/// Echoes the parsed request body back as JSON and logs it.
pub async fn echo(Payload(body): Payload<Value>) -> impl IntoResponse {
    let pretty = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
    tracing::info!("{}", pretty);

    Json(body)
}
