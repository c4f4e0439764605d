// src/extract.rs

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::{HeaderMap, header},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Request body decoded according to its `Content-Type`.
///
/// * `application/json` and `*+json` are parsed as JSON.
/// * `application/x-www-form-urlencoded` is decoded into flat string fields.
/// * Anything else (or no body at all) is treated as an empty object.
///
/// Every decoding failure is a `400`, never a server error.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    pub fn of(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        else {
            return BodyKind::Other;
        };

        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        let is_json = essence == "application/json"
            || (essence.starts_with("application/") && essence.ends_with("+json"));

        if is_json {
            BodyKind::Json
        } else if essence == "application/x-www-form-urlencoded" {
            BodyKind::Form
        } else {
            BodyKind::Other
        }
    }
}

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = BodyKind::of(req.headers());
        match kind {
            BodyKind::Json => {
                let Json(value) = Json::<T>::from_request(req, state).await?;
                Ok(Payload(value))
            }
            BodyKind::Form => {
                let Form(value) = Form::<T>::from_request(req, state).await?;
                Ok(Payload(value))
            }
            BodyKind::Other => {
                let value = serde_json::from_value(Value::Object(Map::new()))?;
                Ok(Payload(value))
            }
        }
    }
}
