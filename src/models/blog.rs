// src/models/blog.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use validator::Validate;

/// A row of the 'blogs' table joined with its author's username.
/// Soft-deleted rows are never loaded into this type.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    pub user_id: i64,

    /// Username of the author (joined from 'users').
    pub author: String,

    pub title: String,

    /// Sanitized HTML body.
    pub content: String,

    /// Cover image hosted by the media provider.
    pub image_url: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new blog post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlogRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title length must be between 1 and 200 chars"
    ))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 20000,
        message = "Content length must be between 1 and 20000 chars"
    ))]
    pub content: String,

    #[validate(length(max = 500), custom(function = validate_url_string))]
    pub image_url: Option<String>,
}

/// DTO for updating a blog post. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBlogRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 20000))]
    pub content: Option<String>,

    #[validate(length(max = 500), custom(function = validate_url_string))]
    pub image_url: Option<String>,
}

/// Query parameters for listing blogs.
#[derive(Debug, Default, Deserialize)]
pub struct BlogListParams {
    /// Cursor for pagination: the created_at timestamp of the last blog in the previous page.
    pub cursor: Option<chrono::DateTime<chrono::Utc>>,

    /// Id of the last blog in the previous page; breaks ties between blogs
    /// sharing the `cursor` timestamp. Ignored without `cursor`.
    pub cursor_id: Option<i64>,

    /// Number of items to return (default: 20, max: 100).
    pub limit: Option<i64>,

    /// Only return blogs written by this user.
    pub author: Option<i64>,
}

impl BlogListParams {
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

/// Validates that a string is an absolute http(s) URL.
fn validate_url_string(url: &str) -> Result<(), validator::ValidationError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_url")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_must_be_http() {
        let mut req = CreateBlogRequest {
            title: "Hello".to_string(),
            content: "<p>Body</p>".to_string(),
            image_url: Some("javascript:alert(1)".to_string()),
        };
        assert!(req.validate().is_err());

        req.image_url = Some("https://res.cloudinary.com/demo/image/upload/x.png".to_string());
        assert!(req.validate().is_ok());

        req.image_url = None;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let req = CreateBlogRequest {
            title: String::new(),
            content: "body".to_string(),
            image_url: None,
        };
        assert!(req.validate().unwrap_err().field_errors().contains_key("title"));
    }

    #[test]
    fn list_limit_is_clamped() {
        assert_eq!(BlogListParams::default().effective_limit(), 20);
        let params = BlogListParams {
            limit: Some(1000),
            ..Default::default()
        };
        assert_eq!(params.effective_limit(), 100);
        let params = BlogListParams {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(params.effective_limit(), 1);
    }
}
