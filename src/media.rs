// src/media.rs

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{config::MediaConfig, error::AppError};

/// An image stored by the media provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedImage {
    /// HTTPS delivery URL.
    pub url: String,
    pub public_id: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
    pub bytes: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ProviderUpload {
    secure_url: String,
    public_id: String,
    width: Option<u32>,
    height: Option<u32>,
    format: Option<String>,
    bytes: Option<u64>,
}

impl From<ProviderUpload> for UploadedImage {
    fn from(upload: ProviderUpload) -> Self {
        Self {
            url: upload.secure_url,
            public_id: upload.public_id,
            width: upload.width,
            height: upload.height,
            format: upload.format,
            bytes: upload.bytes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorMessage {
    message: String,
}

/// Client for signed uploads to the hosted media provider (Cloudinary upload API).
///
/// Cheap to clone; the inner HTTP client shares its connection pool.
#[derive(Debug, Clone)]
pub struct MediaClient {
    http: reqwest::Client,
    config: MediaConfig,
}

impl MediaClient {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Uploads one image and returns where the provider stored it.
    ///
    /// Provider rejections and transport failures surface as `BadGateway`.
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: String,
        content_type: &str,
    ) -> Result<UploadedImage, AppError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut signed: Vec<(&str, &str)> = vec![("timestamp", timestamp.as_str())];
        if let Some(folder) = &self.config.folder {
            signed.push(("folder", folder.as_str()));
        }
        let signature = sign_params(&signed, &self.config.api_secret);

        let file = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(|_| AppError::BadRequest(format!("Invalid content type: {}", content_type)))?;

        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        if let Some(folder) = &self.config.folder {
            form = form.text("folder", folder.clone());
        }

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let upload: ProviderUpload = response.json().await?;
            tracing::info!(public_id = %upload.public_id, "Image uploaded");
            return Ok(upload.into());
        }

        let message = match response.json::<ProviderError>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("media provider responded with {}", status),
        };
        Err(AppError::BadGateway(message))
    }
}

/// Signs request parameters the way the provider expects: parameters sorted
/// by name, joined as `k=v&k=v`, the API secret appended, then SHA-256 hex.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let digest = Sha256::digest(format!("{}{}", joined, api_secret).as_bytes());
    format!("{:x}", digest)
}
