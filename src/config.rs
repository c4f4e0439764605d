// src/config.rs

use std::{env, fmt};

use axum::http::HeaderValue;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_MEDIA_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Errors raised while reading configuration at startup.
#[derive(Debug)]
pub enum ConfigError {
    /// A required variable is not set.
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Credentials and endpoint for the hosted media provider.
/// Values are passed through to the provider as-is.
#[derive(Debug, Clone, Default)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
    pub folder: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub log_dir: String,
    /// The single origin allowed to make credentialed cross-origin calls.
    pub cors_origin: HeaderValue,
    pub media: MediaConfig,
    pub upload_limit_bytes: usize,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    /// Reads configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let jwt_expiration = parse_or(&lookup, "JWT_EXPIRATION", 86_400)?;

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let log_dir = lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string());

        let origin = lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin = HeaderValue::from_str(&origin).map_err(|_| ConfigError::Invalid {
            key: "CORS_ORIGIN",
            value: origin.clone(),
        })?;

        let media = MediaConfig {
            cloud_name: lookup("CLOUD_NAME").unwrap_or_default(),
            api_key: lookup("API_KEY").unwrap_or_default(),
            api_secret: lookup("API_SECRET").unwrap_or_default(),
            api_base: lookup("CLOUDINARY_API_BASE")
                .unwrap_or_else(|| DEFAULT_MEDIA_API_BASE.to_string()),
            folder: lookup("CLOUDINARY_FOLDER").filter(|f| !f.is_empty()),
        };

        let upload_limit_bytes = parse_or(&lookup, "UPLOAD_LIMIT_BYTES", 10 * 1024 * 1024)?;

        Ok(Self {
            port,
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            log_dir,
            cors_origin,
            media,
            upload_limit_bytes,
            admin_username: lookup("ADMIN_USERNAME"),
            admin_password: lookup("ADMIN_PASSWORD"),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/blog"),
        ("JWT_SECRET", "secret"),
    ];

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert_eq!(config.jwt_expiration, 86_400);
        assert_eq!(config.media.api_base, DEFAULT_MEDIA_API_BASE);
        assert!(config.media.cloud_name.is_empty());
        assert!(config.media.folder.is_none());
        assert!(config.admin_username.is_none());
    }

    #[test]
    fn port_and_media_credentials_are_read() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "8080"),
            ("CLOUD_NAME", "demo"),
            ("API_KEY", "key"),
            ("API_SECRET", "shh"),
            ("CORS_ORIGIN", "https://blog.example.com"),
        ]);
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.media.cloud_name, "demo");
        assert_eq!(config.media.api_key, "key");
        assert_eq!(config.media.api_secret, "shh");
        assert_eq!(config.cors_origin, "https://blog.example.com");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "not-a-port"));

        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn missing_database_url_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("JWT_SECRET", "secret")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }
}
