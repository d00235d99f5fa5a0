use anyhow::{bail, Context, Result};

use crate::portfolio::image::DEFAULT_MAX_IMAGE_BYTES;

/// Where workspace drafts live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftBackend {
    Redis,
    /// In-process only; drafts and snapshots are lost on restart.
    Memory,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
    pub draft_backend: DraftBackend,
    pub draft_key_prefix: String,
    pub preview_debounce_ms: u64,
    pub max_image_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let draft_backend = match optional_env("DRAFT_BACKEND", "redis").as_str() {
            "redis" => DraftBackend::Redis,
            "memory" => DraftBackend::Memory,
            other => bail!("DRAFT_BACKEND must be 'redis' or 'memory', got '{other}'"),
        };

        // Infrastructure URLs are only mandatory when the redis backend is in use.
        let infra = |key: &str| -> Result<String> {
            match draft_backend {
                DraftBackend::Redis => require_env(key),
                DraftBackend::Memory => Ok(std::env::var(key).unwrap_or_default()),
            }
        };

        Ok(Config {
            database_url: infra("DATABASE_URL")?,
            redis_url: infra("REDIS_URL")?,
            s3_bucket: infra("S3_BUCKET")?,
            s3_endpoint: infra("S3_ENDPOINT")?,
            aws_access_key_id: infra("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: infra("AWS_SECRET_ACCESS_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG", "info"),
            draft_backend,
            draft_key_prefix: optional_env("DRAFT_KEY_PREFIX", "portfolio"),
            preview_debounce_ms: parse_env("PREVIEW_DEBOUNCE_MS", 250)?,
            max_image_bytes: parse_env("MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .ok()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_missing_returns_default() {
        let v: u64 = parse_env("__FOLIO_TEST_MISSING__", 42).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn test_parse_env_invalid_is_error() {
        std::env::set_var("__FOLIO_TEST_BAD_PORT__", "eighty");
        let r: Result<u16> = parse_env("__FOLIO_TEST_BAD_PORT__", 8080);
        assert!(r.is_err());
        std::env::remove_var("__FOLIO_TEST_BAD_PORT__");
    }

    #[test]
    fn test_parse_env_valid() {
        std::env::set_var("__FOLIO_TEST_DEBOUNCE__", "300");
        let v: u64 = parse_env("__FOLIO_TEST_DEBOUNCE__", 250).unwrap();
        assert_eq!(v, 300);
        std::env::remove_var("__FOLIO_TEST_DEBOUNCE__");
    }
}
