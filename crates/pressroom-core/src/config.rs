//! Configuration module
//!
//! Env-driven configuration for the database, object storage, and the
//! identity provider. Loaded once at process start (the CLI calls
//! `PressroomConfig::from_env` after `dotenvy`).

use std::env;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_LOCAL_STORAGE_PATH: &str = "./storage";
const DEFAULT_LOCAL_STORAGE_BASE_URL: &str = "http://localhost:3000/storage";

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Which asset store backend to construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackendKind {
    Local,
    S3,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL is not set".to_string())?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        Ok(Self {
            url,
            max_connections,
        })
    }
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackendKind,
    pub bucket: String,
    // Local backend
    pub local_path: String,
    pub local_base_url: String,
    // S3-compatible backend
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_public_base_url: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let backend = match env_or("STORAGE_BACKEND", "local").to_lowercase().as_str() {
            "local" => StorageBackendKind::Local,
            "s3" => StorageBackendKind::S3,
            other => return Err(format!("Unknown STORAGE_BACKEND: {}", other)),
        };
        Ok(Self {
            backend,
            bucket: env_or("STORAGE_BUCKET", crate::constants::ARTICLE_IMAGES_BUCKET),
            local_path: env_or("LOCAL_STORAGE_PATH", DEFAULT_LOCAL_STORAGE_PATH),
            local_base_url: env_or("LOCAL_STORAGE_BASE_URL", DEFAULT_LOCAL_STORAGE_BASE_URL),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            s3_public_base_url: env::var("S3_PUBLIC_BASE_URL").ok(),
        })
    }
}

/// Identity provider endpoints and keys.
///
/// `anon_key` scopes the caller's own context; `service_role_key` scopes the
/// elevated fallback context. Both are bearer credentials issued out of band.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub auth_url: String,
    pub anon_key: String,
    pub service_role_key: Option<String>,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, String> {
        let auth_url = env::var("AUTH_URL").map_err(|_| "AUTH_URL is not set".to_string())?;
        let anon_key = env::var("AUTH_ANON_KEY").map_err(|_| "AUTH_ANON_KEY is not set".to_string())?;
        Ok(Self {
            auth_url,
            anon_key,
            service_role_key: env::var("AUTH_SERVICE_ROLE_KEY").ok(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct PressroomConfig {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

impl PressroomConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            auth: AuthConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults_to_local() {
        // Uses defaults when nothing is set; bucket falls back to the
        // article-images bucket.
        std::env::remove_var("STORAGE_BACKEND");
        std::env::remove_var("STORAGE_BUCKET");
        let config = StorageConfig::from_env().unwrap();
        assert_eq!(config.backend, StorageBackendKind::Local);
        assert_eq!(config.bucket, "article-images");
    }
}
