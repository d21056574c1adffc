use axum::http::HeaderValue;

use crate::domain::config::{
    error::ConfigError,
    policy::{UploadPolicy, DEFAULT_CONTENT_TYPES, DEFAULT_EXTENSIONS, DEFAULT_MAX_SIZE},
    storage::{Provider, StorageConfig},
};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_MEMORY_BUCKET: &str = "demo-bucket";

/// Process-wide settings, read once at start-up and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub storage: StorageConfig,
    pub policy: UploadPolicy,
    /// `None` means permissive CORS (development only).
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                value,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let provider = match get("STORAGE_PROVIDER") {
            Some(value) => value.parse::<Provider>()?,
            None => Provider::S3,
        };

        let bucket_name = match (get("AWS_S3_BUCKET_NAME"), provider) {
            (Some(name), _) => name,
            (None, Provider::Memory) => DEFAULT_MEMORY_BUCKET.to_string(),
            (None, Provider::S3) => return Err(ConfigError::Missing("AWS_S3_BUCKET_NAME")),
        };

        // Only the memory provider serves objects from this process.
        let public_base_url = match provider {
            Provider::Memory => Some(
                get("PUBLIC_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| format!("http://localhost:{}", port)),
            ),
            Provider::S3 => None,
        };

        let storage = StorageConfig {
            provider,
            bucket_name,
            region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint_url: get("AWS_S3_ENDPOINT_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            public_base_url,
        };

        let max_size = match get("UPLOAD_MAX_SIZE_BYTES") {
            Some(value) => match value.parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        var: "UPLOAD_MAX_SIZE_BYTES",
                        value,
                        reason: "must be greater than zero".to_string(),
                    })
                }
                Ok(size) => size,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "UPLOAD_MAX_SIZE_BYTES",
                        value,
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_MAX_SIZE,
        };

        let content_types = get("UPLOAD_ALLOWED_CONTENT_TYPES")
            .map(|v| split_list(&v))
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPES.iter().map(|s| s.to_string()).collect());
        let extensions = get("UPLOAD_ALLOWED_EXTENSIONS")
            .map(|v| split_list(&v))
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect());

        let policy = UploadPolicy::new(max_size, content_types, extensions);
        if policy.allowed_content_types.is_empty() {
            return Err(ConfigError::Invalid {
                var: "UPLOAD_ALLOWED_CONTENT_TYPES",
                value: String::new(),
                reason: "at least one content type is required".to_string(),
            });
        }
        if policy.allowed_extensions.is_empty() {
            return Err(ConfigError::Invalid {
                var: "UPLOAD_ALLOWED_EXTENSIONS",
                value: String::new(),
                reason: "at least one extension is required".to_string(),
            });
        }

        let cors_allowed_origins = match get("CORS_ALLOWED_ORIGINS") {
            Some(value) => {
                let origins = split_list(&value);
                if let Some(bad) = origins.iter().find(|o| HeaderValue::from_str(o).is_err()) {
                    return Err(ConfigError::Invalid {
                        var: "CORS_ALLOWED_ORIGINS",
                        value: bad.clone(),
                        reason: "not a valid origin header value".to_string(),
                    });
                }
                Some(origins)
            }
            None => None,
        };

        Ok(Self {
            port,
            storage,
            policy,
            cors_allowed_origins,
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
