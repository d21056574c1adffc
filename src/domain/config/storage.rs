use std::{fmt, str::FromStr};

use crate::domain::{
    config::error::ConfigError,
    models::public_url::UrlConvention,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    S3,
    Memory,
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(Provider::S3),
            "memory" => Ok(Provider::Memory),
            other => Err(ConfigError::Invalid {
                var: "STORAGE_PROVIDER",
                value: other.to_string(),
                reason: "expected 's3' or 'memory'".to_string(),
            }),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::S3 => write!(f, "s3"),
            Provider::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub provider: Provider,
    pub bucket_name: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack).
    pub endpoint_url: Option<String>,
    /// Address of this service, used for path-style URLs when the service
    /// itself serves the objects (memory provider).
    pub public_base_url: Option<String>,
}

impl StorageConfig {
    pub fn url_convention(&self) -> UrlConvention {
        match (self.provider, &self.public_base_url, &self.endpoint_url) {
            (Provider::Memory, Some(base), _) => UrlConvention::path_style(base),
            (_, _, Some(endpoint)) => UrlConvention::path_style(endpoint),
            _ => UrlConvention::virtual_hosted(&self.region),
        }
    }
}
