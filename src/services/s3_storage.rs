use std::time::Instant;

use async_trait::async_trait;
use aws_config::{meta::region::RegionProviderChain, retry::RetryConfig, BehaviorVersion, Region};
use aws_sdk_s3::{primitives::ByteStream, Client};
use tracing::{error, info};

use crate::{
    application::{
        error::ApplicationError,
        services::object_store::{ObjectStore, PutConfirmation, PutObjectRequest},
    },
    domain::config::storage::StorageConfig,
    services::StorageError,
};

/// Object store gateway backed by AWS S3 or an S3-compatible endpoint.
///
/// Credentials come from the default AWS provider chain (environment,
/// profile, container or instance role).
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub async fn new(config: &StorageConfig) -> Self {
        let region_provider = RegionProviderChain::first_try(Region::new(config.region.clone()));

        // Retries stay inside the SDK client; the gateway itself never retries.
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(RetryConfig::standard())
            .load()
            .await;

        let client = match config.endpoint_url {
            Some(ref endpoint) => {
                // S3-compatible stores (MinIO, LocalStack) need path-style addressing.
                let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                    .endpoint_url(endpoint)
                    .force_path_style(true)
                    .build();
                Client::from_conf(s3_config)
            }
            None => Client::new(&sdk_config),
        };

        Self::from_client(client)
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        request: PutObjectRequest,
    ) -> Result<PutConfirmation, ApplicationError> {
        let size = request.content.len();
        let start = Instant::now();

        let size_header = i64::try_from(size)
            .map_err(|e| StorageError::InternalError(format!("Object too large: {}", e)))?;

        let response = self
            .client
            .put_object()
            .bucket(&request.container)
            .key(&request.key)
            .body(ByteStream::from(request.content))
            .content_length(size_header)
            .content_type(&request.content_type)
            .set_metadata(Some(request.metadata.to_map()))
            .send()
            .await
            .map_err(|e| {
                let e = StorageError::from(e);
                error!(
                    error = %e,
                    bucket = %request.container,
                    key = %request.key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                e
            })?;

        info!(
            bucket = %request.container,
            key = %request.key,
            size_bytes = size,
            e_tag = response.e_tag().unwrap_or("-"),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(PutConfirmation {
            e_tag: response.e_tag().map(str::to_string),
            version_id: response.version_id().map(str::to_string),
        })
    }

    fn provider(&self) -> &'static str {
        "s3"
    }
}
