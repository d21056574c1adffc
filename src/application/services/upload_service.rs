use std::{fmt, sync::Arc, time::Instant};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::{
    application::{
        error::ApplicationError,
        services::{
            object_store::{ObjectMetadata, ObjectStore, PutObjectRequest},
            upload_validator::UploadValidator,
        },
    },
    domain::{
        config::{app::AppConfig, policy::UploadPolicy},
        models::{
            public_url::UrlConvention,
            storage_key::StorageKey,
            upload::{UploadRequest, UploadResult},
        },
    },
};

/// Lifecycle of a single upload. `Rejected` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Received,
    Validated,
    KeyAssigned,
    Stored,
    Completed,
    Rejected,
    Failed,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UploadStage::Received => "received",
            UploadStage::Validated => "validated",
            UploadStage::KeyAssigned => "key_assigned",
            UploadStage::Stored => "stored",
            UploadStage::Completed => "completed",
            UploadStage::Rejected => "rejected",
            UploadStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Validates, keys and stores one image per call.
///
/// Holds only read-only configuration, so a single instance serves concurrent
/// requests.
pub struct UploadService {
    validator: UploadValidator,
    store: Arc<dyn ObjectStore>,
    container_name: String,
    urls: UrlConvention,
}

impl UploadService {
    pub fn new(config: &AppConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            validator: UploadValidator::new(Arc::new(config.policy.clone())),
            store,
            container_name: config.storage.bucket_name.clone(),
            urls: config.storage.url_convention(),
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        self.validator.policy()
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    pub fn provider(&self) -> &'static str {
        self.store.provider()
    }

    pub async fn upload(&self, request: UploadRequest) -> Result<UploadResult, ApplicationError> {
        debug!(
            stage = %UploadStage::Received,
            file_name = %request.file_name,
            size_bytes = request.byte_length,
            "Upload received"
        );

        if let Err(e) = self.validator.validate(&request) {
            warn!(
                stage = %UploadStage::Rejected,
                file_name = %request.file_name,
                kind = e.kind(),
                "Upload rejected: {}",
                e
            );
            return Err(e.into());
        }
        debug!(
            stage = %UploadStage::Validated,
            file_name = %request.file_name,
            "Upload validated"
        );

        // The declared length must describe the bytes actually received.
        let received = request.received_length();
        if received != request.byte_length {
            error!(
                stage = %UploadStage::Failed,
                file_name = %request.file_name,
                declared_bytes = request.byte_length,
                received_bytes = received,
                "Byte length mismatch after transfer"
            );
            return Err(ApplicationError::InternalError(format!(
                "declared {} bytes but received {}",
                request.byte_length, received
            )));
        }

        let key = StorageKey::generate(&request.file_name);
        let upload_id = key.id();
        debug!(
            stage = %UploadStage::KeyAssigned,
            upload_id = %upload_id,
            key = %key,
            "Storage key assigned"
        );

        // The returned URL must lead back to the object about to be written.
        let public_url = self.urls.object_url(&self.container_name, key.as_str());
        let resolves = self
            .urls
            .parse(&public_url)
            .is_some_and(|(container, stored)| {
                container == self.container_name && stored == key.as_str()
            });
        if !resolves {
            error!(
                stage = %UploadStage::Failed,
                upload_id = %upload_id,
                key = %key,
                public_url = %public_url,
                "Public URL does not resolve to the storage key"
            );
            return Err(ApplicationError::InternalError(format!(
                "public URL {} does not resolve to {}",
                public_url, key
            )));
        }

        let uploaded_at = Utc::now();
        let start = Instant::now();

        let confirmation = self
            .store
            .put_object(PutObjectRequest {
                container: self.container_name.clone(),
                key: key.as_str().to_string(),
                content: request.content,
                content_type: request.declared_content_type.clone(),
                metadata: ObjectMetadata {
                    original_file_name: request.file_name.clone(),
                    upload_id,
                    uploaded_at,
                },
            })
            .await
            .map_err(|e| {
                error!(
                    stage = %UploadStage::Failed,
                    upload_id = %upload_id,
                    bucket = %self.container_name,
                    key = %key,
                    "Upload failed: {}",
                    e
                );
                e
            })?;

        debug!(
            stage = %UploadStage::Stored,
            upload_id = %upload_id,
            e_tag = confirmation.e_tag.as_deref().unwrap_or("-"),
            version_id = confirmation.version_id.as_deref().unwrap_or("-"),
            "Object stored"
        );

        info!(
            stage = %UploadStage::Completed,
            upload_id = %upload_id,
            bucket = %self.container_name,
            key = %key,
            size_bytes = received,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image uploaded"
        );

        Ok(UploadResult {
            id: upload_id,
            file_name: request.file_name,
            content_type: request.declared_content_type,
            size_in_bytes: received,
            storage_key: key.into_string(),
            container_name: self.container_name.clone(),
            uploaded_at,
            public_url,
        })
    }
}
