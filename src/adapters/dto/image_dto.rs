use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{config::policy::UploadPolicy, models::upload::UploadResult};

#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub id: Uuid,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "sizeInBytes")]
    pub size_in_bytes: u64,
    #[serde(rename = "storageKey")]
    pub storage_key: String,
    #[serde(rename = "containerName")]
    pub container_name: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(rename = "publicUrl")]
    pub public_url: String,
}

impl From<UploadResult> for UploadImageResponse {
    fn from(result: UploadResult) -> Self {
        Self {
            id: result.id,
            file_name: result.file_name,
            content_type: result.content_type,
            size_in_bytes: result.size_in_bytes,
            storage_key: result.storage_key,
            container_name: result.container_name,
            uploaded_at: result.uploaded_at,
            public_url: result.public_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadPolicyResponse {
    #[serde(rename = "maxSize")]
    pub max_size: u64,
    #[serde(rename = "allowedContentTypes")]
    pub allowed_content_types: Vec<String>,
    #[serde(rename = "allowedExtensions")]
    pub allowed_extensions: Vec<String>,
}

impl From<&UploadPolicy> for UploadPolicyResponse {
    fn from(policy: &UploadPolicy) -> Self {
        Self {
            max_size: policy.max_size,
            allowed_content_types: policy.allowed_content_types.iter().cloned().collect(),
            allowed_extensions: policy.allowed_extensions.iter().cloned().collect(),
        }
    }
}
