use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::application::error::ApplicationError;

pub const META_ORIGINAL_FILE_NAME: &str = "original-file-name";
pub const META_UPLOAD_ID: &str = "upload-id";
pub const META_UPLOADED_AT: &str = "uploaded-at";

/// Traceability metadata attached to every stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub original_file_name: String,
    pub upload_id: Uuid,
    pub uploaded_at: DateTime<Utc>,
}

impl ObjectMetadata {
    /// Header-safe form: the file name is percent-encoded since object store
    /// metadata travels as ASCII headers.
    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                META_ORIGINAL_FILE_NAME.to_string(),
                urlencoding::encode(&self.original_file_name).into_owned(),
            ),
            (META_UPLOAD_ID.to_string(), self.upload_id.to_string()),
            (
                META_UPLOADED_AT.to_string(),
                self.uploaded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    pub container: String,
    pub key: String,
    pub content: Bytes,
    pub content_type: String,
    pub metadata: ObjectMetadata,
}

/// What the store reports back after a successful write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutConfirmation {
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
}

/// Outbound gateway to the object store.
///
/// One atomic write per call: either the full object exists under the key
/// afterwards or nothing does. Inputs are assumed to be validated already.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        request: PutObjectRequest,
    ) -> Result<PutConfirmation, ApplicationError>;

    fn provider(&self) -> &'static str;
}
