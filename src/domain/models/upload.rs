use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::config::policy::file_extension;

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub declared_content_type: String,
    pub byte_length: u64,
    pub content: Bytes,
}

impl UploadRequest {
    /// `byte_length` is taken from the received content.
    pub fn new(
        file_name: impl Into<String>,
        declared_content_type: impl Into<String>,
        content: Bytes,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            declared_content_type: declared_content_type.into(),
            byte_length: content.len() as u64,
            content,
        }
    }

    pub fn with_declared_length(mut self, byte_length: u64) -> Self {
        self.byte_length = byte_length;
        self
    }

    pub fn extension(&self) -> String {
        file_extension(&self.file_name)
    }

    pub fn received_length(&self) -> u64 {
        self.content.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size_in_bytes: u64,
    pub storage_key: String,
    pub container_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub public_url: String,
}

/// Strips any client-side directory part (`C:\fakepath\cat.png`, `../cat.png`).
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(char::is_control);

    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}
