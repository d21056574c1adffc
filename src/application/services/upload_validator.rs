use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::{config::policy::UploadPolicy, models::upload::UploadRequest};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File is empty")]
    EmptyPayload,

    #[error("File size {size} bytes exceeds the maximum of {max_size} bytes")]
    PayloadTooLarge { size: u64, max_size: u64 },

    #[error("Content type '{received}' is not allowed (allowed: {allowed})")]
    UnsupportedContentType { received: String, allowed: String },

    #[error("File extension '{received}' is not allowed (allowed: {allowed})")]
    UnsupportedExtension { received: String, allowed: String },
}

impl ValidationError {
    /// Machine-readable kind reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::EmptyPayload => "EmptyPayload",
            ValidationError::PayloadTooLarge { .. } => "PayloadTooLarge",
            ValidationError::UnsupportedContentType { .. } => "UnsupportedContentType",
            ValidationError::UnsupportedExtension { .. } => "UnsupportedExtension",
        }
    }
}

/// Rejects non-conforming uploads before any storage I/O.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    policy: Arc<UploadPolicy>,
}

impl UploadValidator {
    pub fn new(policy: Arc<UploadPolicy>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Runs the checks in order (size floor, size ceiling, content type,
    /// extension) and stops at the first failure.
    pub fn validate(&self, request: &UploadRequest) -> Result<(), ValidationError> {
        if request.byte_length == 0 {
            return Err(ValidationError::EmptyPayload);
        }

        if request.byte_length > self.policy.max_size {
            return Err(ValidationError::PayloadTooLarge {
                size: request.byte_length,
                max_size: self.policy.max_size,
            });
        }

        if !self
            .policy
            .allows_content_type(&request.declared_content_type)
        {
            return Err(ValidationError::UnsupportedContentType {
                received: request.declared_content_type.clone(),
                allowed: self.policy.content_types_display(),
            });
        }

        let extension = request.extension();
        if !self.policy.allows_extension(&extension) {
            return Err(ValidationError::UnsupportedExtension {
                received: extension,
                allowed: self.policy.extensions_display(),
            });
        }

        debug!(
            file_name = %request.file_name,
            content_type = %request.declared_content_type,
            size_bytes = request.byte_length,
            "Upload passed validation"
        );

        Ok(())
    }
}
