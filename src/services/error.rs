use aws_sdk_s3::{
    config::http::HttpResponse,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::put_object::PutObjectError,
};
use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Storage provider error: {0}")]
    ProviderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        ApplicationError::StorageUnavailable(error.to_string())
    }
}

impl From<SdkError<PutObjectError, HttpResponse>> for StorageError {
    fn from(error: SdkError<PutObjectError, HttpResponse>) -> Self {
        let message = DisplayErrorContext(&error).to_string();
        match &error {
            SdkError::TimeoutError(_) => {
                StorageError::NetworkError(format!("Request timeout: {}", message))
            }
            SdkError::DispatchFailure(_) => {
                StorageError::NetworkError(format!("Connection failed: {}", message))
            }
            SdkError::ServiceError(_) => {
                let status = error.raw_response().map(|r| r.status().as_u16());
                match (error.code(), status) {
                    (Some("NoSuchBucket"), _) | (_, Some(404)) => {
                        StorageError::BucketNotFound(message)
                    }
                    (
                        Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch"),
                        _,
                    )
                    | (_, Some(401 | 403)) => StorageError::Unauthorized(message),
                    _ => StorageError::ProviderError(message),
                }
            }
            _ => StorageError::InternalError(message),
        }
    }
}
