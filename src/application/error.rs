use thiserror::Error;

use crate::application::services::upload_validator::ValidationError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the transport limit before it could be validated.
    #[error("Request body too large")]
    RequestTooLarge,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
