use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::application::{error::ApplicationError, services::upload_validator::ValidationError};

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApplicationError::Validation(ref e) => {
                warn!(kind = e.kind(), "Validation failed: {}", e);
                let status = match e {
                    ValidationError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, e.kind(), e.to_string())
            }
            ApplicationError::BadRequest(ref msg) => {
                warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BadRequest", msg.clone())
            }
            ApplicationError::RequestTooLarge => {
                warn!("Request body exceeded the transport limit");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "PayloadTooLarge",
                    "File too large".to_string(),
                )
            }
            ApplicationError::NotFound(ref msg) => {
                warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NotFound", msg.clone())
            }
            ApplicationError::StorageUnavailable(ref msg) => {
                error!("Storage unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "StorageUnavailable",
                    "The image could not be stored, please retry later".to_string(),
                )
            }
            ApplicationError::InternalError(ref msg) => {
                error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": kind,
            "message": message,
        }));

        (status, body).into_response()
    }
}
