use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::{info, warn};

use crate::{
    adapters::dto::image_dto::{UploadImageResponse, UploadPolicyResponse},
    application::{error::ApplicationError, services::upload_service::UploadService},
    domain::models::upload::{sanitize_file_name, UploadRequest},
};

const OCTET_STREAM: &str = "application/octet-stream";

pub struct ImageController;

impl ImageController {
    /// POST /api/v1/images
    /// Multipart: `file` (required); `fileName` and `contentType` override the
    /// part headers when present.
    pub async fn upload_image(
        State(upload_service): State<Arc<UploadService>>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<(StatusCode, Json<UploadImageResponse>), ApplicationError> {
        let mut multipart = multipart.map_err(|e| {
            warn!("Rejected non-multipart upload: {}", e);
            ApplicationError::BadRequest("Expected a multipart/form-data body".to_string())
        })?;

        let mut file_bytes: Option<Bytes> = None;
        let mut part_file_name: Option<String> = None;
        let mut part_content_type: Option<String> = None;
        let mut file_name_override: Option<String> = None;
        let mut content_type_override: Option<String> = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "file" => {
                    if file_bytes.is_some() {
                        return Err(ApplicationError::BadRequest(
                            "Only one file may be uploaded per request".to_string(),
                        ));
                    }
                    part_file_name = field.file_name().map(str::to_string);
                    part_content_type = field.content_type().map(str::to_string);
                    file_bytes = Some(field.bytes().await.map_err(multipart_error)?);
                }
                "fileName" => {
                    file_name_override = Some(field.text().await.map_err(multipart_error)?);
                }
                "contentType" => {
                    content_type_override = Some(field.text().await.map_err(multipart_error)?);
                }
                _ => {}
            }
        }

        let file_bytes = file_bytes.ok_or_else(|| {
            ApplicationError::BadRequest("Missing required 'file' field".to_string())
        })?;

        let file_name = file_name_override
            .or(part_file_name)
            .as_deref()
            .and_then(sanitize_file_name)
            .ok_or_else(|| ApplicationError::BadRequest("Missing file name".to_string()))?;

        let content_type = content_type_override
            .or(part_content_type)
            .map(|ct| ct.trim().to_string())
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| OCTET_STREAM.to_string());

        info!(
            file_name = %file_name,
            content_type = %content_type,
            size_bytes = file_bytes.len(),
            "Image upload requested"
        );

        let result = upload_service
            .upload(UploadRequest::new(file_name, content_type, file_bytes))
            .await?;

        Ok((StatusCode::CREATED, Json(UploadImageResponse::from(result))))
    }

    /// GET /api/v1/images/policy
    /// Lets clients apply the same rules before uploading.
    pub async fn get_policy(
        State(upload_service): State<Arc<UploadService>>,
    ) -> Json<UploadPolicyResponse> {
        Json(UploadPolicyResponse::from(upload_service.policy()))
    }
}

fn multipart_error(e: MultipartError) -> ApplicationError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApplicationError::RequestTooLarge
    } else {
        warn!("Invalid multipart data: {}", e);
        ApplicationError::BadRequest("Invalid multipart request".to_string())
    }
}
