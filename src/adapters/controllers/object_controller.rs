use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use tracing::debug;

use crate::{
    application::error::ApplicationError, domain::models::storage_key::StorageKey,
    services::InMemoryObjectStore,
};

pub struct ObjectController;

impl ObjectController {
    /// GET /{bucket}/{*key}
    /// Serves objects kept by the in-memory store, so the path-style public
    /// URLs returned in memory mode resolve.
    pub async fn get_object(
        State(store): State<Option<Arc<InMemoryObjectStore>>>,
        Path((bucket, key)): Path<(String, String)>,
    ) -> Result<Response, ApplicationError> {
        let not_found = || ApplicationError::NotFound(format!("No object {}/{}", bucket, key));

        let storage_key = StorageKey::parse(&key).ok_or_else(not_found)?;
        let object = store
            .as_ref()
            .and_then(|store| store.get(&bucket, storage_key.as_str()))
            .ok_or_else(not_found)?;

        debug!(
            upload_id = %storage_key.id(),
            bucket = %bucket,
            key = %storage_key,
            size_bytes = object.content.len(),
            "Serving stored object"
        );

        let mut response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, object.content_type)
            .header(header::CONTENT_LENGTH, object.content.len())
            .header(header::ETAG, object.e_tag)
            .header(
                header::CONTENT_DISPOSITION,
                format!(
                    "inline; filename*=UTF-8''{}",
                    urlencoding::encode(storage_key.file_name())
                ),
            );
        for (name, value) in object.metadata.to_map() {
            response = response.header(format!("x-amz-meta-{}", name), value);
        }

        response
            .body(Body::from(object.content))
            .map_err(|e| ApplicationError::InternalError(e.to_string()))
    }
}
