use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::{
        error::ApplicationError,
        services::object_store::{ObjectMetadata, ObjectStore, PutConfirmation, PutObjectRequest},
    },
    services::StorageError,
};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content: Bytes,
    pub content_type: String,
    pub metadata: ObjectMetadata,
    pub e_tag: String,
}

/// Keeps objects in process memory, keyed by `(container, key)`.
///
/// Used for local development without cloud credentials and in tests. Objects
/// are served back by `GET /{bucket}/{*key}`.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    puts: AtomicUsize,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, container: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .ok()?
            .get(&(container.to_string(), key.to_string()))
            .cloned()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `put_object` calls received, successful or not.
    #[cfg(test)]
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(
        &self,
        request: PutObjectRequest,
    ) -> Result<PutConfirmation, ApplicationError> {
        self.puts.fetch_add(1, Ordering::SeqCst);

        let e_tag = format!("\"{}\"", Uuid::new_v4().simple());
        let size = request.content.len();

        let mut objects = self
            .objects
            .lock()
            .map_err(|e| StorageError::InternalError(e.to_string()))?;
        objects.insert(
            (request.container.clone(), request.key.clone()),
            StoredObject {
                content: request.content,
                content_type: request.content_type,
                metadata: request.metadata,
                e_tag: e_tag.clone(),
            },
        );
        drop(objects);

        info!(
            bucket = %request.container,
            key = %request.key,
            size_bytes = size,
            "In-memory upload successful"
        );

        Ok(PutConfirmation {
            e_tag: Some(e_tag),
            version_id: None,
        })
    }

    fn provider(&self) -> &'static str {
        "memory"
    }
}
