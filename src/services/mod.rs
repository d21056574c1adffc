mod error;
mod memory_storage;
mod s3_storage;

pub use error::StorageError;
pub use memory_storage::InMemoryObjectStore;
pub use s3_storage::S3ObjectStore;

use std::sync::Arc;

use crate::{
    application::services::object_store::ObjectStore,
    domain::config::storage::{Provider, StorageConfig},
};

pub struct ObjectStoreHandle {
    pub store: Arc<dyn ObjectStore>,
    /// Set when objects live in this process and can be served back over HTTP.
    pub memory: Option<Arc<InMemoryObjectStore>>,
}

pub async fn create_object_store(config: &StorageConfig) -> ObjectStoreHandle {
    match config.provider {
        Provider::S3 => ObjectStoreHandle {
            store: Arc::new(S3ObjectStore::new(config).await),
            memory: None,
        },
        Provider::Memory => {
            let memory = Arc::new(InMemoryObjectStore::new());
            ObjectStoreHandle {
                store: memory.clone(),
                memory: Some(memory),
            }
        }
    }
}
