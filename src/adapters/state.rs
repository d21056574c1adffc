use axum::extract::FromRef;
use std::sync::Arc;

use crate::{
    application::services::upload_service::UploadService, domain::config::app::AppConfig,
    services::InMemoryObjectStore,
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub upload_service: Arc<UploadService>,
    pub memory_store: Option<Arc<InMemoryObjectStore>>,
}
