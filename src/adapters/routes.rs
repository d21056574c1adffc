use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::adapters::{
    controllers::{
        health_controller::HealthController, image_controller::ImageController,
        object_controller::ObjectController,
    },
    state::AppState,
};

/// Headroom for multipart framing on top of the largest accepted image.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

async fn banner() -> &'static str {
    "Image upload service"
}

pub fn create_router(app_state: AppState) -> Router {
    let body_limit = app_state
        .config
        .policy
        .max_size
        .saturating_add(MULTIPART_OVERHEAD);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    let cors = cors_layer(app_state.config.cors_allowed_origins.as_deref());

    let mut router = Router::new()
        .route("/", get(banner))
        .route("/api/v1/health", get(HealthController::health_check))
        .route("/api/v1/images", post(ImageController::upload_image))
        .route("/api/v1/images/policy", get(ImageController::get_policy));

    if app_state.memory_store.is_some() {
        router = router.route("/{bucket}/{*key}", get(ObjectController::get_object));
    }

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    match allowed_origins {
        Some(origins) => {
            // Origins were checked when the configuration was loaded.
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        // Development only
        None => CorsLayer::permissive(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        application::{
            error::ApplicationError,
            services::{
                object_store::{ObjectStore, PutConfirmation, PutObjectRequest},
                upload_service::UploadService,
            },
        },
        domain::config::{
            app::AppConfig,
            policy::UploadPolicy,
            storage::{Provider, StorageConfig},
        },
        services::{InMemoryObjectStore, StorageError},
    };

    const BOUNDARY: &str = "upload-test-boundary";

    struct UnreachableStore;

    #[async_trait]
    impl ObjectStore for UnreachableStore {
        async fn put_object(
            &self,
            _request: PutObjectRequest,
        ) -> Result<PutConfirmation, ApplicationError> {
            Err(StorageError::NetworkError("dispatch failure: connection refused".to_string()).into())
        }

        fn provider(&self) -> &'static str {
            "unreachable"
        }
    }

    fn config(max_size: u64) -> AppConfig {
        AppConfig {
            port: 8080,
            storage: StorageConfig {
                provider: Provider::S3,
                bucket_name: "demo-bucket".to_string(),
                region: "us-east-1".to_string(),
                endpoint_url: None,
                public_base_url: None,
            },
            policy: UploadPolicy {
                max_size,
                ..UploadPolicy::default()
            },
            cors_allowed_origins: None,
        }
    }

    fn memory_config(max_size: u64) -> AppConfig {
        let mut config = config(max_size);
        config.storage.provider = Provider::Memory;
        config.storage.public_base_url = Some("http://localhost:8080".to_string());
        config
    }

    fn app_with(config: AppConfig, store: Arc<dyn ObjectStore>) -> Router {
        let upload_service = Arc::new(UploadService::new(&config, store));
        create_router(AppState {
            config: Arc::new(config),
            upload_service,
            memory_store: None,
        })
    }

    fn memory_app(config: AppConfig) -> (Router, Arc<InMemoryObjectStore>) {
        let store = Arc::new(InMemoryObjectStore::new());
        let upload_service = Arc::new(UploadService::new(&config, store.clone()));
        let app = create_router(AppState {
            config: Arc::new(config),
            upload_service,
            memory_store: Some(store.clone()),
        });
        (app, store)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn file_part(file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut part = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        part.extend_from_slice(data);
        part.extend_from_slice(b"\r\n");
        part
    }

    fn text_part(name: &str, value: &str) -> Vec<u8> {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .into_bytes()
    }

    fn upload_request(parts: Vec<Vec<u8>>) -> Request<Body> {
        let mut body: Vec<u8> = parts.concat();
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/images")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upload_returns_created_descriptor() {
        let store = Arc::new(InMemoryObjectStore::new());
        let app = app_with(config(10 * 1024 * 1024), store.clone());

        let response = app
            .oneshot(upload_request(vec![file_part(
                "sunset.jpg",
                "image/jpeg",
                &[0xAB; 2048],
            )]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        let id = body["id"].as_str().unwrap().to_string();

        assert_eq!(body["fileName"], "sunset.jpg");
        assert_eq!(body["contentType"], "image/jpeg");
        assert_eq!(body["sizeInBytes"], 2048);
        assert_eq!(body["containerName"], "demo-bucket");
        assert_eq!(body["storageKey"], format!("images/{id}/sunset.jpg"));
        assert_eq!(
            body["publicUrl"],
            format!("https://demo-bucket.s3.us-east-1.amazonaws.com/images/{id}/sunset.jpg")
        );
        assert!(body["uploadedAt"].is_string());

        let stored = store
            .get("demo-bucket", &format!("images/{id}/sunset.jpg"))
            .unwrap();
        assert_eq!(stored.content.len(), 2048);
    }

    #[tokio::test]
    async fn form_fields_override_part_headers() {
        let store = Arc::new(InMemoryObjectStore::new());
        let app = app_with(config(1024), store.clone());

        let response = app
            .oneshot(upload_request(vec![
                file_part("blob", "application/octet-stream", b"GIF89a"),
                text_part("fileName", "C:\\fakepath\\party.gif"),
                text_part("contentType", "image/gif"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["fileName"], "party.gif");
        assert_eq!(body["contentType"], "image/gif");
        assert_eq!(store.put_count(), 1);
    }

    #[tokio::test]
    async fn unsupported_content_type_is_a_client_error() {
        let store = Arc::new(InMemoryObjectStore::new());
        let app = app_with(config(1024), store.clone());

        let response = app
            .oneshot(upload_request(vec![file_part(
                "report.png",
                "application/pdf",
                b"%PDF-1.7",
            )]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "UnsupportedContentType");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("application/pdf"));
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let store = Arc::new(InMemoryObjectStore::new());
        let app = app_with(config(1024), store.clone());

        let response = app
            .oneshot(upload_request(vec![file_part("cat.png", "image/png", b"")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "EmptyPayload");
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_by_the_validator() {
        let store = Arc::new(InMemoryObjectStore::new());
        let app = app_with(config(1024), store.clone());

        let response = app
            .oneshot(upload_request(vec![file_part(
                "big.png",
                "image/png",
                &[0u8; 1025],
            )]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = json_body(response).await;
        assert_eq!(body["error"], "PayloadTooLarge");
        assert!(body["message"].as_str().unwrap().contains("1025"));
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn body_over_transport_limit_is_rejected() {
        let store = Arc::new(InMemoryObjectStore::new());
        let app = app_with(config(16), store.clone());

        let data = vec![0u8; 2 * 1024 * 1024];
        let response = app
            .oneshot(upload_request(vec![file_part("huge.png", "image/png", &data)]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json_body(response).await["error"], "PayloadTooLarge");
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn missing_file_field_is_a_bad_request() {
        let app = app_with(config(1024), Arc::new(InMemoryObjectStore::new()));

        let response = app
            .oneshot(upload_request(vec![text_part("fileName", "cat.png")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "BadRequest");
    }

    #[tokio::test]
    async fn non_multipart_body_is_a_bad_request() {
        let app = app_with(config(1024), Arc::new(InMemoryObjectStore::new()));

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/images")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "BadRequest");
    }

    #[tokio::test]
    async fn storage_failure_is_opaque_and_distinct_from_validation() {
        let app = app_with(config(1024), Arc::new(UnreachableStore));

        let response = app
            .oneshot(upload_request(vec![file_part("cat.png", "image/png", b"png")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["error"], "StorageUnavailable");
        assert!(!body["message"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }

    #[tokio::test]
    async fn memory_mode_serves_uploaded_bytes_at_public_url() {
        let (app, _store) = memory_app(memory_config(10 * 1024 * 1024));
        let data: Vec<u8> = (0..=255u8).cycle().take(2048).collect();

        let response = app
            .clone()
            .oneshot(upload_request(vec![file_part(
                "my sunset.jpg",
                "image/jpeg",
                &data,
            )]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        let id = body["id"].as_str().unwrap().to_string();

        let public_url = body["publicUrl"].as_str().unwrap();
        assert_eq!(
            public_url,
            format!("http://localhost:8080/demo-bucket/images/{id}/my%20sunset.jpg")
        );

        let path = public_url.strip_prefix("http://localhost:8080").unwrap();
        let response = app.oneshot(get_request(path)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        assert_eq!(response.headers()["x-amz-meta-upload-id"], id.as_str());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], &data[..]);
    }

    #[tokio::test]
    async fn unknown_object_is_not_found() {
        let (app, _store) = memory_app(memory_config(1024));

        let response = app
            .clone()
            .oneshot(get_request(
                "/demo-bucket/images/8d3c6a2e-5a3b-4c1e-9f0a-1b2c3d4e5f60/cat.png",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "NotFound");

        let response = app
            .oneshot(get_request("/demo-bucket/not-an-image-key"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn object_route_is_absent_for_s3() {
        let app = app_with(config(1024), Arc::new(InMemoryObjectStore::new()));

        let response = app
            .oneshot(get_request(
                "/demo-bucket/images/8d3c6a2e-5a3b-4c1e-9f0a-1b2c3d4e5f60/cat.png",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn policy_endpoint_reports_allow_lists() {
        let app = app_with(config(4096), Arc::new(InMemoryObjectStore::new()));

        let request = Request::builder()
            .uri("/api/v1/images/policy")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["maxSize"], 4096);
        assert_eq!(
            body["allowedExtensions"],
            serde_json::json!([".gif", ".jpeg", ".jpg", ".png", ".webp"])
        );
        assert_eq!(body["allowedContentTypes"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn health_reports_container_and_provider() {
        let app = app_with(config(1024), Arc::new(InMemoryObjectStore::new()));

        let request = Request::builder()
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["provider"], "memory");
        assert_eq!(body["containerName"], "demo-bucket");
        assert_eq!(body["policy"]["maxSize"], 1024);
    }
}
