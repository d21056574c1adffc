mod adapters;
mod application;
mod domain;
mod services;

use std::{future::Future, sync::Arc};

use adapters::{routes::create_router, state::AppState};
use application::services::upload_service::UploadService;
use domain::config::app::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Initialize AWS SDK crypto provider (required for aws-sdk-s3)
    // This must be called before any AWS SDK operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        provider = %config.storage.provider,
        bucket = %config.storage.bucket_name,
        region = %config.storage.region,
        endpoint = config.storage.endpoint_url.as_deref().unwrap_or("aws"),
        max_size = config.policy.max_size,
        "Starting image-upload-service"
    );

    let stores = services::create_object_store(&config.storage).await;
    let upload_service = Arc::new(UploadService::new(&config, stores.store));
    let port = config.port;

    if let Some(base) = config.storage.public_base_url.as_deref() {
        tracing::info!("Serving stored objects at {}/{}", base, config.storage.bucket_name);
    }

    let app_state = AppState {
        config: Arc::new(config),
        upload_service,
        memory_store: stores.memory,
    };

    let router = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = first_signal(ctrl_c, terminate).await;
    tracing::info!("{:?} received, shutting down", signal);
}

#[derive(Debug, PartialEq, Eq)]
enum ShutdownSignal {
    CtrlC,
    Terminate,
}

async fn first_signal<C, T>(ctrl_c: C, terminate: T) -> ShutdownSignal
where
    C: Future<Output = ()>,
    T: Future<Output = ()>,
{
    tokio::select! {
        _ = ctrl_c => ShutdownSignal::CtrlC,
        _ = terminate => ShutdownSignal::Terminate,
    }
}
