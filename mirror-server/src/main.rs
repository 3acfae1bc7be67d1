//! Mirror Server - REST API for the dataset replication registry
//!
//! A city uploads datasets; contributors register re-hosted copies.
//! At five verified hosts the authoritative copy is retired and
//! downloads redirect to a mirror.

use std::sync::Arc;

use mirror_core::{FsBlobStore, Registry};
use mirror_server::{create_router_with_state, AppState, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let registry = match &config.data_dir {
        Some(dir) => {
            let datasets_dir = dir.join("datasets");
            tracing::info!(path = %datasets_dir.display(), "Using filesystem blob storage");
            let blobs = FsBlobStore::new(&datasets_dir)
                .expect("Failed to initialize dataset blob directory");
            Registry::new(Arc::new(blobs))
        }
        None => {
            tracing::warn!("DATA_DIR not set, dataset bytes will be kept in memory");
            Registry::in_memory()
        }
    };

    let app = create_router_with_state(
        &config,
        AppState::new(Arc::new(registry), config.max_file_size_bytes()),
    );

    let addr = config.socket_addr();
    tracing::info!(%addr, "Dataset replication registry listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app).await.expect("Server error");
}
