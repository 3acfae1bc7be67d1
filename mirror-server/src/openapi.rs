//! OpenAPI documentation configuration
//!
//! Generates the OpenAPI 3.0 specification for the registry API.

use utoipa::OpenApi;

use crate::handlers::{
    ContributeRequest, ContributeResponse, DatasetResponse, DeleteResponse, HealthResponse,
    ReadyResponse, UpdateDatasetRequest,
};

/// Dataset Replication Registry - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dataset Replication Registry",
        version = "0.1.0",
        description = r#"
## Community-Mirrored Open Data

A city publishes a dataset once; independent contributors volunteer to
re-host copies of it. Once **five distinct verified hosts** are
registered, the city's own copy is retired and downloads redirect to a
randomly chosen mirror.

### How It Works

1. The authority uploads a dataset via `POST /datasets`
2. Anyone downloads it via `GET /datasets/{id}/content`
3. Contributors register re-hosted copies via `POST /datasets/{id}/contributors`
4. At five distinct hosts the authoritative copy is deleted and the
   dataset becomes `MIRRORED`
5. Later downloads are redirected to a contributor link, sampled
   uniformly on every request
"#,
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "Datasets", description = "Upload, list, edit, and delete dataset records"),
        (name = "Retrieval", description = "Download dataset content or get redirected to a mirror"),
        (name = "Contributors", description = "Register verified re-hosting claims"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::datasets::list_datasets_handler,
        crate::handlers::datasets::upload_dataset_handler,
        crate::handlers::datasets::edit_dataset_handler,
        crate::handlers::datasets::delete_dataset_handler,
        crate::handlers::content::download_dataset_handler,
        crate::handlers::contribute::register_contributor_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            DatasetResponse,
            UpdateDatasetRequest,
            DeleteResponse,
            ContributeRequest,
            ContributeResponse,
        )
    )
)]
pub struct ApiDoc;
