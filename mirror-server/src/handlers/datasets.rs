//! Dataset administration handlers
//!
//! List, upload, edit, and delete operations on dataset records. These
//! are "authority" operations by convention only; the registry exposes
//! the same data path to every caller.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use mirror_core::{DatasetId, DatasetState, DatasetSummary};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::multipart::MultipartFields;
use crate::state::AppState;

/// Dataset metadata as exposed over the API
#[derive(Serialize, ToSchema)]
pub struct DatasetResponse {
    /// Dataset identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    pub title: String,
    pub description: String,
    /// Hex SHA3-256 digest of the uploaded bytes; the dataset's
    /// content fingerprint
    #[schema(example = "a7ffc6f8bf1ed766...")]
    pub content_hash: String,
    pub original_filename: String,
    /// "HOSTED" while the authority holds the bytes, "MIRRORED" once
    /// enough independent copies exist
    #[schema(value_type = String, example = "HOSTED")]
    pub state: DatasetState,
    /// Number of distinct verified contributor hosts
    pub verified_host_count: usize,
    /// Creation time, RFC 3339
    pub created_at: String,
}

impl From<DatasetSummary> for DatasetResponse {
    fn from(summary: DatasetSummary) -> Self {
        let dataset = summary.dataset;
        Self {
            id: dataset.id.to_string(),
            title: dataset.title,
            description: dataset.description,
            content_hash: dataset.content_hash,
            original_filename: dataset.original_filename,
            state: dataset.state,
            verified_host_count: summary.verified_host_count,
            created_at: dataset.created_at.to_rfc3339(),
        }
    }
}

/// List all datasets (metadata only)
///
/// Returns a complete snapshot in creation order. Never errors.
#[utoipa::path(
    get,
    path = "/datasets",
    tag = "Datasets",
    responses(
        (status = 200, description = "All dataset records", body = Vec<DatasetResponse>)
    )
)]
pub async fn list_datasets_handler(State(state): State<AppState>) -> Json<Vec<DatasetResponse>> {
    let summaries = state.registry.list_datasets();
    Json(summaries.into_iter().map(DatasetResponse::from).collect())
}

/// Upload a new dataset
///
/// Accepts multipart/form-data with:
/// - **title** (required): dataset title
/// - **description** (required): dataset description
/// - **file** (required): the dataset file (max 25MB)
///
/// The file is hashed, stored as the authoritative copy, and the
/// record starts in the HOSTED state.
#[utoipa::path(
    post,
    path = "/datasets",
    tag = "Datasets",
    request_body(
        content_type = "multipart/form-data",
        description = "Dataset file with title and description"
    ),
    responses(
        (status = 201, description = "Dataset created", body = DatasetResponse),
        (status = 400, description = "Missing field, empty file, unsupported type, or file too large")
    )
)]
pub async fn upload_dataset_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DatasetResponse>), ApiError> {
    let fields = MultipartFields::parse(&mut multipart, state.max_file_size).await?;

    let title = fields.require_text("title")?;
    let description = fields.require_text("description")?;
    let file = fields.require_file()?;

    let filename = file
        .file_name
        .clone()
        .unwrap_or_else(|| "dataset".to_string());

    let dataset = state
        .registry
        .create_dataset(title, description, &filename, &file.data)?;

    let response = DatasetResponse::from(DatasetSummary {
        dataset,
        verified_host_count: 0,
    });
    Ok((StatusCode::CREATED, Json(response)))
}

/// Partial update of a dataset's mutable fields
#[derive(Deserialize, ToSchema)]
pub struct UpdateDatasetRequest {
    /// New title; omit to leave unchanged
    #[serde(default)]
    pub title: Option<String>,
    /// New description; omit to leave unchanged
    #[serde(default)]
    pub description: Option<String>,
}

/// Edit a dataset's title or description
///
/// Partial update: omitted fields are left unchanged; providing
/// neither is a no-op. The content hash and filename are immutable.
#[utoipa::path(
    patch,
    path = "/datasets/{id}",
    tag = "Datasets",
    params(
        ("id" = Uuid, Path, description = "Dataset identifier")
    ),
    request_body = UpdateDatasetRequest,
    responses(
        (status = 200, description = "Updated dataset", body = DatasetResponse),
        (status = 400, description = "Provided field was empty"),
        (status = 404, description = "Unknown dataset id")
    )
)]
pub async fn edit_dataset_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDatasetRequest>,
) -> Result<Json<DatasetResponse>, ApiError> {
    let id = DatasetId::from(id);
    state
        .registry
        .update_dataset(id, request.title.as_deref(), request.description.as_deref())?;
    let summary = state.registry.summary(id)?;
    Ok(Json(summary.into()))
}

/// Response for dataset deletion
#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}

/// Delete a dataset
///
/// Removes the record and, while HOSTED, the stored bytes. Permitted
/// in either state; contributor registrations are left in the ledger.
#[utoipa::path(
    delete,
    path = "/datasets/{id}",
    tag = "Datasets",
    params(
        ("id" = Uuid, Path, description = "Dataset identifier")
    ),
    responses(
        (status = 200, description = "Dataset deleted", body = DeleteResponse),
        (status = 404, description = "Unknown dataset id")
    )
)]
pub async fn delete_dataset_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = DatasetId::from(id);
    state.registry.delete_dataset(id)?;
    Ok(Json(DeleteResponse {
        message: format!("dataset {} deleted", id),
    }))
}
