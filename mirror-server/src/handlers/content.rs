//! Dataset content retrieval handler
//!
//! Serves the authoritative bytes while a dataset is HOSTED, and
//! redirects to a randomly chosen verified contributor once it is
//! MIRRORED.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use mirror_core::{DatasetId, Resolution};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Retrieve a dataset's content
///
/// While the dataset is HOSTED this returns the file bytes directly
/// (`application/octet-stream`, with the original filename in the
/// Content-Disposition header). Once MIRRORED it returns a 307
/// redirect to one of the registered contributor links, sampled
/// uniformly from the current ledger on every request.
#[utoipa::path(
    get,
    path = "/datasets/{id}/content",
    tag = "Retrieval",
    params(
        ("id" = Uuid, Path, description = "Dataset identifier")
    ),
    responses(
        (status = 200, description = "Authoritative file bytes", content_type = "application/octet-stream"),
        (status = 307, description = "Redirect to a verified contributor host"),
        (status = 404, description = "Unknown dataset id"),
        (status = 503, description = "Mirrored dataset with no contributor links left")
    )
)]
pub async fn download_dataset_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    match state.registry.resolve(DatasetId::from(id))? {
        Resolution::Direct { bytes, filename } => {
            let disposition = format!("attachment; filename=\"{}\"", sanitize_filename(&filename));
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response())
        }
        Resolution::Redirect { url } => {
            tracing::debug!(dataset_id = %id, mirror = %url, "redirecting to mirror");
            Ok(Redirect::temporary(&url).into_response())
        }
    }
}

/// Quotes and control bytes in a filename would corrupt the
/// Content-Disposition header (or fail HeaderValue conversion
/// outright); strip them.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '"' && !c.is_control())
        .collect()
}
