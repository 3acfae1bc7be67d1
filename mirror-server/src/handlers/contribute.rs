//! Contributor registration handler

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use mirror_core::{DatasetId, DatasetState};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// A re-hosting claim for a dataset
#[derive(Deserialize, ToSchema)]
pub struct ContributeRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.org")]
    pub email: String,
    /// URL at which the contributor re-hosts the dataset's bytes
    #[schema(example = "https://mirror.example.org/potholes-2024.csv")]
    pub host_link: String,
}

/// What the registration observed, atomically with its insert
#[derive(Serialize, ToSchema)]
pub struct ContributeResponse {
    /// False when this (email, host link) pair was already registered
    pub created: bool,
    /// Verified host count after the registration
    pub verified_host_count: usize,
    /// Dataset state after any threshold transition this registration
    /// triggered
    #[schema(value_type = String, example = "HOSTED")]
    pub state: DatasetState,
}

/// Register as a verified contributor host for a dataset
///
/// Idempotent on the `(email, host_link)` pair: re-submitting the same
/// claim returns the current count without inflating it. When the
/// fifth distinct host registers, the authoritative copy is retired
/// and the dataset flips to MIRRORED.
#[utoipa::path(
    post,
    path = "/datasets/{id}/contributors",
    tag = "Contributors",
    params(
        ("id" = Uuid, Path, description = "Dataset identifier")
    ),
    request_body = ContributeRequest,
    responses(
        (status = 201, description = "Contributor registered", body = ContributeResponse),
        (status = 200, description = "Already registered; current count returned", body = ContributeResponse),
        (status = 400, description = "Missing name, email, or host link"),
        (status = 404, description = "Unknown dataset id")
    )
)]
pub async fn register_contributor_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ContributeRequest>,
) -> Result<(StatusCode, Json<ContributeResponse>), ApiError> {
    let receipt = state.registry.register_contributor(
        DatasetId::from(id),
        &request.name,
        &request.email,
        &request.host_link,
    )?;

    let status = if receipt.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(ContributeResponse {
            created: receipt.created,
            verified_host_count: receipt.verified_host_count,
            state: receipt.state,
        }),
    ))
}
