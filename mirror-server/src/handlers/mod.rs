//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod content;
pub mod contribute;
pub mod datasets;
pub mod health;

pub use content::download_dataset_handler;
pub use contribute::{register_contributor_handler, ContributeRequest, ContributeResponse};
pub use datasets::{
    delete_dataset_handler, edit_dataset_handler, list_datasets_handler, upload_dataset_handler,
    DatasetResponse, DeleteResponse, UpdateDatasetRequest,
};
pub use health::{health, ready, HealthResponse, ReadyResponse};
