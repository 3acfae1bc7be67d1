//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use mirror_core::Registry;

use crate::validation::DEFAULT_MAX_FILE_SIZE;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// The dataset replication registry
    pub registry: Arc<Registry>,
    /// Upload size cap in bytes, from [`Config::max_file_size_bytes`](crate::Config::max_file_size_bytes)
    pub max_file_size: usize,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, max_file_size: usize) -> Self {
        Self {
            registry,
            max_file_size,
        }
    }

    /// State backed by an in-memory registry with the default upload
    /// cap (tests, development).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(Registry::in_memory()), DEFAULT_MAX_FILE_SIZE)
    }
}
