//! Durable table of dataset records and their blob storage.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use crate::blob::BlobStore;
use crate::dataset::{Dataset, DatasetId, DatasetState};
use crate::error::{RegistryError, Result};
use crate::hash::ContentHash;

/// Dataset record table plus the blob area holding authoritative
/// bytes for HOSTED datasets.
///
/// The store itself only guarantees per-operation atomicity; the
/// [`Registry`](crate::registry::Registry) serializes the operations
/// that must compose atomically for a single dataset.
pub struct DatasetStore {
    records: DashMap<DatasetId, Dataset>,
    blobs: Arc<dyn BlobStore>,
}

impl DatasetStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            records: DashMap::new(),
            blobs,
        }
    }

    /// Create a record from an upload.
    ///
    /// Validation happens before anything is written, so a rejected
    /// upload never leaves an orphaned blob.
    pub fn create(
        &self,
        title: &str,
        description: &str,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<Dataset> {
        let title = title.trim();
        let description = description.trim();

        if title.is_empty() {
            return Err(RegistryError::Validation("title is required".into()));
        }
        if description.is_empty() {
            return Err(RegistryError::Validation("description is required".into()));
        }
        if bytes.is_empty() {
            return Err(RegistryError::Validation("file must not be empty".into()));
        }

        let id = DatasetId::new();
        let dataset = Dataset {
            id,
            title: title.to_string(),
            description: description.to_string(),
            content_hash: ContentHash::from_bytes(bytes).to_hex(),
            original_filename: original_filename.to_string(),
            state: DatasetState::Hosted,
            created_at: Utc::now(),
        };

        self.blobs.put(id, bytes)?;
        self.records.insert(id, dataset.clone());
        Ok(dataset)
    }

    pub fn get(&self, id: DatasetId) -> Result<Dataset> {
        self.records
            .get(&id)
            .map(|r| r.clone())
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: DatasetId) -> bool {
        self.records.contains_key(&id)
    }

    /// Complete snapshot in creation order.
    pub fn list(&self) -> Vec<Dataset> {
        let mut all: Vec<Dataset> = self.records.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        all
    }

    /// Partial update of the mutable text fields. A provided field
    /// must be non-empty; providing neither is a no-op.
    pub fn update(
        &self,
        id: DatasetId,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Dataset> {
        if let Some(t) = title {
            if t.trim().is_empty() {
                return Err(RegistryError::Validation("title must not be empty".into()));
            }
        }
        if let Some(d) = description {
            if d.trim().is_empty() {
                return Err(RegistryError::Validation(
                    "description must not be empty".into(),
                ));
            }
        }

        let mut entry = self
            .records
            .get_mut(&id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        if let Some(t) = title {
            entry.title = t.trim().to_string();
        }
        if let Some(d) = description {
            entry.description = d.trim().to_string();
        }
        Ok(entry.clone())
    }

    /// Remove the record and any stored bytes.
    ///
    /// The blob may already be gone for MIRRORED datasets; that is
    /// not an error. An unknown record is.
    pub fn delete(&self, id: DatasetId) -> Result<()> {
        self.records
            .remove(&id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        self.blobs.delete(id)?;
        Ok(())
    }

    /// HOSTED -> MIRRORED transition: drop the authoritative bytes.
    ///
    /// Internal to the crate; only the threshold policy path invokes
    /// it. A dataset that is already MIRRORED is a no-op so concurrent
    /// triggers are tolerated; a missing record means deletion won the
    /// race and there is nothing left to retire.
    pub(crate) fn mark_mirrored(&self, id: DatasetId) -> Result<()> {
        let mut entry = self
            .records
            .get_mut(&id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        if entry.state == DatasetState::Mirrored {
            return Ok(());
        }

        self.blobs.delete(id)?;
        entry.state = DatasetState::Mirrored;
        Ok(())
    }

    /// Authoritative bytes, present only while HOSTED. `None` tells
    /// the caller to consult the retrieval router instead.
    pub fn fetch_bytes(&self, id: DatasetId) -> Result<Option<Vec<u8>>> {
        match self.records.get(&id) {
            Some(r) if r.state == DatasetState::Hosted => Ok(self.blobs.get(id)?),
            _ => Ok(None),
        }
    }
}
