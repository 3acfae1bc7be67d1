//! Blob area holding authoritative dataset bytes.
//!
//! The registry is specified against an abstract durable key-value
//! store, so the blob area is a trait with two backends: an in-memory
//! map (tests, development) and a plain directory (one file per
//! dataset id). A database-backed implementation would slot in here.

use std::fs;
use std::io;
use std::path::PathBuf;

use dashmap::DashMap;

use crate::dataset::DatasetId;

/// Content-addressed blob storage keyed by dataset id.
///
/// Bytes are present only while a dataset is HOSTED. `delete` must be
/// idempotent: removing a missing blob is not an error, which is what
/// makes dataset deletion safe after the authoritative copy was
/// already retired.
pub trait BlobStore: Send + Sync {
    fn put(&self, id: DatasetId, bytes: &[u8]) -> io::Result<()>;
    fn get(&self, id: DatasetId) -> io::Result<Option<Vec<u8>>>;
    fn delete(&self, id: DatasetId) -> io::Result<()>;
}

/// In-memory blob storage.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<DatasetId, Vec<u8>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, id: DatasetId, bytes: &[u8]) -> io::Result<()> {
        self.blobs.insert(id, bytes.to_vec());
        Ok(())
    }

    fn get(&self, id: DatasetId) -> io::Result<Option<Vec<u8>>> {
        Ok(self.blobs.get(&id).map(|b| b.clone()))
    }

    fn delete(&self, id: DatasetId) -> io::Result<()> {
        self.blobs.remove(&id);
        Ok(())
    }
}

/// Directory-backed blob storage, one file per dataset id.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open (and create if needed) the blob directory.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, id: DatasetId) -> PathBuf {
        self.root.join(id.to_string())
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, id: DatasetId, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.path_for(id), bytes)
    }

    fn get(&self, id: DatasetId) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn delete(&self, id: DatasetId) -> io::Result<()> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
