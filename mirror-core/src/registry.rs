//! The registry facade: composes store, ledger, policy, and router
//! under a per-dataset concurrency discipline.

use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use serde::Serialize;

use crate::blob::{BlobStore, MemoryBlobStore};
use crate::dataset::{Dataset, DatasetId, DatasetState};
use crate::error::{RegistryError, Result};
use crate::ledger::ContributorLedger;
use crate::policy::ThresholdPolicy;
use crate::router::{Resolution, RetrievalRouter};
use crate::store::DatasetStore;

/// Dataset record joined with its live verified host count.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    #[serde(flatten)]
    pub dataset: Dataset,
    pub verified_host_count: usize,
}

/// What a contribution request observed, atomically with its insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionReceipt {
    /// False when the `(email, host_link)` pair was already known.
    pub created: bool,
    pub verified_host_count: usize,
    /// Dataset state after any threshold transition this contribution
    /// triggered.
    pub state: DatasetState,
}

/// Shared mutable registry state with an explicit locking discipline.
///
/// Requests execute concurrently, but every mutation touching a single
/// dataset's `(state, verified_host_count)` pair runs under that
/// dataset's mutex: contributor registration plus the threshold
/// check-then-act, edits, and deletion. The critical sections contain
/// no unbounded I/O and no awaits, so the ledger-insert -> count ->
/// retire sequence is one atomic unit per dataset. Reads are lock-free
/// snapshots; a download racing the retirement either gets the old
/// bytes or a redirect, never an error.
pub struct Registry {
    store: Arc<DatasetStore>,
    ledger: Arc<ContributorLedger>,
    policy: ThresholdPolicy,
    router: RetrievalRouter,
    locks: DashMap<DatasetId, Arc<Mutex<()>>>,
}

impl Registry {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        let store = Arc::new(DatasetStore::new(blobs));
        let ledger = Arc::new(ContributorLedger::new());
        let router = RetrievalRouter::new(store.clone(), ledger.clone());
        Self {
            store,
            ledger,
            policy: ThresholdPolicy,
            router,
            locks: DashMap::new(),
        }
    }

    /// Registry backed by in-memory blob storage.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBlobStore::new()))
    }

    /// The lock entry is created on demand; mutators that find no
    /// record behind it drop it again, so the map tracks live
    /// datasets rather than every id ever asked about.
    fn dataset_lock(&self, id: DatasetId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn guard(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
        // A poisoned lock only means a panicked holder; the guarded
        // state lives in the store/ledger and stays consistent.
        lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Upload: hash, persist bytes, record with state HOSTED.
    pub fn create_dataset(
        &self,
        title: &str,
        description: &str,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<Dataset> {
        let dataset = self.store.create(title, description, original_filename, bytes)?;
        tracing::info!(
            dataset_id = %dataset.id,
            content_hash = %dataset.content_hash,
            size = bytes.len(),
            "dataset created"
        );
        Ok(dataset)
    }

    pub fn get_dataset(&self, id: DatasetId) -> Result<Dataset> {
        self.store.get(id)
    }

    pub fn summary(&self, id: DatasetId) -> Result<DatasetSummary> {
        let dataset = self.store.get(id)?;
        let verified_host_count = self.ledger.count_for(id);
        Ok(DatasetSummary {
            dataset,
            verified_host_count,
        })
    }

    /// Complete snapshot in creation order, with live host counts.
    pub fn list_datasets(&self) -> Vec<DatasetSummary> {
        self.store
            .list()
            .into_iter()
            .map(|dataset| {
                let verified_host_count = self.ledger.count_for(dataset.id);
                DatasetSummary {
                    dataset,
                    verified_host_count,
                }
            })
            .collect()
    }

    pub fn verified_host_count(&self, id: DatasetId) -> usize {
        self.ledger.count_for(id)
    }

    /// Partial edit of title/description by the authority.
    pub fn update_dataset(
        &self,
        id: DatasetId,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Dataset> {
        let lock = self.dataset_lock(id);
        let _guard = Self::guard(&lock);
        let result = self.store.update(id, title, description);
        if matches!(result, Err(RegistryError::NotFound(_))) {
            self.locks.remove(&id);
        }
        result
    }

    /// Administrative delete, permitted in either state.
    ///
    /// Contributor entries are claims about bytes, not about the
    /// record, and are deliberately left in the ledger.
    pub fn delete_dataset(&self, id: DatasetId) -> Result<()> {
        let result = {
            let lock = self.dataset_lock(id);
            let _guard = Self::guard(&lock);
            self.store.delete(id)
        };
        // The entry goes away whether the record existed or not
        self.locks.remove(&id);
        result?;
        tracing::info!(dataset_id = %id, "dataset deleted");
        Ok(())
    }

    /// Register a contributor and apply the threshold policy.
    ///
    /// Existence check, duplicate check, insert, count, and the
    /// possible HOSTED -> MIRRORED transition all happen under the
    /// dataset's lock: two simultaneous contributions cannot both
    /// observe a pre-threshold count, and the retirement fires exactly
    /// once.
    pub fn register_contributor(
        &self,
        id: DatasetId,
        name: &str,
        email: &str,
        host_link: &str,
    ) -> Result<ContributionReceipt> {
        let lock = self.dataset_lock(id);
        let _guard = Self::guard(&lock);

        let dataset = match self.store.get(id) {
            Ok(dataset) => dataset,
            Err(e) => {
                self.locks.remove(&id);
                return Err(e);
            }
        };
        let outcome = self.ledger.register(id, name, email, host_link)?;

        let mut state = dataset.state;
        if outcome.created && self.policy.should_retire(state, outcome.total) {
            match self.store.mark_mirrored(id) {
                Ok(()) => {
                    state = DatasetState::Mirrored;
                    tracing::info!(
                        dataset_id = %id,
                        verified_hosts = outcome.total,
                        "threshold reached, authoritative copy retired"
                    );
                }
                // Deletion won the race; nothing left to retire.
                Err(RegistryError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        if outcome.created {
            tracing::debug!(
                dataset_id = %id,
                verified_hosts = outcome.total,
                "contributor registered"
            );
        }

        Ok(ContributionReceipt {
            created: outcome.created,
            verified_host_count: outcome.total,
            state,
        })
    }

    /// Serve a download from the authoritative copy or a mirror.
    pub fn resolve(&self, id: DatasetId) -> Result<Resolution> {
        self.router.resolve(id)
    }
}
