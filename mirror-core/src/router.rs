//! Retrieval routing: direct bytes while hosted, redirect once mirrored.

use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::dataset::{DatasetId, DatasetState};
use crate::error::{RegistryError, Result};
use crate::ledger::ContributorLedger;
use crate::store::DatasetStore;

/// Outcome of a retrieval request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Authoritative bytes served straight from the blob area.
    Direct { bytes: Vec<u8>, filename: String },
    /// The dataset is mirrored; the caller should follow this link.
    Redirect { url: String },
}

/// Serves download requests from whichever copy is still available.
pub struct RetrievalRouter {
    store: Arc<DatasetStore>,
    ledger: Arc<ContributorLedger>,
}

impl RetrievalRouter {
    pub fn new(store: Arc<DatasetStore>, ledger: Arc<ContributorLedger>) -> Self {
        Self { store, ledger }
    }

    /// Resolve a dataset to its content or a mirror link.
    ///
    /// The contributor list is sampled uniformly at resolution time,
    /// not cached, so registrations arriving after mirroring join the
    /// rotation. A request that observed `HOSTED` but lost the blob to
    /// a concurrent retirement falls through to the redirect path
    /// instead of erroring.
    pub fn resolve(&self, id: DatasetId) -> Result<Resolution> {
        let dataset = self.store.get(id)?;

        if dataset.state == DatasetState::Hosted {
            if let Some(bytes) = self.store.fetch_bytes(id)? {
                return Ok(Resolution::Direct {
                    bytes,
                    filename: dataset.original_filename,
                });
            }
        }

        let hosts = self.ledger.list_for(id);
        match hosts.choose(&mut rand::thread_rng()) {
            Some(contributor) => Ok(Resolution::Redirect {
                url: contributor.host_link.clone(),
            }),
            // Unreachable while the threshold invariant holds, but an
            // operator wiping the ledger directly must not panic us.
            None => Err(RegistryError::Unavailable(id.to_string())),
        }
    }
}
