//! Core registry for community-mirrored open datasets.
//!
//! An authority publishes a dataset once; independent contributors
//! register re-hosted copies of it. When five distinct verified hosts
//! exist, the authoritative copy is retired and retrieval redirects
//! to a randomly chosen mirror.
//!
//! The crate is synchronous and transport-agnostic: every operation
//! completes in bounded local time, and the HTTP surface lives in
//! `mirror-server`. Concurrency is handled here, by the [`Registry`]
//! facade's per-dataset locking discipline.

pub mod blob;
pub mod dataset;
pub mod error;
pub mod hash;
pub mod ledger;
pub mod policy;
pub mod registry;
pub mod router;
pub mod store;

pub use blob::{BlobStore, FsBlobStore, MemoryBlobStore};
pub use dataset::{Contributor, Dataset, DatasetId, DatasetState};
pub use error::{RegistryError, Result};
pub use hash::ContentHash;
pub use ledger::{ContributorLedger, RegistrationOutcome};
pub use policy::{ThresholdPolicy, HOST_THRESHOLD};
pub use registry::{ContributionReceipt, DatasetSummary, Registry};
pub use router::{Resolution, RetrievalRouter};
pub use store::DatasetStore;
