//! Durable table of per-dataset contributor registrations.

use chrono::Utc;
use dashmap::DashMap;

use crate::dataset::{Contributor, DatasetId};
use crate::error::{RegistryError, Result};

/// Result of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationOutcome {
    /// False when the `(email, host_link)` pair was already
    /// registered for this dataset.
    pub created: bool,
    /// Verified host count after the attempt.
    pub total: usize,
}

/// Append-only ledger of re-hosting claims.
///
/// Entries are immutable and never removed; they outlive the dataset
/// they describe. Registration is idempotent on `(email, host_link)`
/// per dataset, so duplicate submissions cannot inflate the count.
/// The per-dataset entry lock of the underlying map makes a
/// registration's duplicate check, insert, and count one linearizable
/// step with respect to concurrent registrations on the same dataset.
#[derive(Default)]
pub struct ContributorLedger {
    entries: DashMap<DatasetId, Vec<Contributor>>,
}

impl ContributorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a re-hosting claim. The caller is responsible for
    /// checking that the dataset exists; the ledger only validates
    /// the identity fields.
    pub fn register(
        &self,
        dataset_id: DatasetId,
        name: &str,
        email: &str,
        host_link: &str,
    ) -> Result<RegistrationOutcome> {
        let name = name.trim();
        let email = email.trim();
        let host_link = host_link.trim();

        if name.is_empty() {
            return Err(RegistryError::Validation("name is required".into()));
        }
        if email.is_empty() {
            return Err(RegistryError::Validation("email is required".into()));
        }
        if host_link.is_empty() {
            return Err(RegistryError::Validation("host link is required".into()));
        }

        let mut list = self.entries.entry(dataset_id).or_default();

        if list
            .iter()
            .any(|c| c.email == email && c.host_link == host_link)
        {
            return Ok(RegistrationOutcome {
                created: false,
                total: list.len(),
            });
        }

        list.push(Contributor {
            dataset_id,
            name: name.to_string(),
            email: email.to_string(),
            host_link: host_link.to_string(),
            registered_at: Utc::now(),
        });

        Ok(RegistrationOutcome {
            created: true,
            total: list.len(),
        })
    }

    /// Current verified host count for a dataset.
    pub fn count_for(&self, dataset_id: DatasetId) -> usize {
        self.entries.get(&dataset_id).map(|l| l.len()).unwrap_or(0)
    }

    /// Snapshot of the registrations for a dataset.
    pub fn list_for(&self, dataset_id: DatasetId) -> Vec<Contributor> {
        self.entries
            .get(&dataset_id)
            .map(|l| l.clone())
            .unwrap_or_default()
    }
}
