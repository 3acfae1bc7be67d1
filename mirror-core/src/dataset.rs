use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque dataset identifier, assigned at creation and immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(Uuid);

impl DatasetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DatasetId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for DatasetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a dataset's authoritative copy.
///
/// `Hosted` means the authority still holds the file bytes;
/// `Mirrored` means they were discarded after enough independent
/// copies were registered, and retrieval must redirect. The
/// transition happens at most once and `Mirrored` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetState {
    Hosted,
    Mirrored,
}

/// A published dataset record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    /// Editable by the authority only.
    pub title: String,
    /// Editable by the authority only.
    pub description: String,
    /// Hex SHA3-256 digest of the uploaded bytes; immutable.
    pub content_hash: String,
    /// Descriptive only; echoed on direct downloads.
    pub original_filename: String,
    pub state: DatasetState,
    pub created_at: DateTime<Utc>,
}

/// A registered re-hosting claim.
///
/// Immutable once created and never deleted by any exposed
/// operation; entries outlive the dataset they describe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub dataset_id: DatasetId,
    pub name: String,
    pub email: String,
    /// URL at which the contributor claims to re-host the bytes.
    pub host_link: String,
    pub registered_at: DateTime<Utc>,
}
