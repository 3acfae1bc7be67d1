//! Threshold policy deciding when the authoritative copy retires.

use crate::dataset::DatasetState;

/// Minimum number of distinct verified contributors before the
/// authoritative copy may be discarded. Fixed policy constant.
pub const HOST_THRESHOLD: usize = 5;

/// Per-dataset state machine: `HOSTED --[count reaches threshold]-->
/// MIRRORED`, with `MIRRORED` terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdPolicy;

impl ThresholdPolicy {
    /// Whether the dataset's authoritative copy should be retired.
    ///
    /// Pure check-then-act predicate; the registry runs it inside the
    /// dataset's critical section, immediately after a non-duplicate
    /// ledger insert, so the transition fires exactly once under
    /// arbitrary interleaving.
    pub fn should_retire(&self, state: DatasetState, verified_hosts: usize) -> bool {
        state == DatasetState::Hosted && verified_hosts >= HOST_THRESHOLD
    }
}
