//! Error types for feed storage.

use std::time::Duration;

use thiserror::Error;

use plume_log::Epoch;

/// Errors raised by stores implementing the storage contracts.
///
/// `ChainCycle` and `MissingBlob` are the two shapes of a malformed remote
/// log; both fail the sync round hard and leave the local log untouched.
/// `Unavailable` and `Timeout` are transient transport failures that the
/// caller may retry — retry policy is the caller's concern, not the
/// store's.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or refused the request.
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    /// No recent feed document exists at the given URL.
    #[error("no recent feed at {0}")]
    FeedNotFound(String),

    /// Walking `previousEpoch` pointers revisited an epoch.
    #[error("malformed remote log: pointer cycle at epoch {0}")]
    ChainCycle(Epoch),

    /// A pointer referenced an epoch with no stored blob.
    #[error("malformed remote log: missing blob for epoch {0}")]
    MissingBlob(Epoch),

    /// A blob failed to encode or decode.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A download exceeded its deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// True for the hard malformed-remote-log failures, as opposed to
    /// transient transport errors.
    pub fn is_malformed_log(&self) -> bool {
        matches!(self, StoreError::ChainCycle(_) | StoreError::MissingBlob(_))
    }
}
