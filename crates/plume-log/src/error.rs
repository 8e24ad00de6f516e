//! Error types for log operations.

use thiserror::Error;

use plume_types::PostId;

/// Errors raised by log mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// Update or remove was requested for a post the log has never seen.
    ///
    /// This is a caller bug — the UI must not offer edit/remove for a post
    /// that was never shared — so retrying with the same arguments is
    /// pointless.
    #[error("no prior command for post {0}")]
    NoPriorCommand(PostId),
}
