//! Causally-ordered post command log with deterministic merge.
//!
//! This crate is the synchronization core of a multi-writer feed: a
//! per-feed, append-mostly log of post mutations that several writers (the
//! local device, a remote store) produce independently and that merges into
//! one consistent view with no central sequencer.
//!
//! # How ordering works
//!
//! Every command carries a [`CommandId`] — a per-log Lamport timestamp plus
//! an opaque writer `source` used only as a tie-break — and a [`SyncState`]
//! that becomes `Synced(Epoch)` once the remote store accepts it. The total
//! order is sync state first (unsynced is newest), then timestamp, then
//! source, all descending. Merging two logs is concatenate + canonical
//! sort + dedup, which makes it commutative and idempotent: this is a
//! single-writer-per-id CRDT where concurrent edits of the same post
//! resolve last-writer-wins in the derived view, never by content merge.
//!
//! # What callers see
//!
//! [`PostCommandLog`] with value-semantics mutations
//! ([`PostCommandLog::share_post`], [`PostCommandLog::update_post`],
//! [`PostCommandLog::remove_post`], [`PostCommandLog::merge`]), the derived
//! queries (latest posts, unsynced prefix, updates since an epoch), and the
//! explicit [`LatestIndex`]. Storage and syncing live in the companion
//! crates; this one never does I/O.

mod command;
mod epoch;
mod error;
mod index;
mod log;

pub mod invariants;

pub use command::{
    CommandId, CommandKind, POST_COMMAND_PROTOCOL_VERSION, PostCommand, PostCommandRequest,
};
pub use epoch::{Epoch, SyncState};
pub use error::LogError;
pub use index::{LatestEntry, LatestIndex};
pub use log::{PostCommandLog, sort_and_filter_post_commands};

/// Result type for log operations.
pub type Result<T> = std::result::Result<T, LogError>;
