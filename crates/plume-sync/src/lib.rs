//! Sync rounds and the recent feed projection.
//!
//! This crate orchestrates what the log and storage crates provide:
//!
//! - [`sync_post_command_log`] — one merge-then-upload round for a feed's
//!   command log against a [`plume_storage::CommandLogStore`];
//! - [`upload_unsynced_post_commands`] — the chained, oldest-first upload
//!   of a log's unsynced prefix;
//! - [`make_recent_post_feed`] — the bounded discovery snapshot;
//! - [`sync_with_storage`] — the single entry point the state layer calls,
//!   combining all of the above into a [`StorageSyncUpdate`].
//!
//! Sync rounds for different feeds are independent and may run
//! concurrently; within one round, uploads are strictly sequential because
//! every upload embeds the previous upload's epoch.

mod recent;
mod sync;
mod syncer;

pub use recent::{DEFAULT_RECENT_POST_COUNT, make_recent_post_feed};
pub use sync::{sync_post_command_log, upload_unsynced_post_commands};
pub use syncer::{StorageSyncUpdate, sync_with_storage};
