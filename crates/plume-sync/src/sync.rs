//! The merge-then-upload sync round.
//!
//! # Protocol
//!
//! ```text
//! +--------------+   download    +--------------+
//! | local log L  | ------------> | remote log R |
//! +------+-------+               +------+-------+
//!        |        merge(L, R)           |
//!        +---------------+--------------+
//!                        v
//!                 +------+-------+
//!                 |  merged log  |
//!                 +------+-------+
//!                        | upload unsynced suffix, oldest first,
//!                        | each chained on the previous epoch
//!                        v
//!                 +------+-------+
//!                 | synced log   |
//!                 +--------------+
//! ```
//!
//! Uploads are strictly sequential and oldest-first: every command embeds
//! the epoch of the upload before it, so uploading out of order would
//! corrupt the backward chain the remote log is reconstructed from. A
//! failure partway leaves a valid prefix on the store; re-running the
//! round is safe because merge collapses already-stored commands.

use tracing::debug;

use plume_log::PostCommandLog;
use plume_storage::{CommandLogStore, StoreError};

/// Upload the unsynced prefix of `log`, oldest command first, chaining
/// each upload on the epoch of the one before it. Returns the fully
/// synced log: upload results in front, untouched synced suffix behind.
pub async fn upload_unsynced_post_commands<S>(
    log: &PostCommandLog,
    store: &S,
) -> Result<PostCommandLog, StoreError>
where
    S: CommandLogStore + ?Sized,
{
    let (unsynced, synced) = log.split_synced();
    let mut previous_epoch = synced.first().and_then(|command| command.epoch());

    let mut uploaded = Vec::with_capacity(log.len());
    for command in unsynced.iter().rev() {
        let stored = store
            .upload_post_command(command.chained_after(previous_epoch))
            .await?;
        debug!(command = %stored.id, epoch = ?stored.epoch(), "uploaded command");
        previous_epoch = stored.epoch();
        uploaded.push(stored);
    }

    uploaded.reverse();
    uploaded.extend_from_slice(synced);
    Ok(PostCommandLog::from_commands(uploaded))
}

/// One full sync round: fetch the remote log, merge, upload whatever the
/// merged log still holds unsynced. Returns the new local log; the caller
/// swaps its stored reference to it after success.
///
/// Errors from the store propagate untouched — retry policy belongs to the
/// caller, and the local log is left exactly as it was.
pub async fn sync_post_command_log<S>(
    log: &PostCommandLog,
    store: &S,
) -> Result<PostCommandLog, StoreError>
where
    S: CommandLogStore + ?Sized,
{
    let local_epoch = log.latest_epoch();
    let remote = store.download_post_command_log(None).await?;
    let remote_epoch = remote.latest_epoch();
    debug!(?local_epoch, ?remote_epoch, "sync round");

    if local_epoch == remote_epoch && log.unsynced_prefix().is_empty() {
        // Nothing new on either side.
        return Ok(log.clone());
    }

    let merged = log.merge(&remote);
    upload_unsynced_post_commands(&merged, store).await
}
