//! The full storage sync entry point.
//!
//! One call reconciles a feed with its store: sync the command log, work
//! out which posts changed, rebuild and publish the recent feed snapshot.
//! This is what the state layer invokes when a feed is due for syncing.

use tracing::debug;

use plume_log::{CommandKind, PostCommandLog};
use plume_storage::{Storage, StoreError};
use plume_types::{Post, RecentPostFeed};

use crate::recent::{DEFAULT_RECENT_POST_COUNT, make_recent_post_feed};
use crate::sync::sync_post_command_log;

/// Everything a sync round produced.
#[derive(Clone, Debug)]
pub struct StorageSyncUpdate {
    /// The fully synced command log — the caller's new local log.
    pub post_command_log: PostCommandLog,
    /// The freshly published snapshot, with its store URL filled in.
    pub recent_post_feed: RecentPostFeed,
    /// Posts from update commands that became synced since the last known
    /// epoch, newest first. Removals are not reported here; readers see
    /// them disappear from the snapshot.
    pub updated_posts: Vec<Post>,
}

/// Run one full sync round for a feed against `store`.
pub async fn sync_with_storage<S>(
    log: &PostCommandLog,
    recent_post_feed: &RecentPostFeed,
    store: &S,
) -> Result<StorageSyncUpdate, StoreError>
where
    S: Storage + ?Sized,
{
    let previous_epoch = log.latest_epoch();
    let post_command_log = sync_post_command_log(log, store).await?;

    let updated_posts: Vec<Post> = post_command_log
        .updates_since(previous_epoch)
        .commands()
        .iter()
        .filter(|command| command.kind == CommandKind::Update)
        .map(|command| command.post.clone())
        .collect();
    debug!(updated = updated_posts.len(), "computed updates since last sync");

    let rebuilt = make_recent_post_feed(
        &post_command_log,
        recent_post_feed.feed.clone(),
        recent_post_feed.author_image.clone(),
        DEFAULT_RECENT_POST_COUNT,
    );
    let recent_post_feed = store.upload_recent_post_feed(rebuilt).await?;

    Ok(StorageSyncUpdate {
        post_command_log,
        recent_post_feed,
        updated_posts,
    })
}
