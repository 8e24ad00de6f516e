//! Storage contracts.
//!
//! The remote feed store is append-only and deliberately narrow: it can
//! persist one command as the new head, and it can hand back the log by
//! walking backward pointers. Everything richer (merge, ordering, derived
//! views) lives in the log itself. Every method is a suspension point.

use std::time::Duration;

use async_trait::async_trait;

use plume_log::{Epoch, PostCommand, PostCommandLog};
use plume_types::RecentPostFeed;

use crate::error::StoreError;

/// A store that can persist a feed's post command log.
#[async_trait]
pub trait CommandLogStore: Send + Sync {
    /// Persist `command` as the new head of the feed.
    ///
    /// The caller must have set `previous_epoch` to its current
    /// understanding of the chain tail. Returns the command annotated with
    /// the freshly minted epoch. At-least-once delivery is acceptable: a
    /// duplicate upload creates a second blob for the same command id, and
    /// merge collapses it on the next sync.
    async fn upload_post_command(&self, command: PostCommand) -> Result<PostCommand, StoreError>;

    /// Reconstruct the feed's log by walking `previous_epoch` pointers
    /// backward from the current head (or from `until`, when given) down
    /// to the first command with no previous pointer.
    ///
    /// Fails with a malformed-log error when the walk meets a cycle or a
    /// pointer with no blob behind it.
    async fn download_post_command_log(
        &self,
        until: Option<Epoch>,
    ) -> Result<PostCommandLog, StoreError>;
}

/// A store that can publish a feed's recent-post snapshot.
#[async_trait]
pub trait RecentPostFeedStore: Send + Sync {
    /// Overwrite the feed's snapshot document; returns it with its
    /// published URL filled in. Snapshots are never merged.
    async fn upload_recent_post_feed(
        &self,
        feed: RecentPostFeed,
    ) -> Result<RecentPostFeed, StoreError>;

    /// Fetch the snapshot document published at `url`.
    async fn download_recent_post_feed(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<RecentPostFeed, StoreError>;
}

/// Full storage: command log plus recent feed.
pub trait Storage: CommandLogStore + RecentPostFeedStore {}

impl<T: CommandLogStore + RecentPostFeedStore + ?Sized> Storage for T {}
