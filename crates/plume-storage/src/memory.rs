//! In-process feed store with the remote store's observable semantics.
//!
//! `MemoryStorage` behaves like one feed on the real backend: it mints
//! monotonically increasing epochs, keeps every uploaded command as an
//! immutable blob of serialized text addressed by epoch, tracks a head
//! pointer, and reconstructs downloads by walking the backward chain. It
//! also enforces the backend's minimum spacing between successive updates
//! to the same feed pointer.
//!
//! Because blobs are stored and returned as serialized text, every
//! upload/download cycle exercises the codec the way the real store does.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use plume_log::{Epoch, PostCommand, PostCommandLog};
use plume_types::RecentPostFeed;

use crate::codec;
use crate::config::{FeedAddress, StorageConfig};
use crate::error::StoreError;
use crate::store::{CommandLogStore, RecentPostFeedStore};

#[derive(Default)]
struct FeedState {
    blobs: HashMap<Epoch, String>,
    head: Option<Epoch>,
    clock: u64,
    recent_feed: Option<String>,
    last_upload: Option<Instant>,
}

/// Single-feed in-process store.
pub struct MemoryStorage {
    address: FeedAddress,
    min_update_interval: Duration,
    state: Mutex<FeedState>,
}

impl MemoryStorage {
    /// A store with no update spacing — the usual test construction.
    pub fn new() -> Self {
        Self {
            address: FeedAddress::from_identity("memory"),
            min_update_interval: Duration::ZERO,
            state: Mutex::new(FeedState::default()),
        }
    }

    /// A store for `address` honoring the configured update spacing.
    pub fn with_config(address: FeedAddress, config: &StorageConfig) -> Self {
        Self {
            address,
            min_update_interval: config.min_update_interval,
            state: Mutex::new(FeedState::default()),
        }
    }

    pub fn address(&self) -> &FeedAddress {
        &self.address
    }

    /// Epoch of the current head, if anything has been uploaded.
    pub fn head_epoch(&self) -> Option<Epoch> {
        self.state.lock().head
    }

    /// Number of command blobs held (duplicate uploads count separately).
    pub fn stored_commands(&self) -> usize {
        self.state.lock().blobs.len()
    }

    /// Honor the feed's minimum update spacing before the next upload.
    async fn wait_for_update_slot(&self) {
        if self.min_update_interval.is_zero() {
            return;
        }
        let wait = {
            let state = self.state.lock();
            state.last_upload.map(|last| {
                (last + self.min_update_interval).saturating_duration_since(Instant::now())
            })
        };
        if let Some(wait) = wait {
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandLogStore for MemoryStorage {
    async fn upload_post_command(&self, command: PostCommand) -> Result<PostCommand, StoreError> {
        self.wait_for_update_slot().await;

        let mut state = self.state.lock();
        let epoch = Epoch::new(state.clock, 0);
        state.clock += 1;

        let stored = command.synced_at(epoch);
        let blob = codec::serialize(&stored)?;
        state.blobs.insert(epoch, blob);
        state.head = Some(epoch);
        state.last_upload = Some(Instant::now());
        debug!(feed = %self.address, command = %stored.id, %epoch, "stored command as new head");
        Ok(stored)
    }

    async fn download_post_command_log(
        &self,
        until: Option<Epoch>,
    ) -> Result<PostCommandLog, StoreError> {
        let state = self.state.lock();
        let Some(start) = until.or(state.head) else {
            return Ok(PostCommandLog::new());
        };

        let mut next = start;
        let mut visited: HashSet<Epoch> = HashSet::new();
        let mut commands: Vec<PostCommand> = Vec::new();
        loop {
            if !visited.insert(next) {
                return Err(StoreError::ChainCycle(next));
            }
            let blob = state.blobs.get(&next).ok_or(StoreError::MissingBlob(next))?;
            let command: PostCommand = codec::deserialize(blob)?;
            let previous = command.previous_epoch;
            commands.push(command);
            match previous {
                Some(previous) => next = previous,
                None => break,
            }
        }
        debug!(feed = %self.address, commands = commands.len(), "reconstructed log from chain");
        Ok(PostCommandLog::from_commands(commands))
    }
}

#[async_trait]
impl RecentPostFeedStore for MemoryStorage {
    async fn upload_recent_post_feed(
        &self,
        feed: RecentPostFeed,
    ) -> Result<RecentPostFeed, StoreError> {
        let url = self.address.feed_url();
        let mut published = feed;
        published.feed.url = url.clone();
        published.feed.feed_url = url;

        let blob = codec::serialize(&published)?;
        self.state.lock().recent_feed = Some(blob);
        Ok(published)
    }

    /// The in-process store answers immediately; `timeout` only matters
    /// for transports that can stall.
    async fn download_recent_post_feed(
        &self,
        url: &str,
        _timeout: Duration,
    ) -> Result<RecentPostFeed, StoreError> {
        if url != self.address.feed_url() {
            return Err(StoreError::FeedNotFound(url.to_string()));
        }
        let state = self.state.lock();
        let blob = state
            .recent_feed
            .as_ref()
            .ok_or_else(|| StoreError::FeedNotFound(url.to_string()))?;
        codec::deserialize(blob)
    }
}
