//! The per-feed post command log.
//!
//! A [`PostCommandLog`] is an ordered, deduplicated, newest-first sequence
//! of [`PostCommand`]s. It is a value: every operation takes `&self` and
//! returns a new log, so concurrency is expressed as *multiple logs*
//! (local vs. remote) that merge, never as shared mutation.
//!
//! # Invariants
//!
//! After every operation:
//!
//! 1. **Sort** — commands follow [`PostCommand::cmp_newest_first`]
//!    (unsynced first, then epochs descending, then timestamp, then source).
//! 2. **Uniqueness** — no two commands share a [`CommandId`].
//! 3. **Synced contiguity** — unsynced commands form a contiguous prefix;
//!    once a command has an epoch, everything after it has one too.
//! 4. **Head is newest** — the head carries the highest timestamp among the
//!    unsynced prefix, or the highest epoch once fully synced.
//!
//! The checks themselves live in [`crate::invariants`] and run in tests;
//! violations are programmer errors, never runtime conditions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use plume_types::{Post, PostId};

use crate::command::{
    CommandId, CommandKind, POST_COMMAND_PROTOCOL_VERSION, PostCommand, PostCommandRequest,
};
use crate::epoch::{Epoch, SyncState};
use crate::error::LogError;
use crate::index::LatestIndex;
use crate::Result;

/// Ordered, deduplicated command history of one feed, newest-first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCommandLog {
    commands: Vec<PostCommand>,
}

impl PostCommandLog {
    /// The empty log of a freshly created feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-ordered command sequence (newest-first).
    ///
    /// Used when reassembling a log from parts that are individually known
    /// to be canonical — a downloaded chain walk, or upload results plus
    /// the untouched synced suffix. For arbitrary command soup, merge two
    /// logs instead.
    pub fn from_commands(commands: Vec<PostCommand>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[PostCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The newest command, if any.
    pub fn head(&self) -> Option<&PostCommand> {
        self.commands.first()
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Share a new post.
    ///
    /// Never fails: sharing a post whose id is already in the log is a
    /// logged no-op, returning the log unchanged.
    pub fn share_post(&self, post: Post, source: &str) -> Self {
        if let Some(parent) = self.parent_id_for(post.id) {
            debug!(post_id = %post.id, parent = %parent, "share_post: post already shared, ignoring");
            return self.clone();
        }
        self.append(CommandKind::Update, post, CommandId::root(), source)
    }

    /// Update an already-shared post.
    ///
    /// Fails with [`LogError::NoPriorCommand`] when no command in the log
    /// carries the post's id.
    pub fn update_post(&self, post: Post, source: &str) -> Result<Self> {
        let parent_id = self
            .parent_id_for(post.id)
            .cloned()
            .ok_or(LogError::NoPriorCommand(post.id))?;
        Ok(self.append(CommandKind::Update, post, parent_id, source))
    }

    /// Remove an already-shared post by appending a tombstone.
    ///
    /// Fails with [`LogError::NoPriorCommand`] under the same condition as
    /// [`PostCommandLog::update_post`]. The tombstone stays in the log
    /// forever; there is no compaction.
    pub fn remove_post(&self, post: &Post, source: &str) -> Result<Self> {
        let parent_id = self
            .parent_id_for(post.id)
            .cloned()
            .ok_or(LogError::NoPriorCommand(post.id))?;
        Ok(self.append(CommandKind::Remove, post.tombstone(), parent_id, source))
    }

    /// Dispatch a [`PostCommandRequest`] to the matching mutation.
    pub fn apply(&self, request: PostCommandRequest, source: &str) -> Result<Self> {
        match request {
            PostCommandRequest::Share(post) => Ok(self.share_post(post, source)),
            PostCommandRequest::Update(post) => self.update_post(post, source),
            PostCommandRequest::Remove(post) => self.remove_post(&post, source),
        }
    }

    fn append(&self, kind: CommandKind, post: Post, parent_id: CommandId, source: &str) -> Self {
        let command = PostCommand {
            protocol_version: POST_COMMAND_PROTOCOL_VERSION,
            id: CommandId::new(self.highest_seen_timestamp() + 1, source),
            parent_id,
            kind,
            post,
            state: SyncState::Unsynced,
            previous_epoch: self.head_epoch(),
        };
        let mut commands = Vec::with_capacity(self.commands.len() + 1);
        commands.push(command);
        commands.extend_from_slice(&self.commands);
        Self { commands }
    }

    // ── Merge ───────────────────────────────────────────────────────────

    /// Merge another log into this one, producing the canonical combined
    /// log. Commutative and idempotent: merging in either order, or merging
    /// a log with itself, yields the same command sequence.
    pub fn merge(&self, other: &Self) -> Self {
        let mut commands = Vec::with_capacity(self.commands.len() + other.commands.len());
        commands.extend_from_slice(&self.commands);
        commands.extend_from_slice(&other.commands);
        Self {
            commands: sort_and_filter_post_commands(commands),
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Highest Lamport timestamp this log has seen, 0 when empty.
    ///
    /// A synced head is the authoritative frontier. With an unsynced head,
    /// the first synced command can still carry a higher timestamp (remote
    /// history that raced ahead), in which case that wins.
    pub fn highest_seen_timestamp(&self) -> u64 {
        let Some(head) = self.commands.first() else {
            return 0;
        };
        if head.is_synced() {
            return head.id.timestamp;
        }
        let head_timestamp = head.id.timestamp;
        for command in &self.commands {
            if command.is_synced() {
                if command.id.timestamp > head_timestamp {
                    return command.id.timestamp;
                }
                break;
            }
        }
        head_timestamp
    }

    /// Epoch of the newest command — `None` when the head is unsynced or
    /// the log is empty. This is the "head pointer" a freshly appended
    /// command records as its tentative `previous_epoch`.
    pub fn head_epoch(&self) -> Option<Epoch> {
        self.head().and_then(|command| command.epoch())
    }

    /// Epoch of the newest *synced* command — the last time this log was
    /// reconciled with the store. `None` when never synced.
    pub fn latest_epoch(&self) -> Option<Epoch> {
        self.commands.iter().find_map(|command| command.epoch())
    }

    /// Id of the command that most recently touched `post_id`, scanning
    /// newest-first. This is the parent an update or remove will link to.
    pub fn parent_id_for(&self, post_id: PostId) -> Option<&CommandId> {
        self.commands
            .iter()
            .find(|command| command.post.id == post_id)
            .map(|command| &command.id)
    }

    /// Look up a command by id.
    pub fn command_by_id(&self, id: &CommandId) -> Option<&PostCommand> {
        self.commands.iter().find(|command| &command.id == id)
    }

    /// The unsynced commands — by the contiguity invariant, always a prefix.
    pub fn unsynced_prefix(&self) -> &[PostCommand] {
        self.split_synced().0
    }

    /// The already-synced commands — always a suffix.
    pub fn synced_suffix(&self) -> &[PostCommand] {
        self.split_synced().1
    }

    /// Split into (unsynced prefix, synced suffix).
    pub fn split_synced(&self) -> (&[PostCommand], &[PostCommand]) {
        let first_synced = self
            .commands
            .iter()
            .position(PostCommand::is_synced)
            .unwrap_or(self.commands.len());
        self.commands.split_at(first_synced)
    }

    /// Build the explicit post-id → winning-command index for this log.
    pub fn latest_index(&self) -> LatestIndex {
        LatestIndex::build(self)
    }

    /// The still-visible posts, newest-first: one entry per live logical
    /// post, with removed and superseded versions filtered out. `limit`
    /// bounds the result; `None` returns all.
    pub fn latest_posts(&self, limit: Option<usize>) -> Vec<Post> {
        let index = self.latest_index();
        let live = index.live_posts().cloned();
        match limit {
            Some(count) => live.take(count).collect(),
            None => live.collect(),
        }
    }

    /// Synced commands newer than `epoch` (all synced commands when
    /// `None`), in log order. Cheap incremental feed for readers that only
    /// want new material.
    pub fn updates_since(&self, epoch: Option<Epoch>) -> Self {
        let commands = self
            .commands
            .iter()
            .filter(|command| match (command.epoch(), epoch) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(own), Some(since)) => own > since,
            })
            .cloned()
            .collect();
        Self { commands }
    }
}

/// Canonical ordering and deduplication of a command soup.
///
/// The result may be shorter than the input: the same command can appear
/// both as a local pending copy (unsynced) and as its stored twin
/// (synced, downloaded from the store), or stored twice under different
/// epochs by an at-least-once upload. One copy survives per id — the
/// synced copy with the earliest epoch, i.e. the first successful upload.
pub fn sort_and_filter_post_commands(mut commands: Vec<PostCommand>) -> Vec<PostCommand> {
    // Pass 1: timestamp/source newest-first. Duplicate ids share both keys,
    // so they land adjacent, with the surviving copy leading its run.
    commands.sort_by(|a, b| {
        b.id.timestamp
            .cmp(&a.id.timestamp)
            .then_with(|| b.id.source.cmp(&a.id.source))
            .then_with(|| a.state.cmp(&b.state))
    });
    commands.dedup_by(|next, kept| next.id == kept.id);
    // Pass 2: stable re-sort on sync state alone. Synced history lines up
    // by epoch descending, unsynced commands stay in front, and equal
    // states keep the pass 1 timestamp/source order.
    commands.sort_by(|a, b| b.state.cmp(&a.state));
    commands
}
