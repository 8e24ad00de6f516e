//! Post mutation commands.
//!
//! A [`PostCommand`] is the immutable record of one mutation (update or
//! remove) of one logical post. Commands carry their causal parent via
//! [`CommandId`] and, once uploaded, the [`Epoch`] the store assigned plus
//! a pointer to the previous upload — the backward chain the remote log is
//! reconstructed from.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use plume_types::Post;

use crate::epoch::{Epoch, SyncState};

/// Wire protocol version stamped on every command.
pub const POST_COMMAND_PROTOCOL_VERSION: u32 = 1;

/// Unique identity of a command within one log.
///
/// `timestamp` is a Lamport timestamp (per-log logical counter, not wall
/// clock); `source` identifies the writer and is used only as the
/// deterministic tie-break between concurrent commands.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CommandId {
    pub timestamp: u64,
    pub source: String,
}

impl CommandId {
    pub fn new(timestamp: u64, source: impl Into<String>) -> Self {
        Self {
            timestamp,
            source: source.into(),
        }
    }

    /// The `(0, "")` sentinel marking "no parent" — a post's first command.
    pub const fn root() -> Self {
        Self {
            timestamp: 0,
            source: String::new(),
        }
    }

    /// True for the no-parent sentinel. Timestamp 0 is never assigned to a
    /// real command, so the timestamp alone decides.
    pub fn is_root(&self) -> bool {
        self.timestamp == 0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.timestamp, self.source)
    }
}

/// What a command does to its post.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CommandKind {
    Update,
    Remove,
}

/// One post mutation, causally linked to the command it supersedes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCommand {
    pub protocol_version: u32,
    pub id: CommandId,
    /// Id of the command this one supersedes; [`CommandId::root`] for a
    /// post's first command. A remove always has a real parent.
    pub parent_id: CommandId,
    #[serde(rename = "type")]
    pub kind: CommandKind,
    /// The post content; for removes, a tombstone keeping only identity.
    pub post: Post,
    /// Set exactly once, when the store accepts the upload.
    #[serde(rename = "epoch", default, skip_serializing_if = "SyncState::is_unsynced")]
    pub state: SyncState,
    /// Epoch of the command immediately preceding this one in upload order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_epoch: Option<Epoch>,
}

impl PostCommand {
    pub fn is_synced(&self) -> bool {
        self.state.is_synced()
    }

    pub fn epoch(&self) -> Option<Epoch> {
        self.state.epoch()
    }

    /// Copy of this command marked as durably stored at `epoch`.
    pub fn synced_at(&self, epoch: Epoch) -> Self {
        Self {
            state: SyncState::Synced(epoch),
            ..self.clone()
        }
    }

    /// Copy of this command chained after `previous_epoch`.
    pub fn chained_after(&self, previous_epoch: Option<Epoch>) -> Self {
        Self {
            previous_epoch,
            ..self.clone()
        }
    }

    /// The canonical newest-first order of the log: sync state (unsynced
    /// first, then epochs descending), then timestamp descending, then
    /// source descending. The source leg is the arbitrary-but-fixed
    /// tie-break deployed writers already rely on.
    pub fn cmp_newest_first(a: &PostCommand, b: &PostCommand) -> Ordering {
        b.state
            .cmp(&a.state)
            .then_with(|| b.id.timestamp.cmp(&a.id.timestamp))
            .then_with(|| b.id.source.cmp(&a.id.source))
    }
}

/// A requested mutation, before it becomes a command in the log.
///
/// The three cases map 1:1 onto [`crate::PostCommandLog::share_post`],
/// [`crate::PostCommandLog::update_post`] and
/// [`crate::PostCommandLog::remove_post`]; state layers dispatch through
/// [`crate::PostCommandLog::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum PostCommandRequest {
    Share(Post),
    Update(Post),
    Remove(Post),
}

impl PostCommandRequest {
    /// The post this request targets.
    pub fn post(&self) -> &Post {
        match self {
            PostCommandRequest::Share(post) => post,
            PostCommandRequest::Update(post) => post,
            PostCommandRequest::Remove(post) => post,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_types::PostId;

    fn command(timestamp: u64, source: &str, state: SyncState) -> PostCommand {
        PostCommand {
            protocol_version: POST_COMMAND_PROTOCOL_VERSION,
            id: CommandId::new(timestamp, source),
            parent_id: CommandId::root(),
            kind: CommandKind::Update,
            post: Post::new(PostId(1), "hello", 1),
            state,
            previous_epoch: None,
        }
    }

    #[test]
    fn test_root_sentinel() {
        assert!(CommandId::root().is_root());
        assert!(!CommandId::new(1, "a").is_root());
    }

    #[test]
    fn test_kind_string_forms() {
        assert_eq!(CommandKind::Update.to_string(), "update");
        assert_eq!("remove".parse::<CommandKind>().unwrap(), CommandKind::Remove);
    }

    #[test]
    fn test_newest_first_prefers_unsynced() {
        let unsynced = command(1, "a", SyncState::Unsynced);
        let synced = command(9, "a", SyncState::Synced(Epoch::new(5, 0)));
        assert_eq!(
            PostCommand::cmp_newest_first(&unsynced, &synced),
            Ordering::Less,
        );
    }

    #[test]
    fn test_newest_first_breaks_ties_on_source_descending() {
        let a = command(5, "a", SyncState::Unsynced);
        let b = command(5, "b", SyncState::Unsynced);
        // "b" > "a", so b sorts first.
        assert_eq!(PostCommand::cmp_newest_first(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_wire_field_names() {
        let cmd = command(2, "device", SyncState::Synced(Epoch::new(1, 0)))
            .chained_after(Some(Epoch::new(0, 0)));
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"protocolVersion\":1"));
        assert!(json.contains("\"type\":\"update\""));
        assert!(json.contains("\"epoch\":{\"time\":1,\"level\":0}"));
        assert!(json.contains("\"previousEpoch\":{\"time\":0,\"level\":0}"));
    }

    #[test]
    fn test_unsynced_command_omits_epoch() {
        let cmd = command(2, "device", SyncState::Unsynced);
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(!json.contains("\"epoch\""));

        let parsed: PostCommand = serde_json::from_str(&json).unwrap();
        assert!(!parsed.is_synced());
    }

    #[test]
    fn test_roundtrip_preserves_epoch_chain() {
        let cmd = command(3, "device", SyncState::Synced(Epoch::new(7, 2)))
            .chained_after(Some(Epoch::new(6, 0)));
        let json = serde_json::to_string(&cmd).unwrap();
        let parsed: PostCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cmd);
        assert_eq!(parsed.epoch(), Some(Epoch::new(7, 2)));
        assert_eq!(parsed.previous_epoch, Some(Epoch::new(6, 0)));
    }
}
