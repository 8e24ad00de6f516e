//! Remote-store version pointers and the synced/unsynced state of a command.
//!
//! An [`Epoch`] names one version in the remote append-only feed store. It
//! is opaque to the log except for its total order: `time` is the primary
//! key, `level` the secondary.
//!
//! [`SyncState`] makes "has this command been durably stored" a two-case
//! sum type instead of a nullable epoch. Its total order is the one the
//! whole log ordering builds on: an unsynced command is always *newer* than
//! any synced one, because stored history is necessarily causally prior to
//! a pending local write built on top of it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A version pointer in the remote feed store. Totally ordered by
/// `(time, level)` — the derived `Ord` relies on field declaration order.
#[derive(
    Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Epoch {
    pub time: u64,
    pub level: u32,
}

impl Epoch {
    pub const fn new(time: u64, level: u32) -> Self {
        Self { time, level }
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.time, self.level)
    }
}

/// Whether a command has been durably persisted to the remote store.
///
/// Variant order matters: `Synced` is declared first so the derived `Ord`
/// ranks every `Synced` below `Unsynced`, and synced states among
/// themselves by epoch. "Greatest" therefore means "newest".
///
/// On the wire this is the original nullable `epoch` field, so it
/// round-trips through `Option<Epoch>`.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(from = "Option<Epoch>", into = "Option<Epoch>")]
pub enum SyncState {
    Synced(Epoch),
    Unsynced,
}

impl SyncState {
    /// The epoch of a synced command, `None` while unsynced.
    pub fn epoch(&self) -> Option<Epoch> {
        match self {
            SyncState::Synced(epoch) => Some(*epoch),
            SyncState::Unsynced => None,
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, SyncState::Synced(_))
    }

    pub fn is_unsynced(&self) -> bool {
        !self.is_synced()
    }
}

impl Default for SyncState {
    fn default() -> Self {
        SyncState::Unsynced
    }
}

impl From<Option<Epoch>> for SyncState {
    fn from(epoch: Option<Epoch>) -> Self {
        match epoch {
            Some(epoch) => SyncState::Synced(epoch),
            None => SyncState::Unsynced,
        }
    }
}

impl From<SyncState> for Option<Epoch> {
    fn from(state: SyncState) -> Self {
        state.epoch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_orders_by_time_then_level() {
        assert!(Epoch::new(1, 0) < Epoch::new(2, 0));
        assert!(Epoch::new(2, 1) < Epoch::new(2, 2));
        assert!(Epoch::new(2, 9) < Epoch::new(3, 0));
    }

    #[test]
    fn test_unsynced_is_newer_than_any_synced() {
        assert!(SyncState::Synced(Epoch::new(u64::MAX, u32::MAX)) < SyncState::Unsynced);
        assert!(SyncState::Synced(Epoch::new(1, 0)) < SyncState::Synced(Epoch::new(2, 0)));
    }

    #[test]
    fn test_sync_state_serializes_as_nullable_epoch() {
        let synced = SyncState::Synced(Epoch::new(3, 1));
        let json = serde_json::to_string(&synced).unwrap();
        assert_eq!(json, r#"{"time":3,"level":1}"#);

        let parsed: SyncState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, synced);

        let parsed_null: SyncState = serde_json::from_str("null").unwrap();
        assert_eq!(parsed_null, SyncState::Unsynced);
    }
}
