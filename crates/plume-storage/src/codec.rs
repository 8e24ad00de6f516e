//! Blob text codec.
//!
//! The store persists commands and feed documents as opaque JSON text.
//! Round-tripping preserves every field, including `epoch` and
//! `previousEpoch` — the sync chain is reconstructed from deserialized
//! blobs, so a lossy codec would corrupt it.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Encode a value as blob text.
pub fn serialize<T: Serialize>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

/// Decode a value from blob text.
pub fn deserialize<T: DeserializeOwned>(text: &str) -> Result<T, StoreError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_log::{CommandId, CommandKind, Epoch, PostCommand, SyncState};
    use plume_types::Post;

    #[test]
    fn test_command_roundtrip_preserves_chain_pointers() {
        let command = PostCommand {
            protocol_version: plume_log::POST_COMMAND_PROTOCOL_VERSION,
            id: CommandId::new(2, "device"),
            parent_id: CommandId::new(1, "device"),
            kind: CommandKind::Update,
            post: Post::new(1u64, "hello", 123),
            state: SyncState::Synced(Epoch::new(4, 0)),
            previous_epoch: Some(Epoch::new(3, 0)),
        };
        let text = serialize(&command).unwrap();
        let parsed: PostCommand = deserialize(&text).unwrap();
        assert_eq!(parsed, command);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        let result: Result<PostCommand, _> = deserialize("not json");
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
