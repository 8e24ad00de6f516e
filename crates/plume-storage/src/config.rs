//! Storage configuration and feed addressing.
//!
//! Configuration is an explicitly constructed value passed to whoever owns
//! a store — there is no process-global persist configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed namespace for deriving stable feed topics via UUIDv5.
const PLUME_FEED_NS: Uuid = uuid::uuid!("7c9e3d5a-0b42-4f6e-9a17-d84c2f61b9e3");

/// Address of one feed in the store: a stable topic derived from the
/// writer's public identity. Same identity, same topic, every time.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedAddress {
    topic: Uuid,
}

impl FeedAddress {
    /// Derive the feed address for a writer identity (UUIDv5, deterministic).
    pub fn from_identity(identity: &str) -> Self {
        Self {
            topic: Uuid::new_v5(&PLUME_FEED_NS, identity.as_bytes()),
        }
    }

    pub fn topic(&self) -> Uuid {
        self.topic
    }

    /// The URL under which this feed's recent-post document is published.
    pub fn feed_url(&self) -> String {
        format!("feed://{}", self.topic.as_simple())
    }
}

impl fmt::Display for FeedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.feed_url())
    }
}

/// Tunables for a feed store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Minimum spacing the store requires between successive updates to
    /// the same feed pointer. This is a hard requirement of the remote
    /// store, not a politeness delay.
    pub min_update_interval: Duration,
    /// Deadline for downloading a recent feed document.
    pub download_timeout: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            min_update_interval: Duration::from_secs(1),
            download_timeout: Duration::from_secs(5),
        }
    }
}
