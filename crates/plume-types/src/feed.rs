//! Feed descriptors.
//!
//! [`Feed`] is the addressable identity of a feed (name + URLs + favicon).
//! [`RecentPostFeed`] is the denormalized discovery snapshot uploaded next
//! to a feed's command log: the feed descriptor plus the most recent
//! materialized posts. It is rebuilt and overwritten on every successful
//! sync, never merged.

use serde::{Deserialize, Serialize};

use crate::post::{ImageData, Post};

/// Addressable feed metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub name: String,
    pub url: String,
    pub feed_url: String,
    pub favicon: String,
}

/// The discovery snapshot for a feed: descriptor plus a bounded,
/// most-recent-first list of materialized posts.
///
/// Subscribers read this instead of replaying the command log; anything
/// needing full history consults the log directly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPostFeed {
    #[serde(flatten)]
    pub feed: Feed,
    pub author_image: ImageData,
    pub posts: Vec<Post>,
}
