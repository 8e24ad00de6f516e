//! Post identity and content.
//!
//! A [`PostId`] names a *logical* post: every edit of the same post carries
//! the same id, and removal is expressed as a tombstone that keeps the id
//! and creation time while dropping the content.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical identity of a post. Stable across edits and removal.
#[derive(
    Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// An image attached to a post or an author.
///
/// `uri` points at uploaded content; `local_path` is a device-local file
/// that has not been uploaded yet and is deliberately excluded from
/// serialization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Device-local path, never uploaded.
    #[serde(default, skip_serializing)]
    pub local_path: Option<String>,
}

impl ImageData {
    /// An image that already lives at an uploaded location.
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Self::default()
        }
    }
}

/// Who wrote a post.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    pub uri: String,
    pub favicon_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,
}

/// One version of a post's content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub text: String,
    pub images: Vec<ImageData>,
    pub created_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

impl Post {
    /// A plain text post.
    pub fn new(id: impl Into<PostId>, text: impl Into<String>, created_at: u64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            images: Vec::new(),
            created_at,
            link: None,
            author: None,
            updated_at: None,
        }
    }

    /// The removal marker for this post: identity fields only, no content.
    pub fn tombstone(&self) -> Post {
        Post {
            id: self.id,
            text: String::new(),
            images: Vec::new(),
            created_at: self.created_at,
            link: None,
            author: None,
            updated_at: None,
        }
    }

    /// True when this post carries no content (the shape of a tombstone).
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.images.is_empty()
    }
}
