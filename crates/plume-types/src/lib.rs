//! Shared post and feed model types for Plume.
//!
//! This crate is the leaf foundation: post identity, post content, author
//! metadata, and feed descriptors. It has **no internal plume dependencies**
//! — every other crate builds on it.
//!
//! Wire note: all types serialize with camelCase field names, matching the
//! JSON documents already stored by deployed writers. Device-local fields
//! (like [`ImageData::local_path`]) are never serialized.

pub mod feed;
pub mod post;

pub use feed::{Feed, RecentPostFeed};
pub use post::{Author, ImageData, Post, PostId};
