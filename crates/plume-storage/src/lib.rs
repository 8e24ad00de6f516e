//! Feed storage contracts and the in-process feed store.
//!
//! The remote backend only supports three operations per feed: persist a
//! new head, fetch the current head, fetch the version immediately before
//! a given pointer. This crate models that contract
//! ([`CommandLogStore`] / [`RecentPostFeedStore`]) and ships
//! [`MemoryStorage`], a single-feed in-process implementation with the
//! same observable semantics — epoch minting, backward pointer chains,
//! malformed-chain detection, and the mandatory spacing between updates.
//!
//! All configuration is explicit ([`StorageConfig`], [`FeedAddress`]);
//! nothing in this crate reads process-global state.

pub mod codec;

mod config;
mod error;
mod memory;
mod store;

pub use config::{FeedAddress, StorageConfig};
pub use error::StoreError;
pub use memory::MemoryStorage;
pub use store::{CommandLogStore, RecentPostFeedStore, Storage};
