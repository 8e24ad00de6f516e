//! The explicit "who wins each post" index.
//!
//! Derived views used to be computed by re-scanning the log with an ad-hoc
//! skip set; [`LatestIndex`] makes the last-writer-wins resolution an
//! explicit, value-keyed structure instead. Building it is one newest-first
//! walk:
//!
//! - every non-root `parent_id` marks that parent as superseded;
//! - a command that is itself superseded is skipped (its whole losing
//!   branch is unreachable from the surviving traversal);
//! - the first surviving command per logical post id claims the lineage —
//!   an update claims it live, a remove claims it dead.
//!
//! The walk relies on canonical log order placing descendants before their
//! ancestors, which the causal timestamp rule and upload order guarantee.
//!
//! Iteration order of the index is insertion order, i.e. the newest-first
//! materialized order of the feed.

use std::collections::HashSet;

use indexmap::IndexMap;

use plume_types::{Post, PostId};

use crate::command::{CommandId, CommandKind};
use crate::log::PostCommandLog;

/// The winning command of one logical post's lineage.
#[derive(Clone, Debug, PartialEq)]
pub struct LatestEntry {
    pub command_id: CommandId,
    /// Surviving content; `None` when the winner is a removal.
    pub post: Option<Post>,
}

/// Post id → currently-winning command, for one log snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LatestIndex {
    entries: IndexMap<PostId, LatestEntry>,
}

impl LatestIndex {
    /// Build the index from a canonical log.
    pub fn build(log: &PostCommandLog) -> Self {
        let mut superseded: HashSet<&CommandId> = HashSet::new();
        let mut entries: IndexMap<PostId, LatestEntry> = IndexMap::new();

        for command in log.commands() {
            if !command.parent_id.is_root() {
                superseded.insert(&command.parent_id);
            }
            if superseded.contains(&command.id) {
                continue;
            }
            entries.entry(command.post.id).or_insert_with(|| {
                let post = match command.kind {
                    CommandKind::Update => Some(command.post.clone()),
                    CommandKind::Remove => None,
                };
                LatestEntry {
                    command_id: command.id.clone(),
                    post,
                }
            });
        }

        Self { entries }
    }

    /// The command currently winning `post_id`'s lineage (live or removed).
    pub fn winner(&self, post_id: PostId) -> Option<&CommandId> {
        self.entries.get(&post_id).map(|entry| &entry.command_id)
    }

    /// True when `post_id` is still visible.
    pub fn is_live(&self, post_id: PostId) -> bool {
        self.entries
            .get(&post_id)
            .is_some_and(|entry| entry.post.is_some())
    }

    /// Live posts, newest-first.
    pub fn live_posts(&self) -> impl Iterator<Item = &Post> {
        self.entries.values().filter_map(|entry| entry.post.as_ref())
    }

    /// Number of lineages (live and removed) the log knows about.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_post(id: u64) -> Post {
        Post::new(id, format!("hello{id}"), 1_000 + id)
    }

    #[test]
    fn test_winner_tracks_newest_update() {
        let log = PostCommandLog::new().share_post(test_post(1), "local");
        let mut updated = test_post(1);
        updated.text = "v2".to_string();
        let log = log.update_post(updated, "local").unwrap();

        let index = log.latest_index();
        assert_eq!(index.winner(PostId(1)), Some(&CommandId::new(2, "local")));
        assert!(index.is_live(PostId(1)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_removed_post_keeps_a_dead_lineage() {
        let log = PostCommandLog::new().share_post(test_post(1), "local");
        let log = log.remove_post(&test_post(1), "local").unwrap();

        let index = log.latest_index();
        assert_eq!(index.winner(PostId(1)), Some(&CommandId::new(2, "local")));
        assert!(!index.is_live(PostId(1)));
        assert_eq!(index.live_posts().count(), 0);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_live_posts_iterate_newest_first() {
        let log = PostCommandLog::new()
            .share_post(test_post(1), "local")
            .share_post(test_post(2), "local");
        let index = log.latest_index();
        let ids: Vec<PostId> = index.live_posts().map(|p| p.id).collect();
        assert_eq!(ids, vec![PostId(2), PostId(1)]);
    }

    #[test]
    fn test_same_parent_concurrent_edits_resolve_to_one_winner() {
        let base = PostCommandLog::new().share_post(test_post(1), "shared");
        let mut from_a = test_post(1);
        from_a.text = "fromA".to_string();
        let mut from_b = test_post(1);
        from_b.text = "fromB".to_string();

        let merged = base
            .update_post(from_a, "a")
            .unwrap()
            .merge(&base.update_post(from_b, "b").unwrap());

        let index = merged.latest_index();
        // Both branches survive the superseded filter (neither supersedes
        // the other), but the lineage slot goes to the higher source.
        assert_eq!(index.winner(PostId(1)), Some(&CommandId::new(2, "b")));
        assert_eq!(index.live_posts().count(), 1);
        assert_eq!(index.live_posts().next().unwrap().text, "fromB");
    }
}
