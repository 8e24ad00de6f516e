//! Order-insensitivity properties of the canonical merge.
//!
//! The merge has to behave like a set union with a deterministic total
//! order: whatever order commands arrive in, and however they are split
//! across logs, the canonical result is the same. These tests shuffle and
//! partition a realistic multi-writer history under a seeded RNG.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use plume_log::invariants::{assert_log_invariants, assert_logs_have_equal_ids};
use plume_log::{Epoch, PostCommand, PostCommandLog, sort_and_filter_post_commands};
use plume_types::Post;

fn test_post(id: u64) -> Post {
    Post::new(id, format!("hello{id}"), 1_000 + id)
}

/// Mark every command synced, newest command getting the highest epoch.
fn synced_copy(log: &PostCommandLog, start_time: u64) -> PostCommandLog {
    let len = log.len() as u64;
    let commands = log
        .commands()
        .iter()
        .enumerate()
        .map(|(i, command)| command.synced_at(Epoch::new(start_time + len - 1 - i as u64, 0)))
        .collect();
    PostCommandLog::from_commands(commands)
}

/// A history with three writers: a synced common base, then concurrent
/// unsynced branches including an update and a remove.
fn multi_writer_history() -> PostCommandLog {
    let base = PostCommandLog::new()
        .share_post(test_post(1), "origin")
        .share_post(test_post(2), "origin")
        .share_post(test_post(3), "origin");
    let base = synced_copy(&base, 0);

    let branch_a = {
        let mut updated = test_post(2);
        updated.text = "edited by a".to_string();
        base.share_post(test_post(4), "a")
            .update_post(updated, "a")
            .unwrap()
    };
    let branch_b = {
        base.share_post(test_post(5), "b")
            .remove_post(&test_post(3), "b")
            .unwrap()
    };

    branch_a.merge(&branch_b)
}

#[test]
fn canonical_form_is_shuffle_insensitive() {
    let history = multi_writer_history();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let mut commands: Vec<PostCommand> = history.commands().to_vec();
        commands.shuffle(&mut rng);
        let rebuilt = PostCommandLog::from_commands(sort_and_filter_post_commands(commands));
        assert_logs_have_equal_ids(&rebuilt, &history);
        assert_log_invariants(&rebuilt);
    }
}

#[test]
fn merge_of_random_partitions_reconstructs_the_history() {
    let history = multi_writer_history();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..50 {
        let mut left: Vec<PostCommand> = Vec::new();
        let mut right: Vec<PostCommand> = Vec::new();
        for command in history.commands() {
            // Overlapping partition: some commands land in both halves.
            match rng.gen_range(0..3) {
                0 => left.push(command.clone()),
                1 => right.push(command.clone()),
                _ => {
                    left.push(command.clone());
                    right.push(command.clone());
                }
            }
        }
        let left = PostCommandLog::from_commands(sort_and_filter_post_commands(left));
        let right = PostCommandLog::from_commands(sort_and_filter_post_commands(right));

        let forward = left.merge(&right);
        let backward = right.merge(&left);
        assert_logs_have_equal_ids(&forward, &backward);
        assert_logs_have_equal_ids(&forward, &history);
    }
}

#[test]
fn repeated_merge_is_idempotent() {
    let history = multi_writer_history();
    let mut merged = history.clone();
    for _ in 0..5 {
        merged = merged.merge(&history);
        assert_logs_have_equal_ids(&merged, &history);
    }
}

#[test]
fn duplicate_synced_copies_collapse_regardless_of_arrival_order() {
    let history = multi_writer_history();
    // A second, later upload of the already-synced base: same ids under
    // higher epochs, as an at-least-once retry would produce.
    let retried: Vec<PostCommand> = history
        .synced_suffix()
        .iter()
        .map(|command| {
            let epoch = command.epoch().unwrap();
            command.synced_at(Epoch::new(epoch.time + 100, epoch.level))
        })
        .collect();
    let retried = PostCommandLog::from_commands(retried);

    let merged = history.merge(&retried);
    assert_logs_have_equal_ids(&merged, &history);
    // The earliest epochs (the first successful upload) survive.
    for (kept, original) in merged.synced_suffix().iter().zip(history.synced_suffix()) {
        assert_eq!(kept.epoch(), original.epoch());
    }
}
