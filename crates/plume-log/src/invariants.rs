//! Log invariant checks.
//!
//! These are assertions, not recoverable errors: a violation means a bug in
//! the log algebra, so every check panics with a description. They run from
//! tests here and in the sync crate after each operation under test.

use crate::command::PostCommand;
use crate::log::{PostCommandLog, sort_and_filter_post_commands};

/// All structural invariants at once.
#[track_caller]
pub fn assert_log_invariants(log: &PostCommandLog) {
    assert_sorted_and_unique(log);
    assert_head_has_highest_timestamp(log);
    assert_synced_contiguity(log);
    assert_parents_keep_causal_ordering(log);
    assert_no_dangling_parents(log);
}

/// Re-running the canonical sort+dedup must be a fixpoint: same length,
/// same ids in the same positions.
#[track_caller]
pub fn assert_sorted_and_unique(log: &PostCommandLog) {
    let canonical = sort_and_filter_post_commands(log.commands().to_vec());
    assert_eq!(
        canonical.len(),
        log.len(),
        "log is not deduplicated: canonical form has {} commands, log has {}",
        canonical.len(),
        log.len(),
    );
    for (i, (canonical, actual)) in canonical.iter().zip(log.commands()).enumerate() {
        assert_eq!(
            canonical.id, actual.id,
            "log is not in canonical order: first difference at position {i}",
        );
    }
}

/// The head command carries the highest seen timestamp, and no command
/// exceeds it.
#[track_caller]
pub fn assert_head_has_highest_timestamp(log: &PostCommandLog) {
    let highest = log.highest_seen_timestamp();
    let head_timestamp = log.head().map_or(0, |command| command.id.timestamp);
    assert_eq!(
        highest, head_timestamp,
        "head timestamp {head_timestamp} is not the highest seen {highest}",
    );
    for command in log.commands() {
        assert!(
            command.id.timestamp <= highest,
            "command {} exceeds the highest seen timestamp {highest}",
            command.id,
        );
    }
}

/// Once a synced command appears, everything after it is synced too.
#[track_caller]
pub fn assert_synced_contiguity(log: &PostCommandLog) {
    let Some(first_synced) = log.commands().iter().position(PostCommand::is_synced) else {
        return;
    };
    for (i, command) in log.commands().iter().enumerate().skip(first_synced) {
        assert!(
            command.is_synced(),
            "unsynced command {} at position {i} after synced position {first_synced}",
            command.id,
        );
    }
}

/// A parent is always causally older than its child.
#[track_caller]
pub fn assert_parents_keep_causal_ordering(log: &PostCommandLog) {
    for command in log.commands() {
        if !command.parent_id.is_root() {
            assert!(
                command.parent_id.timestamp < command.id.timestamp,
                "command {} has parent {} that is not older",
                command.id,
                command.parent_id,
            );
        }
    }
}

/// Every non-root parent reference resolves to a command in the log.
#[track_caller]
pub fn assert_no_dangling_parents(log: &PostCommandLog) {
    for command in log.commands() {
        if !command.parent_id.is_root() {
            assert!(
                log.command_by_id(&command.parent_id).is_some(),
                "command {} has dangling parent {}",
                command.id,
                command.parent_id,
            );
        }
    }
}

/// Two logs contain the same command ids in the same order.
#[track_caller]
pub fn assert_logs_have_equal_ids(a: &PostCommandLog, b: &PostCommandLog) {
    assert_eq!(
        a.len(),
        b.len(),
        "logs differ in length: {} vs {}",
        a.len(),
        b.len(),
    );
    for (i, (left, right)) in a.commands().iter().zip(b.commands()).enumerate() {
        assert_eq!(left.id, right.id, "logs differ at position {i}");
    }
}
