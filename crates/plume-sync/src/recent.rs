//! Recent feed projection.
//!
//! After a successful sync the feed's discovery snapshot is rebuilt from
//! the log and overwritten in the store. The snapshot is disposable: it is
//! never merged, and everything in it can be recomputed from the log.

use plume_log::PostCommandLog;
use plume_types::{Feed, ImageData, RecentPostFeed};

/// How many posts the snapshot carries by default.
pub const DEFAULT_RECENT_POST_COUNT: usize = 20;

/// Build the snapshot for `feed` from a log: the newest `count` live posts,
/// most recent first.
pub fn make_recent_post_feed(
    log: &PostCommandLog,
    feed: Feed,
    author_image: ImageData,
    count: usize,
) -> RecentPostFeed {
    RecentPostFeed {
        feed,
        author_image,
        posts: log.latest_posts(Some(count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_types::{Post, PostId};

    fn feed() -> Feed {
        Feed {
            name: "amy".to_string(),
            url: "feed://abc".to_string(),
            feed_url: "feed://abc".to_string(),
            favicon: String::new(),
        }
    }

    #[test]
    fn test_snapshot_is_bounded_and_newest_first() {
        let mut log = PostCommandLog::new();
        for id in 1..=25u64 {
            log = log.share_post(Post::new(id, format!("post{id}"), id), "local");
        }

        let recent = make_recent_post_feed(&log, feed(), ImageData::default(), 20);
        assert_eq!(recent.posts.len(), 20);
        assert_eq!(recent.posts[0].id, PostId(25));
        assert_eq!(recent.posts[19].id, PostId(6));
    }

    #[test]
    fn test_snapshot_excludes_removed_posts() {
        let post = Post::new(1u64, "gone soon", 1);
        let log = PostCommandLog::new().share_post(post.clone(), "local");
        let log = log.remove_post(&post, "local").unwrap();

        let recent = make_recent_post_feed(&log, feed(), ImageData::default(), 20);
        assert!(recent.posts.is_empty());
    }
}
