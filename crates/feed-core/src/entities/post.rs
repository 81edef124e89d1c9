//! Post entity - represents a user-authored post and its reaction counters

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Maximum post content length in characters
pub const MAX_CONTENT_LENGTH: usize = 280;

/// Denormalized reaction counters stored on the post record.
///
/// Must equal the number of stored Like and Dislike records for the post;
/// only the aggregate refresh path is allowed to write them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostStats {
    pub like_count: i64,
    pub dislike_count: i64,
}

impl PostStats {
    /// Create stats with explicit counts
    pub fn new(like_count: i64, dislike_count: i64) -> Self {
        Self {
            like_count,
            dislike_count,
        }
    }

    /// Stats of a post nobody has reacted to
    pub const fn zero() -> Self {
        Self {
            like_count: 0,
            dislike_count: 0,
        }
    }

    /// Total reactions of both kinds
    #[inline]
    pub fn total(&self) -> i64 {
        self.like_count + self.dislike_count
    }
}

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub stats: PostStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new Post with zeroed stats
    pub fn new(id: Snowflake, author_id: Snowflake, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            author_id,
            content,
            stats: PostStats::zero(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if content length is within the allowed bound
    pub fn content_valid(content: &str) -> bool {
        let len = content.chars().count();
        len >= 1 && len <= MAX_CONTENT_LENGTH
    }
}
