//! Post entity <-> model mapper

use feed_core::entities::{Post, PostStats};
use feed_core::value_objects::Snowflake;

use crate::models::PostModel;

/// Convert PostModel to Post entity
impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Snowflake::new(model.id),
            author_id: Snowflake::new(model.author_id),
            content: model.content,
            stats: PostStats::new(model.like_count, model.dislike_count),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Convert Post entity reference to values for database insertion
pub struct PostInsert<'a> {
    pub id: i64,
    pub author_id: i64,
    pub content: &'a str,
}

impl<'a> PostInsert<'a> {
    pub fn new(post: &'a Post) -> Self {
        Self {
            id: post.id.into_inner(),
            author_id: post.author_id.into_inner(),
            content: &post.content,
        }
    }
}
