//! In-memory implementation of PostRepository

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use feed_core::entities::{Post, PostStats};
use feed_core::error::DomainError;
use feed_core::traits::{PostRepository, RepoResult};
use feed_core::value_objects::Snowflake;

/// In-memory implementation of PostRepository
#[derive(Debug, Default)]
pub struct MemPostRepository {
    posts: DashMap<i64, Post>,
}

impl MemPostRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for MemPostRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        Ok(self.posts.get(&id.into_inner()).map(|post| post.clone()))
    }

    async fn create(&self, post: &Post) -> RepoResult<()> {
        self.posts.insert(post.id.into_inner(), post.clone());
        Ok(())
    }

    async fn update_stats(&self, post_id: Snowflake, stats: &PostStats) -> RepoResult<()> {
        let Some(mut post) = self.posts.get_mut(&post_id.into_inner()) else {
            return Err(DomainError::PostNotFound(post_id));
        };

        post.stats = *stats;
        post.updated_at = Utc::now();
        Ok(())
    }
}
