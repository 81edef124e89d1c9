//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use feed_core::entities::{Post, PostStats};
use feed_core::traits::{PostRepository, RepoResult};
use feed_core::value_objects::Snowflake;

use crate::mappers::PostInsert;
use crate::models::PostModel;

use super::error::{map_db_error, post_not_found};

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, author_id, content, like_count, dislike_count, created_at, updated_at
            FROM posts
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        let insert = PostInsert::new(post);

        sqlx::query(
            r"
            INSERT INTO posts (id, author_id, content, like_count, dislike_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(insert.id)
        .bind(insert.author_id)
        .bind(insert.content)
        .bind(post.stats.like_count)
        .bind(post.stats.dislike_count)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_stats(&self, post_id: Snowflake, stats: &PostStats) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE posts
            SET like_count = $2, dislike_count = $3, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(post_id.into_inner())
        .bind(stats.like_count)
        .bind(stats.dislike_count)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(post_not_found(post_id));
        }

        Ok(())
    }
}
