//! PostgreSQL implementation of ReactionRepository
//!
//! Every operation here touches a single row or a single index range.
//! The conflict and missing-row errors are part of the contract: the
//! application layer distinguishes benign races from real failures by them.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use feed_core::entities::{Reaction, ReactionKind};
use feed_core::error::DomainError;
use feed_core::traits::{ReactionRepository, RepoResult};
use feed_core::value_objects::Snowflake;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn exists(
        &self,
        user_id: Snowflake,
        post_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM reactions
                WHERE user_id = $1 AND post_id = $2 AND kind = $3
            )
            ",
        )
        .bind(user_id.into_inner())
        .bind(post_id.into_inner())
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn insert(&self, reaction: &Reaction) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO reactions (user_id, post_id, kind, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(reaction.user_id.into_inner())
        .bind(reaction.post_id.into_inner())
        .bind(reaction.kind.as_str())
        .bind(reaction.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReactionAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        user_id: Snowflake,
        post_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM reactions
            WHERE user_id = $1 AND post_id = $2 AND kind = $3
            ",
        )
        .bind(user_id.into_inner())
        .bind(post_id.into_inner())
        .bind(kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ReactionNotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_for_post(&self, post_id: Snowflake, kind: ReactionKind) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM reactions
            WHERE post_id = $1 AND kind = $2
            ",
        )
        .bind(post_id.into_inner())
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn list_post_ids_by_user(
        &self,
        user_id: Snowflake,
        kind: ReactionKind,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>> {
        let limit = limit.clamp(1, 100);

        let results = sqlx::query_scalar::<_, i64>(
            r"
            SELECT post_id
            FROM reactions
            WHERE user_id = $1 AND kind = $2
            ORDER BY created_at DESC
            LIMIT $3
            ",
        )
        .bind(user_id.into_inner())
        .bind(kind.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn list_user_ids_by_post(
        &self,
        post_id: Snowflake,
        kind: ReactionKind,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>> {
        let limit = limit.clamp(1, 100);

        let results = sqlx::query_scalar::<_, i64>(
            r"
            SELECT user_id
            FROM reactions
            WHERE post_id = $1 AND kind = $2
            ORDER BY created_at DESC
            LIMIT $3
            ",
        )
        .bind(post_id.into_inner())
        .bind(kind.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Snowflake::new).collect())
    }
}
