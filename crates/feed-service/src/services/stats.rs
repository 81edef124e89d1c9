//! Stats service - recomputes denormalized reaction counters
//!
//! The counters on a post row are derived data. This service is the only
//! writer of them: it recounts both kinds from the reaction records and
//! stores the result, serialized per post so two refreshes cannot
//! interleave their count-then-write and publish stale counters.

use feed_core::{DomainError, PostStats, ReactionKind, RepoResult, Snowflake};
use tracing::{instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// How many times a refresh is attempted before the store error surfaces.
pub const STATS_REFRESH_ATTEMPTS: u32 = 3;

/// Service for refreshing post reaction counters
pub struct StatsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatsService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Recount both reaction kinds for a post and persist the counters.
    ///
    /// Always refreshes like and dislike together: a toggle can move both
    /// distributions, and the refresh is two point counts. Idempotent and
    /// safe to re-run at any time. Transient store failures are retried up
    /// to [`STATS_REFRESH_ATTEMPTS`] times; a vanished post surfaces
    /// `PostNotFound` immediately.
    #[instrument(skip(self))]
    pub async fn refresh_post_stats(&self, post_id: Snowflake) -> ServiceResult<PostStats> {
        let _refresh_guard = self.ctx.post_locks().lock(post_id.into_inner()).await;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.recount_and_store(post_id).await {
                Ok(stats) => return Ok(stats),
                Err(e @ DomainError::DatabaseError(_)) if attempt < STATS_REFRESH_ATTEMPTS => {
                    warn!(
                        post_id = %post_id,
                        attempt,
                        error = %e,
                        "Stats refresh attempt failed, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn recount_and_store(&self, post_id: Snowflake) -> RepoResult<PostStats> {
        let like_count = self
            .ctx
            .reaction_repo()
            .count_for_post(post_id, ReactionKind::Like)
            .await?;
        let dislike_count = self
            .ctx
            .reaction_repo()
            .count_for_post(post_id, ReactionKind::Dislike)
            .await?;

        let stats = PostStats::new(like_count, dislike_count);
        self.ctx.post_repo().update_stats(post_id, &stats).await?;
        Ok(stats)
    }
}
