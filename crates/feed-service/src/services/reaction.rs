//! Reaction service - coordinates reaction writes and aggregate refreshes
//!
//! Every write on a (user, post) pair goes through the same path: resolve
//! the caller, take the pair lock, derive the current state from the store,
//! apply the computed transition, then refresh the post's counters while
//! still holding the lock. The store offers no multi-record transactions;
//! this serialization is what keeps the pair invariant and the counters
//! honest under concurrency.

use feed_core::{
    DomainError, Post, PostStats, Reaction, ReactionKind, ReactionState, Snowflake, Transition,
    User,
};
use tracing::{error, info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::identity::resolve_user_id;
use super::stats::StatsService;

/// A write operation on a (user, post) pair
#[derive(Debug, Clone, Copy)]
enum ReactionOp {
    /// Flip the state for the kind per the transition table
    Toggle(ReactionKind),
    /// Ensure the pair holds the kind
    Set(ReactionKind),
    /// Ensure the pair does not hold the kind
    Clear(ReactionKind),
}

impl ReactionOp {
    fn apply(self, state: ReactionState) -> Transition {
        match self {
            Self::Toggle(kind) => state.toggle(kind),
            Self::Set(kind) => state.set(kind),
            Self::Clear(kind) => state.clear(kind),
        }
    }
}

/// Service for reaction operations
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // === Write operations ===

    /// Toggle a reaction: set it if absent, clear it if held, switch to it
    /// if the opposite kind is held. Returns the refreshed counters.
    ///
    /// `user` is the path-supplied identifier and may be the session
    /// placeholder; `session_user` is the authenticated principal, if any.
    #[instrument(skip(self))]
    pub async fn toggle_reaction(
        &self,
        user: &str,
        session_user: Option<Snowflake>,
        post_id: Snowflake,
        kind: ReactionKind,
    ) -> ServiceResult<PostStats> {
        let user_id = resolve_user_id(user, session_user)?;
        self.run_with_timeout(user_id, post_id, ReactionOp::Toggle(kind))
            .await
    }

    /// Ensure the pair holds `kind`, replacing an opposite-kind reaction if
    /// one is present. Idempotent. Returns the refreshed counters.
    #[instrument(skip(self))]
    pub async fn add_reaction(
        &self,
        user: &str,
        session_user: Option<Snowflake>,
        post_id: Snowflake,
        kind: ReactionKind,
    ) -> ServiceResult<PostStats> {
        let user_id = resolve_user_id(user, session_user)?;
        self.run_with_timeout(user_id, post_id, ReactionOp::Set(kind))
            .await
    }

    /// Ensure the pair does not hold `kind`. Never touches the opposite
    /// kind. Idempotent. Returns the refreshed counters.
    #[instrument(skip(self))]
    pub async fn remove_reaction(
        &self,
        user: &str,
        session_user: Option<Snowflake>,
        post_id: Snowflake,
        kind: ReactionKind,
    ) -> ServiceResult<PostStats> {
        let user_id = resolve_user_id(user, session_user)?;
        self.run_with_timeout(user_id, post_id, ReactionOp::Clear(kind))
            .await
    }

    /// Run a write on a detached task bounded by the configured deadline.
    ///
    /// The transition must never be abandoned half-applied, so the work is
    /// spawned rather than run inline: dropping this future (client
    /// disconnect) or hitting the deadline leaves the spawned task running
    /// to completion, after which it releases the pair lock.
    async fn run_with_timeout(
        &self,
        user_id: Snowflake,
        post_id: Snowflake,
        op: ReactionOp,
    ) -> ServiceResult<PostStats> {
        let ctx = self.ctx.clone();
        let deadline = ctx.op_timeout();
        let task =
            tokio::spawn(async move { run_transition(&ctx, user_id, post_id, op).await });

        match tokio::time::timeout(deadline, task).await {
            Ok(joined) => joined.unwrap_or_else(|e| {
                Err(ServiceError::internal(format!(
                    "reaction task panicked: {e}"
                )))
            }),
            Err(_) => {
                warn!(
                    user_id = %user_id,
                    post_id = %post_id,
                    timeout_ms = deadline.as_millis() as u64,
                    "Reaction operation timed out, transition continues in the background"
                );
                Err(ServiceError::Timeout(deadline))
            }
        }
    }

    // === Read operations ===

    /// Check whether the user currently holds `kind` on the post
    #[instrument(skip(self))]
    pub async fn has_user_reacted(
        &self,
        user: &str,
        session_user: Option<Snowflake>,
        post_id: Snowflake,
        kind: ReactionKind,
    ) -> ServiceResult<bool> {
        let user_id = resolve_user_id(user, session_user)?;
        self.ensure_post_exists(post_id).await?;

        let reacted = self
            .ctx
            .reaction_repo()
            .exists(user_id, post_id, kind)
            .await?;
        Ok(reacted)
    }

    /// Count reactions of one kind on a post
    #[instrument(skip(self))]
    pub async fn count_reactions(
        &self,
        post_id: Snowflake,
        kind: ReactionKind,
    ) -> ServiceResult<i64> {
        self.ensure_post_exists(post_id).await?;

        let count = self
            .ctx
            .reaction_repo()
            .count_for_post(post_id, kind)
            .await?;
        Ok(count)
    }

    /// Posts the user reacted to with `kind`, newest reaction first.
    ///
    /// IDs whose post has vanished are skipped.
    #[instrument(skip(self))]
    pub async fn list_posts_reacted_by_user(
        &self,
        user: &str,
        session_user: Option<Snowflake>,
        kind: ReactionKind,
        limit: i64,
    ) -> ServiceResult<Vec<Post>> {
        let user_id = resolve_user_id(user, session_user)?;
        let post_ids = self
            .ctx
            .reaction_repo()
            .list_post_ids_by_user(user_id, kind, limit)
            .await?;

        let mut posts = Vec::with_capacity(post_ids.len());
        for post_id in post_ids {
            if let Some(post) = self.ctx.post_repo().find_by_id(post_id).await? {
                posts.push(post);
            }
        }
        Ok(posts)
    }

    /// Users who reacted to the post with `kind`, newest reaction first.
    ///
    /// IDs whose user has vanished are skipped.
    #[instrument(skip(self))]
    pub async fn list_users_reacting_to_post(
        &self,
        post_id: Snowflake,
        kind: ReactionKind,
        limit: i64,
    ) -> ServiceResult<Vec<User>> {
        self.ensure_post_exists(post_id).await?;

        let user_ids = self
            .ctx
            .reaction_repo()
            .list_user_ids_by_post(post_id, kind, limit)
            .await?;

        let mut users = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            if let Some(user) = self.ctx.user_repo().find_by_id(user_id).await? {
                users.push(user);
            }
        }
        Ok(users)
    }

    async fn ensure_post_exists(&self, post_id: Snowflake) -> ServiceResult<()> {
        if self.ctx.post_repo().find_by_id(post_id).await?.is_none() {
            return Err(ServiceError::not_found("Post", post_id.to_string()));
        }
        Ok(())
    }
}

/// Execute one write operation under the pair lock.
///
/// The lock is held from before the state read until the counter refresh
/// has finished, so concurrent writers on the same pair always observe each
/// other's completed transitions.
#[instrument(skip(ctx))]
async fn run_transition(
    ctx: &ServiceContext,
    user_id: Snowflake,
    post_id: Snowflake,
    op: ReactionOp,
) -> ServiceResult<PostStats> {
    let _pair_guard = ctx
        .pair_locks()
        .lock((user_id.into_inner(), post_id.into_inner()))
        .await;

    if ctx.post_repo().find_by_id(post_id).await?.is_none() {
        return Err(ServiceError::not_found("Post", post_id.to_string()));
    }

    let has_like = ctx
        .reaction_repo()
        .exists(user_id, post_id, ReactionKind::Like)
        .await?;
    let has_dislike = ctx
        .reaction_repo()
        .exists(user_id, post_id, ReactionKind::Dislike)
        .await?;
    let state = ReactionState::from_existing(has_like, has_dislike);

    let transition = op.apply(state);
    apply_transition(ctx, user_id, post_id, &transition).await?;

    info!(
        user_id = %user_id,
        post_id = %post_id,
        next_state = ?transition.next,
        "Reaction transition applied"
    );

    StatsService::new(ctx).refresh_post_stats(post_id).await
}

/// Apply the delete/insert half-steps of a transition.
///
/// Losing a race to an equivalent writer is benign on both halves: the
/// missing record on delete and the present record on insert mean the end
/// state is already what this transition wanted. Any other insert failure
/// gets one retry; if that also fails the delete half may stand alone, and
/// the error tells the caller to retry the whole operation, which re-reads
/// truth under the lock. The counters are not refreshed on that path.
async fn apply_transition(
    ctx: &ServiceContext,
    user_id: Snowflake,
    post_id: Snowflake,
    transition: &Transition,
) -> ServiceResult<()> {
    if let Some(kind) = transition.remove {
        match ctx.reaction_repo().delete(user_id, post_id, kind).await {
            Ok(()) | Err(DomainError::ReactionNotFound) => {}
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(kind) = transition.insert {
        let reaction = Reaction::new(user_id, post_id, kind);
        match ctx.reaction_repo().insert(&reaction).await {
            Ok(()) | Err(DomainError::ReactionAlreadyExists) => {}
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    post_id = %post_id,
                    kind = %kind,
                    error = %e,
                    "Reaction insert failed, retrying once"
                );
                match ctx.reaction_repo().insert(&reaction).await {
                    Ok(()) | Err(DomainError::ReactionAlreadyExists) => {}
                    Err(retry_err) => {
                        error!(
                            user_id = %user_id,
                            post_id = %post_id,
                            kind = %kind,
                            error = %retry_err,
                            "Reaction insert retry failed, pair left without its record"
                        );
                        return Err(ServiceError::PartialToggle { post_id });
                    }
                }
            }
        }
    }

    Ok(())
}
