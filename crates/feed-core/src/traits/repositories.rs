//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Reaction operations are deliberately point
//! operations on single records or single-index scans: implementations must
//! not assume multi-record transactions, because the application layer's
//! pair-scoped locking is the correctness mechanism.

use async_trait::async_trait;

use crate::entities::{Post, PostStats, Reaction, ReactionKind, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    /// Create a new post
    async fn create(&self, post: &Post) -> RepoResult<()>;

    /// Write the denormalized reaction counters onto the post record.
    ///
    /// Fails with `PostNotFound` if the post no longer exists.
    async fn update_stats(&self, post_id: Snowflake, stats: &PostStats) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Check whether the exact (user, post, kind) record exists
    async fn exists(
        &self,
        user_id: Snowflake,
        post_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<bool>;

    /// Insert a reaction record.
    ///
    /// Fails with `ReactionAlreadyExists` when the exact triple is present;
    /// that failure is the idempotency guard racing writers rely on.
    async fn insert(&self, reaction: &Reaction) -> RepoResult<()>;

    /// Delete a reaction record.
    ///
    /// Fails with `ReactionNotFound` when absent; during a transition the
    /// caller treats that as a benign lost race.
    async fn delete(
        &self,
        user_id: Snowflake,
        post_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<()>;

    /// Count reactions of one kind on a post
    async fn count_for_post(&self, post_id: Snowflake, kind: ReactionKind) -> RepoResult<i64>;

    /// IDs of posts a user reacted to with `kind`, newest first
    async fn list_post_ids_by_user(
        &self,
        user_id: Snowflake,
        kind: ReactionKind,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>>;

    /// IDs of users who reacted to a post with `kind`, newest first
    async fn list_user_ids_by_post(
        &self,
        post_id: Snowflake,
        kind: ReactionKind,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>>;
}
