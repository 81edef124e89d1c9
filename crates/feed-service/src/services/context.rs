//! Service context - dependency container for services
//!
//! Holds the repositories, lock tables, and other dependencies needed by services.

use std::sync::Arc;
use std::time::Duration;

use feed_common::auth::JwtService;
use feed_core::traits::{PostRepository, ReactionRepository, UserRepository};
use feed_core::SnowflakeGenerator;
use feed_db::PgPool;

use super::locks::KeyedMutex;

/// Default deadline for a reaction write operation.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Storage repositories (PostgreSQL or in-memory)
/// - JWT service for authentication
/// - Snowflake generator for ID generation
/// - Lock tables that serialize reaction writes per (user, post) pair
///   and aggregate refreshes per post
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool (absent when running on the in-memory backend)
    pool: Option<PgPool>,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,

    // Lock tables
    pair_locks: KeyedMutex<(i64, i64)>,
    post_locks: KeyedMutex<i64>,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,

    // Deadline applied to reaction write operations
    op_timeout: Duration,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        pool: Option<PgPool>,
        user_repo: Arc<dyn UserRepository>,
        post_repo: Arc<dyn PostRepository>,
        reaction_repo: Arc<dyn ReactionRepository>,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        op_timeout: Duration,
    ) -> Self {
        Self {
            pool,
            user_repo,
            post_repo,
            reaction_repo,
            pair_locks: KeyedMutex::new(),
            post_locks: KeyedMutex::new(),
            jwt_service,
            snowflake_generator,
            op_timeout,
        }
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool, if the context is backed by one
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    // === Lock Tables ===

    /// Get the lock table keyed by (user_id, post_id)
    ///
    /// Every reaction write holds this lock from before the state read
    /// until after the aggregate refresh.
    pub fn pair_locks(&self) -> &KeyedMutex<(i64, i64)> {
        &self.pair_locks
    }

    /// Get the lock table keyed by post_id
    ///
    /// Serializes aggregate refreshes for a post. Always acquired after
    /// the pair lock, never before it.
    pub fn post_locks(&self) -> &KeyedMutex<i64> {
        &self.post_locks
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> feed_core::Snowflake {
        self.snowflake_generator.generate()
    }

    /// Get the deadline applied to reaction write operations
    pub fn op_timeout(&self) -> Duration {
        self.op_timeout
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("pair_locks", &self.pair_locks.len())
            .field("post_locks", &self.post_locks.len())
            .field("op_timeout", &self.op_timeout)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    op_timeout: Option<Duration>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            user_repo: None,
            post_repo: None,
            reaction_repo: None,
            jwt_service: None,
            snowflake_generator: None,
            op_timeout: None,
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn op_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = Some(timeout);
        self
    }

    /// Build the ServiceContext
    ///
    /// The pool is optional (the in-memory backend runs without one) and
    /// the operation timeout falls back to [`DEFAULT_OP_TIMEOUT`].
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.pool,
            self.user_repo.ok_or_else(|| super::error::ServiceError::validation("user_repo is required"))?,
            self.post_repo.ok_or_else(|| super::error::ServiceError::validation("post_repo is required"))?,
            self.reaction_repo.ok_or_else(|| super::error::ServiceError::validation("reaction_repo is required"))?,
            self.jwt_service.ok_or_else(|| super::error::ServiceError::validation("jwt_service is required"))?,
            self.snowflake_generator.ok_or_else(|| super::error::ServiceError::validation("snowflake_generator is required"))?,
            self.op_timeout.unwrap_or(DEFAULT_OP_TIMEOUT),
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_db::{MemPostRepository, MemReactionRepository, MemUserRepository};

    fn builder_with_repos() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
            .user_repo(Arc::new(MemUserRepository::new()))
            .post_repo(Arc::new(MemPostRepository::new()))
            .reaction_repo(Arc::new(MemReactionRepository::new()))
            .jwt_service(Arc::new(JwtService::new("test-secret", 900)))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
    }

    #[test]
    fn test_build_without_pool_succeeds() {
        let ctx = builder_with_repos().build().unwrap();
        assert!(ctx.pool().is_none());
        assert_eq!(ctx.op_timeout(), DEFAULT_OP_TIMEOUT);
    }

    #[test]
    fn test_build_without_repo_fails() {
        let result = ServiceContextBuilder::new()
            .jwt_service(Arc::new(JwtService::new("test-secret", 900)))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_custom_op_timeout() {
        let ctx = builder_with_repos()
            .op_timeout(Duration::from_millis(250))
            .build()
            .unwrap();

        assert_eq!(ctx.op_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let ctx = builder_with_repos().build().unwrap();
        let a = ctx.generate_id();
        let b = ctx.generate_id();
        assert_ne!(a, b);
    }
}
