//! # feed-db
//!
//! Storage layer implementing the repository traits from `feed-core`.
//!
//! ## Overview
//!
//! Two interchangeable backends:
//!
//! - PostgreSQL via SQLx: connection pool, `FromRow` models, mappers,
//!   and repository implementations
//! - In-memory via concurrent maps, with identical error contracts
//!
//! Reaction writes are point operations on single records in both
//! backends. There is deliberately no transactional write path; callers
//! serialize conflicting writers themselves.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use feed_db::pool::{create_pool, DatabaseConfig};
//! use feed_db::repositories::PgReactionRepository;
//! use feed_core::traits::ReactionRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::default();
//!     let pool = create_pool(&config).await?;
//!     let reactions = PgReactionRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{MemPostRepository, MemReactionRepository, MemUserRepository};
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgPostRepository, PgReactionRepository, PgUserRepository};
