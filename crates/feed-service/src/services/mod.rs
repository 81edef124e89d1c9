//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod auth;
pub mod context;
pub mod error;
pub mod identity;
pub mod locks;
pub mod post;
pub mod reaction;
pub mod stats;

// Re-export all services for convenience
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder, DEFAULT_OP_TIMEOUT};
pub use error::{ServiceError, ServiceResult};
pub use identity::{resolve_user_id, SESSION_PLACEHOLDER};
pub use locks::KeyedMutex;
pub use post::PostService;
pub use reaction::ReactionService;
pub use stats::{StatsService, STATS_REFRESH_ATTEMPTS};
