//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in feed-core.
//! Each repository handles database operations for a specific domain entity.

mod error;
mod post;
mod reaction;
mod user;

pub use post::PgPostRepository;
pub use reaction::PgReactionRepository;
pub use user::PgUserRepository;
