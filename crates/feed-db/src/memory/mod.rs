//! In-memory repository implementations
//!
//! A complete storage backend on concurrent maps. Used by tests and by
//! deployments that select `DATABASE_BACKEND=memory`; it reports the same
//! conflict and missing-record errors as the PostgreSQL backend, so the
//! application layer behaves identically on both.

mod post;
mod reaction;
mod user;

pub use post::MemPostRepository;
pub use reaction::MemReactionRepository;
pub use user::MemUserRepository;
