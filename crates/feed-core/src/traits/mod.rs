//! Repository traits (ports) for the storage layer

mod repositories;

pub use repositories::{PostRepository, ReactionRepository, RepoResult, UserRepository};
