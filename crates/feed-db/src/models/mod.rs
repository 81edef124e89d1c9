//! Database models - SQLx-compatible structs for PostgreSQL tables
//!
//! Reactions have no model: no query path reads reaction rows back as
//! entities, only existence flags, counts, and ID scans.

mod post;
mod user;

pub use post::PostModel;
pub use user::UserModel;
