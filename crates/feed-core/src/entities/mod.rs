//! Domain entities - core business objects

mod post;
mod reaction;
mod user;

pub use post::{Post, PostStats, MAX_CONTENT_LENGTH};
pub use reaction::{Reaction, ReactionKind, ReactionKindParseError, ReactionState, Transition};
pub use user::User;
