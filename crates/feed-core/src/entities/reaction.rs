//! Reaction entity - represents a user's like or dislike on a post
//!
//! A (user, post) pair holds at most one reaction across both kinds. Kind
//! changes are modeled as delete + insert, never update-in-place, and the
//! legal changes are captured by the [`ReactionState`] transition methods.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// The two mutually exclusive reaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    /// Wire and storage representation
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }

    /// The other kind
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing a ReactionKind from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReactionKindParseError {
    #[error("invalid reaction kind (expected \"like\" or \"dislike\")")]
    InvalidKind,
}

impl FromStr for ReactionKind {
    type Err = ReactionKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            _ => Err(ReactionKindParseError::InvalidKind),
        }
    }
}

/// Reaction entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub user_id: Snowflake,
    pub post_id: Snowflake,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(user_id: Snowflake, post_id: Snowflake, kind: ReactionKind) -> Self {
        Self {
            user_id,
            post_id,
            kind,
            created_at: Utc::now(),
        }
    }

    /// Check if the reaction is of a specific kind
    #[inline]
    pub fn is_kind(&self, kind: ReactionKind) -> bool {
        self.kind == kind
    }
}

/// Derived reaction state of a (user, post) pair; never persisted as such
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReactionState {
    #[default]
    None,
    Liked,
    Disliked,
}

impl ReactionState {
    /// Derive the state from per-kind existence checks.
    ///
    /// A Like record wins over a Dislike record should both exist; that
    /// situation violates the pair invariant and is repaired by the next
    /// transition through [`ReactionState::toggle`].
    pub fn from_existing(has_like: bool, has_dislike: bool) -> Self {
        if has_like {
            Self::Liked
        } else if has_dislike {
            Self::Disliked
        } else {
            Self::None
        }
    }

    /// The state a pair is in after reacting with `kind`
    pub fn reacted(kind: ReactionKind) -> Self {
        match kind {
            ReactionKind::Like => Self::Liked,
            ReactionKind::Dislike => Self::Disliked,
        }
    }

    /// The kind currently held, if any
    pub fn kind(self) -> Option<ReactionKind> {
        match self {
            Self::None => None,
            Self::Liked => Some(ReactionKind::Like),
            Self::Disliked => Some(ReactionKind::Dislike),
        }
    }

    /// Compute the transition for a toggle of `kind`.
    ///
    /// Toggling the held kind clears it; toggling the other kind switches
    /// to it; toggling from no reaction sets it.
    pub fn toggle(self, kind: ReactionKind) -> Transition {
        match self.kind() {
            Some(current) if current == kind => Transition {
                remove: Some(kind),
                insert: None,
                next: Self::None,
            },
            Some(current) => Transition {
                remove: Some(current),
                insert: Some(kind),
                next: Self::reacted(kind),
            },
            None => Transition {
                remove: None,
                insert: Some(kind),
                next: Self::reacted(kind),
            },
        }
    }

    /// Compute the transition that ensures the pair holds `kind`.
    ///
    /// Idempotent: setting the already-held kind is a no-op transition.
    pub fn set(self, kind: ReactionKind) -> Transition {
        match self.kind() {
            Some(current) if current == kind => Transition::noop(self),
            Some(current) => Transition {
                remove: Some(current),
                insert: Some(kind),
                next: Self::reacted(kind),
            },
            None => Transition {
                remove: None,
                insert: Some(kind),
                next: Self::reacted(kind),
            },
        }
    }

    /// Compute the transition that ensures the pair does not hold `kind`.
    ///
    /// Idempotent, and it never touches the opposite kind.
    pub fn clear(self, kind: ReactionKind) -> Transition {
        match self.kind() {
            Some(current) if current == kind => Transition {
                remove: Some(kind),
                insert: None,
                next: Self::None,
            },
            _ => Transition::noop(self),
        }
    }
}

/// A computed state change: which record to remove, which to insert, and the
/// state the pair lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub remove: Option<ReactionKind>,
    pub insert: Option<ReactionKind>,
    pub next: ReactionState,
}

impl Transition {
    /// A transition that changes nothing
    pub fn noop(state: ReactionState) -> Self {
        Self {
            remove: None,
            insert: None,
            next: state,
        }
    }

    /// Check if the transition performs no writes
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.remove.is_none() && self.insert.is_none()
    }
}
