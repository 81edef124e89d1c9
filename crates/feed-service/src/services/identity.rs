//! Caller identity resolution
//!
//! Reaction routes carry the acting user in the path. The segment is
//! either a numeric user ID or the literal placeholder below, which
//! defers to the authenticated session.

use feed_core::Snowflake;

use super::error::{ServiceError, ServiceResult};

/// Path segment that stands in for "the user behind this session"
pub const SESSION_PLACEHOLDER: &str = "session";

/// Resolve a path-supplied user identifier to a concrete user ID
///
/// # Errors
/// Returns `ServiceError::Unauthenticated` when the placeholder is used
/// without a session, and a validation error when the segment is neither
/// the placeholder nor a numeric ID.
pub fn resolve_user_id(
    supplied: &str,
    session_user: Option<Snowflake>,
) -> ServiceResult<Snowflake> {
    if supplied == SESSION_PLACEHOLDER {
        return session_user.ok_or(ServiceError::Unauthenticated);
    }

    supplied
        .parse()
        .map_err(|_| ServiceError::validation(format!("Invalid user identifier: {supplied}")))
}
