//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use feed_common::auth::AccessToken;
use feed_core::{PostStats, ReactionKind, Snowflake};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with access token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

impl AuthResponse {
    pub fn new(token: AccessToken, user: CurrentUserResponse) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            user,
        }
    }
}

// ============================================================================
// User Responses
// ============================================================================

/// Current authenticated user response (includes email)
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Public user response (for viewing other users)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Post Responses
// ============================================================================

/// Post response with its reaction counters
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub content: String,
    pub like_count: i64,
    pub dislike_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Reaction Responses
// ============================================================================

/// Refreshed reaction counters returned by every reaction write
#[derive(Debug, Clone, Serialize)]
pub struct PostStatsResponse {
    pub post_id: String,
    pub like_count: i64,
    pub dislike_count: i64,
}

impl PostStatsResponse {
    pub fn new(post_id: Snowflake, stats: PostStats) -> Self {
        Self {
            post_id: post_id.to_string(),
            like_count: stats.like_count,
            dislike_count: stats.dislike_count,
        }
    }
}

/// Whether a user currently holds a reaction on a post
#[derive(Debug, Clone, Serialize)]
pub struct ReactionStatusResponse {
    pub reacted: bool,
}

/// Count of one reaction kind on a post
#[derive(Debug, Clone, Serialize)]
pub struct ReactionCountResponse {
    pub post_id: String,
    pub kind: String,
    pub count: i64,
}

impl ReactionCountResponse {
    pub fn new(post_id: Snowflake, kind: ReactionKind, count: i64) -> Self {
        Self {
            post_id: post_id.to_string(),
            kind: kind.as_str().to_string(),
            count,
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
