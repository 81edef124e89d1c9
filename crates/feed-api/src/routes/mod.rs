//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{routing::{get, post, put}, Router};

use crate::handlers::{auth, health, posts, reactions};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        // API v1 endpoints
        .nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(post_routes())
        .merge(reaction_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

/// Post routes
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(posts::create_post))
        .route("/posts/:post_id", get(posts::get_post))
        // Post-scoped reaction reads
        .route(
            "/posts/:post_id/reactions/:kind/users",
            get(reactions::get_reaction_users),
        )
        .route(
            "/posts/:post_id/reactions/:kind/count",
            get(reactions::get_reaction_count),
        )
}

/// Reaction routes scoped to a (user, post) pair
fn reaction_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/:user_id/posts/:post_id/reactions/:kind",
            put(reactions::toggle_reaction)
                .post(reactions::set_reaction)
                .delete(reactions::clear_reaction)
                .get(reactions::get_reaction_status),
        )
        .route(
            "/users/:user_id/reactions/:kind/posts",
            get(reactions::get_reacted_posts),
        )
}
