//! Reaction handlers
//!
//! Endpoints for post reactions. The `user_id` path segment is passed
//! through verbatim: it is either a numeric ID or the `session`
//! placeholder, which the service resolves against the bearer token.

use axum::{
    extract::{Path, State},
    Json,
};
use feed_service::{
    PostResponse, PostStatsResponse, ReactionCountResponse, ReactionService,
    ReactionStatusResponse, UserResponse,
};

use crate::extractors::{OptionalAuthUser, Pagination};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Toggle a reaction on a post
///
/// PUT /users/{user_id}/posts/{post_id}/reactions/{kind}
pub async fn toggle_reaction(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path((user_id, post_id, kind)): Path<(String, String, String)>,
) -> ApiResult<Json<PostStatsResponse>> {
    let post_id = post_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid post_id format"))?;
    let kind = kind
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid reaction kind"))?;

    let service = ReactionService::new(state.service_context());
    let stats = service
        .toggle_reaction(&user_id, auth.user_id(), post_id, kind)
        .await?;
    Ok(Json(PostStatsResponse::new(post_id, stats)))
}

/// Set a reaction on a post, replacing the opposite kind if present
///
/// POST /users/{user_id}/posts/{post_id}/reactions/{kind}
pub async fn set_reaction(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path((user_id, post_id, kind)): Path<(String, String, String)>,
) -> ApiResult<Json<PostStatsResponse>> {
    let post_id = post_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid post_id format"))?;
    let kind = kind
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid reaction kind"))?;

    let service = ReactionService::new(state.service_context());
    let stats = service
        .add_reaction(&user_id, auth.user_id(), post_id, kind)
        .await?;
    Ok(Json(PostStatsResponse::new(post_id, stats)))
}

/// Clear a reaction from a post
///
/// DELETE /users/{user_id}/posts/{post_id}/reactions/{kind}
pub async fn clear_reaction(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path((user_id, post_id, kind)): Path<(String, String, String)>,
) -> ApiResult<Json<PostStatsResponse>> {
    let post_id = post_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid post_id format"))?;
    let kind = kind
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid reaction kind"))?;

    let service = ReactionService::new(state.service_context());
    let stats = service
        .remove_reaction(&user_id, auth.user_id(), post_id, kind)
        .await?;
    Ok(Json(PostStatsResponse::new(post_id, stats)))
}

/// Check whether a user holds a reaction on a post
///
/// GET /users/{user_id}/posts/{post_id}/reactions/{kind}
pub async fn get_reaction_status(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path((user_id, post_id, kind)): Path<(String, String, String)>,
) -> ApiResult<Json<ReactionStatusResponse>> {
    let post_id = post_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid post_id format"))?;
    let kind = kind
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid reaction kind"))?;

    let service = ReactionService::new(state.service_context());
    let reacted = service
        .has_user_reacted(&user_id, auth.user_id(), post_id, kind)
        .await?;
    Ok(Json(ReactionStatusResponse { reacted }))
}

/// List posts a user reacted to with the given kind, newest first
///
/// GET /users/{user_id}/reactions/{kind}/posts
pub async fn get_reacted_posts(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path((user_id, kind)): Path<(String, String)>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let kind = kind
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid reaction kind"))?;

    let service = ReactionService::new(state.service_context());
    let posts = service
        .list_posts_reacted_by_user(&user_id, auth.user_id(), kind, i64::from(pagination.limit))
        .await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// List users who reacted to a post with the given kind, newest first
///
/// GET /posts/{post_id}/reactions/{kind}/users
pub async fn get_reaction_users(
    State(state): State<AppState>,
    Path((post_id, kind)): Path<(String, String)>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let post_id = post_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid post_id format"))?;
    let kind = kind
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid reaction kind"))?;

    let service = ReactionService::new(state.service_context());
    let users = service
        .list_users_reacting_to_post(post_id, kind, i64::from(pagination.limit))
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Count reactions of one kind on a post
///
/// GET /posts/{post_id}/reactions/{kind}/count
pub async fn get_reaction_count(
    State(state): State<AppState>,
    Path((post_id, kind)): Path<(String, String)>,
) -> ApiResult<Json<ReactionCountResponse>> {
    let post_id = post_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid post_id format"))?;
    let kind = kind
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid reaction kind"))?;

    let service = ReactionService::new(state.service_context());
    let count = service.count_reactions(post_id, kind).await?;
    Ok(Json(ReactionCountResponse::new(post_id, kind, count)))
}
