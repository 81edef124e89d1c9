//! API Integration Tests
//!
//! End-to-end tests against a real HTTP server backed by the in-memory
//! storage backend, so no external services are required.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, assert_status, fixtures::*, TestServer};
use reqwest::StatusCode;

/// Register a fresh user and return the auth response
async fn register_user(server: &TestServer) -> AuthResponse {
    let request = RegisterRequest::unique();
    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

/// Create a post authored by the given token's user
async fn create_post(server: &TestServer, token: &str) -> PostResponse {
    let request = CreatePostRequest::unique();
    let response = server.post_auth("/api/v1/posts", token, &request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert!(response.headers().contains_key("x-request-id"));
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = TestServer::start().await.expect("Failed to start server");
    let url = format!("{}/health", server.base_url());
    let response = server
        .client
        .get(&url)
        .header("x-request-id", "test-request-42")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-request-42"
    );
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth.user.username, request.username);
    assert_eq!(auth.user.email, request.email);
    assert_eq!(auth.token_type, "Bearer");
    assert!(!auth.access_token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    // First registration
    server.post("/api/v1/auth/register", &request).await.unwrap();

    // Second registration with same email
    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_register_weak_password() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = RegisterRequest::unique();
    request.password = "alllowercase".to_string();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_login() {
    let server = TestServer::start().await.expect("Failed to start server");

    // Register first
    let register_req = RegisterRequest::unique();
    server.post("/api/v1/auth/register", &register_req).await.unwrap();

    // Login
    let login_req = LoginRequest::from_register(&register_req);
    let response = server.post("/api/v1/auth/login", &login_req).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(auth.user.username, register_req.username);
    assert!(!auth.access_token.is_empty());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let server = TestServer::start().await.expect("Failed to start server");

    let register_req = RegisterRequest::unique();
    server.post("/api/v1/auth/register", &register_req).await.unwrap();

    let login_req = LoginRequest {
        email: register_req.email.clone(),
        password: "WrongPass999".to_string(),
    };
    let response = server.post("/api/v1/auth/login", &login_req).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_login_unknown_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let login_req = LoginRequest {
        email: "nonexistent@example.com".to_string(),
        password: "SomePass123".to_string(),
    };

    let response = server.post("/api/v1/auth/login", &login_req).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Post Tests
// ============================================================================

#[tokio::test]
async fn test_create_post() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;

    let request = CreatePostRequest::with_content("Hello, feed!");
    let response = server
        .post_auth("/api/v1/posts", &auth.access_token, &request)
        .await
        .unwrap();
    let post: PostResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(post.content, "Hello, feed!");
    assert_eq!(post.author_id, auth.user.id);
    assert_eq!(post.like_count, 0);
    assert_eq!(post.dislike_count, 0);
}

#[tokio::test]
async fn test_create_post_requires_auth() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = CreatePostRequest::unique();

    let response = server.post("/api/v1/posts", &request).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_create_post_rejects_oversized_content() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;

    let request = CreatePostRequest::with_content(&"x".repeat(281));
    let response = server
        .post_auth("/api/v1/posts", &auth.access_token, &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_get_post() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;
    let post = create_post(&server, &auth.access_token).await;

    let response = server.get(&format!("/api/v1/posts/{}", post.id)).await.unwrap();
    let fetched: PostResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(fetched.id, post.id);
    assert_eq!(fetched.content, post.content);
}

#[tokio::test]
async fn test_get_post_not_found() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/posts/999999999").await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(error.error.code, "NOT_FOUND");
}

#[tokio::test]
async fn test_get_post_invalid_id() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/posts/not-a-number").await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "INVALID_PATH_PARAMETER");
}

// ============================================================================
// Reaction Toggle Tests
// ============================================================================

#[tokio::test]
async fn test_toggle_creates_and_removes_reaction() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;
    let post = create_post(&server, &auth.access_token).await;

    let path = format!(
        "/api/v1/users/{}/posts/{}/reactions/like",
        auth.user.id, post.id
    );

    // First toggle creates the reaction
    let response = server.put(&path).await.unwrap();
    let stats: PostStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.like_count, 1);
    assert_eq!(stats.dislike_count, 0);

    // Second toggle removes it
    let response = server.put(&path).await.unwrap();
    let stats: PostStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.like_count, 0);
    assert_eq!(stats.dislike_count, 0);
}

#[tokio::test]
async fn test_toggle_switches_between_kinds() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;
    let post = create_post(&server, &auth.access_token).await;

    let like_path = format!(
        "/api/v1/users/{}/posts/{}/reactions/like",
        auth.user.id, post.id
    );
    let dislike_path = format!(
        "/api/v1/users/{}/posts/{}/reactions/dislike",
        auth.user.id, post.id
    );

    // Like the post
    let response = server.put(&like_path).await.unwrap();
    let stats: PostStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((stats.like_count, stats.dislike_count), (1, 0));

    // Toggling dislike replaces the like
    let response = server.put(&dislike_path).await.unwrap();
    let stats: PostStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((stats.like_count, stats.dislike_count), (0, 1));

    // Toggling dislike again leaves no reaction
    let response = server.put(&dislike_path).await.unwrap();
    let stats: PostStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((stats.like_count, stats.dislike_count), (0, 0));
}

#[tokio::test]
async fn test_set_reaction_is_idempotent() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;
    let post = create_post(&server, &auth.access_token).await;

    let like_path = format!(
        "/api/v1/users/{}/posts/{}/reactions/like",
        auth.user.id, post.id
    );

    let response = server.post_empty(&like_path).await.unwrap();
    let stats: PostStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((stats.like_count, stats.dislike_count), (1, 0));

    // Setting again changes nothing
    let response = server.post_empty(&like_path).await.unwrap();
    let stats: PostStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((stats.like_count, stats.dislike_count), (1, 0));

    // Setting the opposite kind replaces the like
    let dislike_path = format!(
        "/api/v1/users/{}/posts/{}/reactions/dislike",
        auth.user.id, post.id
    );
    let response = server.post_empty(&dislike_path).await.unwrap();
    let stats: PostStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((stats.like_count, stats.dislike_count), (0, 1));
}

#[tokio::test]
async fn test_clear_reaction_only_touches_its_kind() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;
    let post = create_post(&server, &auth.access_token).await;

    let like_path = format!(
        "/api/v1/users/{}/posts/{}/reactions/like",
        auth.user.id, post.id
    );
    let dislike_path = format!(
        "/api/v1/users/{}/posts/{}/reactions/dislike",
        auth.user.id, post.id
    );

    server.post_empty(&like_path).await.unwrap();

    // Clearing the kind the user does not hold is a no-op
    let response = server.delete(&dislike_path).await.unwrap();
    let stats: PostStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((stats.like_count, stats.dislike_count), (1, 0));

    // Clearing the held kind removes it
    let response = server.delete(&like_path).await.unwrap();
    let stats: PostStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((stats.like_count, stats.dislike_count), (0, 0));
}

// ============================================================================
// Session Placeholder Tests
// ============================================================================

#[tokio::test]
async fn test_session_placeholder_resolves_to_bearer() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;
    let post = create_post(&server, &auth.access_token).await;

    let session_path = format!("/api/v1/users/session/posts/{}/reactions/like", post.id);
    let response = server.put_auth(&session_path, &auth.access_token).await.unwrap();
    let stats: PostStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.like_count, 1);

    // The reaction is attributed to the session's user
    let explicit_path = format!(
        "/api/v1/users/{}/posts/{}/reactions/like",
        auth.user.id, post.id
    );
    let response = server.get(&explicit_path).await.unwrap();
    let status: ReactionStatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(status.reacted);
}

#[tokio::test]
async fn test_session_placeholder_requires_auth() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;
    let post = create_post(&server, &auth.access_token).await;

    let session_path = format!("/api/v1/users/session/posts/{}/reactions/like", post.id);
    let response = server.put(&session_path).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.error.code, "UNAUTHENTICATED");

    // Nothing was written
    let count_path = format!("/api/v1/posts/{}/reactions/like/count", post.id);
    let response = server.get(&count_path).await.unwrap();
    let count: ReactionCountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(count.count, 0);
}

// ============================================================================
// Reaction Error Tests
// ============================================================================

#[tokio::test]
async fn test_reaction_on_unknown_post() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;

    let path = format!("/api/v1/users/{}/posts/999999999/reactions/like", auth.user.id);
    let response = server.put(&path).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(error.error.code, "NOT_FOUND");
}

#[tokio::test]
async fn test_reaction_invalid_kind() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;
    let post = create_post(&server, &auth.access_token).await;

    let path = format!(
        "/api/v1/users/{}/posts/{}/reactions/love",
        auth.user.id, post.id
    );
    let response = server.put(&path).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_reaction_invalid_user_segment() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;
    let post = create_post(&server, &auth.access_token).await;

    let path = format!("/api/v1/users/not-a-user/posts/{}/reactions/like", post.id);
    let response = server.put(&path).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Reaction Read Tests
// ============================================================================

#[tokio::test]
async fn test_reaction_status_and_count() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;
    let post = create_post(&server, &auth.access_token).await;

    let pair_path = format!(
        "/api/v1/users/{}/posts/{}/reactions/like",
        auth.user.id, post.id
    );
    let count_path = format!("/api/v1/posts/{}/reactions/like/count", post.id);

    // Nothing reacted yet
    let response = server.get(&pair_path).await.unwrap();
    let status: ReactionStatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!status.reacted);

    let response = server.get(&count_path).await.unwrap();
    let count: ReactionCountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(count.count, 0);
    assert_eq!(count.kind, "like");

    // React, then observe
    server.put(&pair_path).await.unwrap();

    let response = server.get(&pair_path).await.unwrap();
    let status: ReactionStatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(status.reacted);

    let response = server.get(&count_path).await.unwrap();
    let count: ReactionCountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(count.count, 1);
}

#[tokio::test]
async fn test_list_posts_reacted_by_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register_user(&server).await;
    let first = create_post(&server, &auth.access_token).await;
    let second = create_post(&server, &auth.access_token).await;

    for post_id in [&first.id, &second.id] {
        let path = format!(
            "/api/v1/users/{}/posts/{}/reactions/like",
            auth.user.id, post_id
        );
        server.put(&path).await.unwrap();
    }

    // Newest reaction first
    let list_path = format!("/api/v1/users/{}/reactions/like/posts", auth.user.id);
    let response = server.get(&list_path).await.unwrap();
    let posts: Vec<PostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, second.id);
    assert_eq!(posts[1].id, first.id);

    // Limit applies
    let response = server.get(&format!("{list_path}?limit=1")).await.unwrap();
    let posts: Vec<PostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, second.id);
}

#[tokio::test]
async fn test_list_users_reacting_to_post() {
    let server = TestServer::start().await.expect("Failed to start server");
    let author = register_user(&server).await;
    let other = register_user(&server).await;
    let post = create_post(&server, &author.access_token).await;

    for user_id in [&author.user.id, &other.user.id] {
        let path = format!(
            "/api/v1/users/{}/posts/{}/reactions/dislike",
            user_id, post.id
        );
        server.put(&path).await.unwrap();
    }

    let list_path = format!("/api/v1/posts/{}/reactions/dislike/users", post.id);
    let response = server.get(&list_path).await.unwrap();
    let users: Vec<UserResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(users.len(), 2);
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert!(ids.contains(&author.user.id.as_str()));
    assert!(ids.contains(&other.user.id.as_str()));
}

// ============================================================================
// Aggregate Consistency Tests
// ============================================================================

#[tokio::test]
async fn test_counters_stay_consistent_across_users() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = register_user(&server).await;
    let bob = register_user(&server).await;
    let post = create_post(&server, &alice.access_token).await;

    // Alice likes, Bob dislikes, then Alice switches to dislike
    let alice_like = format!(
        "/api/v1/users/{}/posts/{}/reactions/like",
        alice.user.id, post.id
    );
    let alice_dislike = format!(
        "/api/v1/users/{}/posts/{}/reactions/dislike",
        alice.user.id, post.id
    );
    let bob_dislike = format!(
        "/api/v1/users/{}/posts/{}/reactions/dislike",
        bob.user.id, post.id
    );

    server.put(&alice_like).await.unwrap();
    server.put(&bob_dislike).await.unwrap();
    let response = server.put(&alice_dislike).await.unwrap();
    let stats: PostStatsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((stats.like_count, stats.dislike_count), (0, 2));

    // Count endpoints agree with the returned stats
    let response = server
        .get(&format!("/api/v1/posts/{}/reactions/like/count", post.id))
        .await
        .unwrap();
    let likes: ReactionCountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(likes.count, 0);

    let response = server
        .get(&format!("/api/v1/posts/{}/reactions/dislike/count", post.id))
        .await
        .unwrap();
    let dislikes: ReactionCountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(dislikes.count, 2);

    // And so does the post itself
    let response = server.get(&format!("/api/v1/posts/{}", post.id)).await.unwrap();
    let fetched: PostResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.like_count, 0);
    assert_eq!(fetched.dislike_count, 2);
}
