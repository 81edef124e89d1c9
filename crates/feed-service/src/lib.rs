//! # feed-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! The reaction write path lives in [`services::ReactionService`]: it owns
//! the per-pair critical section, the detached-task timeout discipline, and
//! the counter refresh that keeps post aggregates equal to the stored
//! reaction records.

pub mod dto;
pub mod services;

// Re-export the request/response surface and services for the API layer
pub use dto::{
    AuthResponse, CreatePostRequest, CurrentUserResponse, HealthResponse, LoginRequest,
    PostResponse, PostStatsResponse, ReactionCountResponse, ReactionStatusResponse,
    ReadinessResponse, RegisterRequest, UserResponse,
};
pub use services::{
    resolve_user_id, AuthService, PostService, ReactionService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, SESSION_PLACEHOLDER,
};
