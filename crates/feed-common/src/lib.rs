//! # feed-common
//!
//! Shared infrastructure for the feed server: authentication primitives,
//! configuration loading, application errors, and tracing setup.
//!
//! This crate sits between `feed-core` (pure domain) and the service/API
//! layers. It may depend on `feed-core` but never the other way around.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types
pub use auth::{hash_password, verify_password, AccessToken, Claims, JwtService};
pub use config::{AppConfig, ConfigError, CorsConfig, Environment, StoreBackend};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{init_tracing_with_config, try_init_tracing_with_config, TracingConfig};
