//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use feed_common::{AppConfig, AppError, JwtService, StoreBackend};
use feed_core::SnowflakeGenerator;
use feed_db::{
    create_pool, run_migrations, MemPostRepository, MemReactionRepository, MemUserRepository,
    PgPostRepository, PgReactionRepository, PgUserRepository,
};
use feed_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(
        router,
        &state.config().cors,
        state.config().app.environment.is_production(),
    );
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create JWT service
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));

    // Create Snowflake generator
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let mut builder = ServiceContextBuilder::new()
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .op_timeout(config.reactions.op_timeout());

    // Wire up the configured storage backend
    match config.database.backend {
        StoreBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let url = config.database.url.clone().ok_or_else(|| {
                AppError::Config("DATABASE_URL is required for the postgres backend".to_string())
            })?;
            let db_config = feed_db::DatabaseConfig {
                url,
                max_connections: config.database.max_connections,
                min_connections: config.database.min_connections,
                ..Default::default()
            };
            let pool = create_pool(&db_config)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");

            run_migrations(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("Database migrations applied");

            builder = builder
                .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
                .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
                .reaction_repo(Arc::new(PgReactionRepository::new(pool.clone())))
                .pool(pool);
        }
        StoreBackend::Memory => {
            info!("Using in-memory storage backend");
            builder = builder
                .user_repo(Arc::new(MemUserRepository::new()))
                .post_repo(Arc::new(MemPostRepository::new()))
                .reaction_repo(Arc::new(MemReactionRepository::new()));
        }
    }

    // Build service context
    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config.api.address().parse().map_err(|e| {
        AppError::Config(format!("Invalid bind address {}: {}", config.api.address(), e))
    })?;

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
