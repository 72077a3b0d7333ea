//! # Kickoff API
//!
//! The API crate provides the web server implementation for the Kickoff
//! pursuit-coordination service. It defines RESTful endpoints for managing
//! pursuits, availability proposals, kickoff scheduling, and notifications.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Provide cross-cutting concerns like password checks and error handling
//! - **Notifier**: Background dispatcher that delivers queued notifications
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for password checks and error handling
pub mod middleware;
/// Background notification dispatcher
pub mod notifier;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// This struct encapsulates dependencies that are shared across the
/// application. Handlers receive it by reference through Axum's state
/// extractor; nothing here is reachable through globals.
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
}

/// Starts the API server with the provided configuration and database connection
///
/// This function initializes logging, configures routes, spawns the
/// background notification dispatcher, and runs the HTTP server. The
/// dispatcher is stopped explicitly when the server loop exits.
///
/// # Arguments
///
/// * `config` - API configuration including host, port, and other settings
/// * `db_pool` - PostgreSQL connection pool for database operations
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let state = Arc::new(ApiState {
        db_pool: db_pool.clone(),
    });

    // Build the application router with all routes
    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Pursuit management endpoints
        .merge(routes::pursuit::routes())
        // Availability proposal endpoints
        .merge(routes::proposal::routes())
        // Kickoff ranking and scheduling endpoints
        .merge(routes::kickoff::routes())
        // Notification inbox endpoints
        .merge(routes::notification::routes())
        // Attach shared state to all routes
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(
                origins
                    .iter()
                    .filter_map(|origin| origin.parse().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(tower_http::timeout::TimeoutLayer::new(
        std::time::Duration::from_secs(config.request_timeout),
    ));

    // Start the background notification dispatcher
    let dispatcher = notifier::Dispatcher::spawn(
        db_pool,
        std::time::Duration::from_secs(config.notify_interval),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    let served = axum::serve(listener, app).await;

    // Stop the dispatcher before returning so no timer outlives the server,
    // whether the serve loop exited cleanly or with an error
    dispatcher.stop().await;
    served?;

    Ok(())
}
