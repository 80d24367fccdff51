//! # searchbox-rest - Algolia-compatible search API
//!
//! This crate exposes the Searchbox engine over HTTP in the shape
//! InstantSearch clients expect: a batch of search requests in, a
//! `{ "results": [...] }` envelope out.
//!
//! ## Features
//!
//! - **Batch search**: up to 15 searches per HTTP request, run concurrently
//! - **Facet-value search**: `type: "facet"` requests against `searchable()` facets
//! - **Health probes**: `/health`, `/_liveness`, `/_readiness`
//! - **Middleware**: tracing, timeouts, body limit, CORS, request ids
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use searchbox_persistence::backends::postgres::{PostgresConfig, PostgresExecutor};
//! use searchbox_persistence::{IndexConfigs, SearchEngine};
//! use searchbox_rest::{create_app, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let executor = PostgresExecutor::connect(PostgresConfig::from_env()).await?;
//!     let engine = SearchEngine::new(Arc::new(executor), IndexConfigs::default());
//!
//!     let app = create_app(engine);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error responses
//!
//! Errors are `{ "error": "<message>" }`. Rejected requests are `400`;
//! database and other failures are `500` with a fixed message. See
//! [`error`].

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use axum::{Router, extract::DefaultBodyLimit, http::StatusCode};
use searchbox_persistence::core::{SearchEngine, SearchExecutor};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<E>(engine: SearchEngine<E>) -> Router
where
    E: SearchExecutor + 'static,
{
    create_app_with_config(engine, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Sets up the routes, the body limit, tracing, timeout, request id and CORS
/// layers.
pub fn create_app_with_config<E>(engine: SearchEngine<E>, config: ServerConfig) -> Router
where
    E: SearchExecutor + 'static,
{
    info!(
        backend = engine.executor().backend_name(),
        index_configs = engine.configs().len(),
        max_requests_per_batch = config.max_requests_per_batch,
        "Creating search API server"
    );

    let state = AppState::new(engine, config.clone());
    let router = routing::create_routes(state).layer(DefaultBodyLimit::max(config.max_body_size));

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    let router = router.layer(service_builder);

    if config.enable_request_id {
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    } else {
        router
    }
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// Call once at startup. `RUST_LOG` overrides `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "searchbox={level},searchbox_rest={level},searchbox_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
