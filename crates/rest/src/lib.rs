//! # atrium-rest - HTTP surface for the Atrium multi-tenant backend
//!
//! Every request is attributed to one tenant by the subdomain of its host,
//! and every book operation runs inside a schema scope bound to that tenant.
//! Tenant-management routes bypass resolution and drive the provisioning and
//! decommissioning workflows.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use atrium_persistence::backends::sqlite::SqliteBackend;
//! use atrium_persistence::core::Backend;
//! use atrium_rest::{Server, ServerConfig, create_app_with_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SqliteBackend::open("./data")?;
//!     backend.initialize().await?;
//!
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(Arc::new(backend), config.clone());
//!     Server::init(app, &config).await?.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Method | Path | Tenant-scoped |
//! |--------|------|---------------|
//! | POST | `/tenants` | no |
//! | GET | `/tenants/{id}` | no |
//! | DELETE | `/tenants/{id}` | no |
//! | GET | `/health` | no |
//! | GET | `/books` | yes |
//! | POST | `/books` | yes |
//! | GET | `/books/{id}` | yes |
//! | PUT | `/books/{id}` | yes |
//! | DELETE | `/books/{id}` | yes |
//!
//! ## Error Handling
//!
//! Errors are returned as `{"status", "code", "message"}` JSON bodies; see
//! [`error`] for the status mapping.
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`error`] - Error types and their HTTP mapping
//! - [`state`] - Application state (backend, gateway, lifecycle)
//! - [`tenant`] - Host-based tenant resolution and per-request storage
//! - [`middleware`] - Tenant resolution middleware
//! - [`extractors`] - Axum extractors
//! - [`handlers`] - HTTP request handlers
//! - [`routing`] - Route configuration
//! - [`server`] - Bind, run and graceful shutdown

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod server;
pub mod state;
pub mod tenant;

// Re-export commonly used types
pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use server::{Server, ServerError, ShutdownHandle, shutdown_signal};
pub use state::AppState;

use std::any::Any;
use std::sync::Arc;

use atrium_persistence::core::Backend;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<B: Backend>(backend: Arc<B>) -> Router {
    create_app_with_config(backend, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Sets up the routes, tenant resolution, and the middleware stack: request
/// ids, access tracing, panic recovery, request timeout, body limit and CORS.
pub fn create_app_with_config<B: Backend>(backend: Arc<B>, config: ServerConfig) -> Router {
    info!(
        "Creating API server with backend: {}",
        backend.name()
    );

    let state = AppState::new(backend, config.clone());
    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(axum::middleware::map_response(timeout_response))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(DefaultBodyLimit::max(config.max_body_size));

    let router = router.layer(service_builder);

    // Request ids are set outside tracing and tenant resolution so both see them
    let router = if config.enable_request_id {
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    } else {
        router
    };

    if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    }
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    if config.cors_origins == "*" {
        cors.allow_origin(AnyOrigin)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Gives the timeout layer's bare 408 the API's error body.
async fn timeout_response(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        return RestError::Timeout.into_response();
    }
    response
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");

    RestError::InternalError {
        message: "handler panicked".to_string(),
    }
    .into_response()
}

/// Initializes the tracing subscriber for logging.
///
/// Call once at startup. `RUST_LOG` overrides `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "atrium={level},atrium_rest={level},atrium_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
