//! Health check endpoint handler.
//!
//! Exempt from tenant resolution so load balancers can probe it on any host.

use atrium_persistence::core::Backend;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Backend reachable
/// - `503 Service Unavailable` - Backend check failed
pub async fn health_handler<B: Backend>(State(state): State<AppState<B>>) -> Response {
    debug!("Processing health check request");

    let backend = state.backend();
    let (status, label) = match backend.health_check().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            warn!(backend = backend.name(), error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    let body = serde_json::json!({
        "status": label,
        "backend": backend.name(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status, Json(body)).into_response()
}
