//! Tenant identification middleware.
//!
//! Resolves the tenant from the request host and attaches a
//! [`TenantContext`] to the request extensions before any tenant-scoped
//! handler runs. Paths on the skip list pass through untouched.

use std::sync::Arc;

use atrium_persistence::tenant::TenantContext;
use axum::{
    extract::{Request, State},
    http::header::HeaderName,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestError;
use crate::tenant::{RequestTenantExt, Resolution, TenantResolver};

/// Header carrying the request correlation id.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Middleware function for tenant resolution.
///
/// Use with `axum::middleware::from_fn_with_state` and a shared
/// [`TenantResolver`].
pub async fn tenant_middleware(
    State(resolver): State<Arc<TenantResolver>>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let schema = match resolver.resolve(&parts) {
        Ok(Resolution::Skipped) => {
            return next.run(Request::from_parts(parts, body)).await;
        }
        Ok(Resolution::Resolved(schema)) => schema,
        Err(e) => return e.into_response(),
    };

    let mut ctx = TenantContext::new(schema);
    if let Some(id) = parts
        .headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
    {
        ctx = ctx.with_correlation_id(id);
    }
    debug!(
        tenant = %ctx.schema(),
        correlation_id = ctx.correlation_id().unwrap_or("-"),
        path = %parts.uri.path(),
        "Resolved tenant"
    );

    if let Err(e) = parts.extensions.set_tenant(ctx) {
        return RestError::from(e).into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}
