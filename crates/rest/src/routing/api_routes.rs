//! API route configuration.

use std::sync::Arc;

use atrium_persistence::core::Backend;
use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware::tenant_middleware;
use crate::state::AppState;
use crate::tenant::TenantResolver;

/// Creates all API routes with tenant resolution applied.
///
/// # Routes
///
/// ## Tenant management (skipped by tenant resolution)
/// - `POST /tenants` - Provision
/// - `GET /tenants/{id}` - Read
/// - `DELETE /tenants/{id}` - Decommission
/// - `GET /health` - Health check
///
/// ## Tenant-scoped
/// - `GET /books` - List
/// - `POST /books` - Create
/// - `GET /books/{id}` - Read
/// - `PUT /books/{id}` - Update
/// - `DELETE /books/{id}` - Delete
pub fn create_routes<B: Backend>(state: AppState<B>) -> Router {
    let resolver = Arc::new(TenantResolver::from_config(state.config()));

    Router::new()
        // System-level routes
        .route("/health", get(handlers::health_handler::<B>))
        // Tenant management
        .route("/tenants", post(handlers::create_tenant_handler::<B>))
        .route(
            "/tenants/{id}",
            get(handlers::get_tenant_handler::<B>).delete(handlers::delete_tenant_handler::<B>),
        )
        // Tenant-scoped routes
        .route(
            "/books",
            get(handlers::list_books_handler::<B>).post(handlers::create_book_handler::<B>),
        )
        .route(
            "/books/{id}",
            get(handlers::get_book_handler::<B>)
                .put(handlers::update_book_handler::<B>)
                .delete(handlers::delete_book_handler::<B>),
        )
        // State
        .with_state(state)
        .layer(middleware::from_fn_with_state(resolver, tenant_middleware))
}
