//! Application state for the Atrium HTTP API.
//!
//! Holds the storage backend, the configuration and the persistence services
//! built on them. Cloning is cheap; every field is reference counted.

use std::sync::Arc;

use atrium_persistence::core::Backend;
use atrium_persistence::gateway::BookGateway;
use atrium_persistence::lifecycle::TenantLifecycle;

use crate::config::ServerConfig;

/// Shared application state for the HTTP API.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use atrium_rest::{AppState, ServerConfig};
/// use atrium_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = Arc::new(SqliteBackend::open("./data")?);
/// let state = AppState::new(backend, ServerConfig::default());
/// ```
pub struct AppState<B> {
    /// The storage backend.
    backend: Arc<B>,

    /// Server configuration.
    config: Arc<ServerConfig>,

    /// Tenant-scoped book operations.
    books: BookGateway<B>,

    /// Provisioning and decommissioning workflows.
    lifecycle: TenantLifecycle<B>,
}

// Manually implement Clone since B is wrapped in Arc and doesn't need to be Clone
impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: Arc::clone(&self.config),
            books: self.books.clone(),
            lifecycle: self.lifecycle.clone(),
        }
    }
}

impl<B: Backend> AppState<B> {
    /// Creates a new AppState with the given backend and configuration.
    pub fn new(backend: Arc<B>, config: ServerConfig) -> Self {
        let books = BookGateway::new(Arc::clone(&backend));
        let lifecycle =
            TenantLifecycle::new(Arc::clone(&backend)).with_base_domain(config.base_domain.clone());
        Self {
            backend,
            config: Arc::new(config),
            books,
            lifecycle,
        }
    }

    /// Returns a reference to the storage backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the book gateway.
    pub fn books(&self) -> &BookGateway<B> {
        &self.books
    }

    /// Returns the tenant lifecycle workflows.
    pub fn lifecycle(&self) -> &TenantLifecycle<B> {
        &self.lifecycle
    }

    /// Returns the configured base domain, if any.
    pub fn base_domain(&self) -> Option<&str> {
        self.config.base_domain.as_deref()
    }
}
