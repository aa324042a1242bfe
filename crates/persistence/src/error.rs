//! Error types for the persistence layer.
//!
//! Errors are grouped by category: input validation, resource state, tenant
//! context and status, namespace binding and lifecycle, and backend faults.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::tenant::TenantStatus;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Malformed or missing input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Resource state errors (absent or duplicate records)
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Tenant context and status errors
    #[error(transparent)]
    Tenant(#[from] TenantError),

    /// Namespace binding and lifecycle errors
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to malformed input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The domain URL could not be parsed.
    #[error("invalid domain URL '{domain_url}': {message}")]
    InvalidDomainUrl { domain_url: String, message: String },

    /// The host has no subdomain component to derive a schema name from.
    #[error("no subdomain found in host '{host}'")]
    MissingSubdomain { host: String },

    /// The derived name is not a valid namespace identifier.
    #[error("invalid schema name '{name}': {message}")]
    InvalidSchemaName { name: String, message: String },

    /// A required field is missing or empty.
    #[error("missing required field: {field}")]
    MissingRequiredField { field: String },
}

/// Errors related to resource state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested record was not found.
    #[error("{resource_type} not found: {id}")]
    NotFound { resource_type: String, id: String },

    /// A record with the same unique key already exists.
    #[error("{resource_type} already exists: {id}")]
    AlreadyExists { resource_type: String, id: String },
}

/// Errors related to tenant resolution and tenant status.
#[derive(Error, Debug)]
pub enum TenantError {
    /// No tenant was resolved for the current request.
    #[error("no tenant in request context")]
    NoTenantInContext,

    /// A tenant was already stored for the current request.
    #[error("tenant already set for this request: {schema}")]
    AlreadySet { schema: String },

    /// The resolved schema name does not belong to a registered tenant.
    #[error("unknown tenant: {schema}")]
    UnknownTenant { schema: String },

    /// The tenant exists but is not accepting resource operations.
    #[error("tenant {schema} is {status}, not active")]
    NotActive { schema: String, status: TenantStatus },
}

/// Errors related to tenant namespaces.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The namespace does not exist.
    #[error("schema does not exist: {schema}")]
    NamespaceMissing { schema: String },

    /// The storage handle could not be bound to the namespace.
    #[error("failed to bind schema {schema}: {message}")]
    BindFailed { schema: String, message: String },

    /// The storage handle could not be restored after a scope.
    #[error("failed to release schema {schema}: {message}")]
    ReleaseFailed { schema: String, message: String },

    /// Creating the namespace or its objects failed.
    #[error("migration of schema {schema} failed: {message}")]
    MigrationFailed { schema: String, message: String },

    /// Dropping the namespace failed.
    #[error("teardown of schema {schema} failed: {message}")]
    TeardownFailed { schema: String, message: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stored value could not be decoded.
    #[error("corrupt row in {table}: {message}")]
    CorruptRow { table: String, message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Shorthand for a missing record.
    pub fn not_found(resource_type: &str, id: impl ToString) -> Self {
        StorageError::Resource(ResourceError::NotFound {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        })
    }

    /// Shorthand for a duplicate record.
    pub fn already_exists(resource_type: &str, id: impl ToString) -> Self {
        StorageError::Resource(ResourceError::AlreadyExists {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        })
    }

    /// Returns `true` if this error reports an absent record or tenant.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::Resource(ResourceError::NotFound { .. })
                | StorageError::Tenant(TenantError::UnknownTenant { .. })
        )
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Internal {
            backend_name: "filesystem".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for StorageError {
    fn from(err: tokio_postgres::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "postgres".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "postgres")]
impl From<deadpool_postgres::PoolError> for StorageError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StorageError::Backend(BackendError::ConnectionFailed {
            backend_name: "postgres".to_string(),
            message: err.to_string(),
        })
    }
}
