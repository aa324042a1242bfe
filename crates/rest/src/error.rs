//! Error types for the Atrium HTTP API.
//!
//! Every error is returned as a JSON body of the form
//! `{"status": 404, "code": "not-found", "message": "..."}`.
//!
//! # Error Mapping
//!
//! | Storage Error | HTTP Status | Code |
//! |--------------|-------------|------|
//! | Validation | 400 | invalid |
//! | NotFound / UnknownTenant | 404 | not-found |
//! | AlreadyExists / NotActive | 409 | conflict |
//! | NoTenantInContext | 500 | no-tenant |
//! | NamespaceMissing / BindFailed / ReleaseFailed | 500 | schema-bind |
//! | MigrationFailed / TeardownFailed / Backend | 500 | storage |

use std::fmt;

use atrium_persistence::error::{
    BackendError, ResourceError, SchemaError, StorageError, TenantError, ValidationError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// The primary error type for HTTP API operations.
#[derive(Debug)]
pub enum RestError {
    /// Malformed request body or invalid input (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Record or tenant not found (HTTP 404).
    NotFound {
        /// Error message.
        message: String,
    },

    /// Duplicate record or tenant in the wrong state (HTTP 409).
    Conflict {
        /// Error message.
        message: String,
    },

    /// A tenant-scoped route ran without a resolved tenant (HTTP 500).
    NoTenant {
        /// Error message.
        message: String,
    },

    /// The storage handle could not be bound to or released from a schema (HTTP 500).
    SchemaBind {
        /// Error message.
        message: String,
    },

    /// Storage failure (HTTP 500).
    Storage {
        /// Error message.
        message: String,
    },

    /// Request exceeded the configured timeout (HTTP 408).
    Timeout,

    /// Unexpected server fault (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::Conflict { .. } => StatusCode::CONFLICT,
            RestError::Timeout => StatusCode::REQUEST_TIMEOUT,
            RestError::NoTenant { .. }
            | RestError::SchemaBind { .. }
            | RestError::Storage { .. }
            | RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            RestError::BadRequest { .. } => "invalid",
            RestError::NotFound { .. } => "not-found",
            RestError::Conflict { .. } => "conflict",
            RestError::NoTenant { .. } => "no-tenant",
            RestError::SchemaBind { .. } => "schema-bind",
            RestError::Storage { .. } => "storage",
            RestError::Timeout => "timeout",
            RestError::InternalError { .. } => "internal",
        }
    }

    /// Shorthand for a missing record.
    pub fn not_found(resource_type: &str, id: impl fmt::Display) -> Self {
        RestError::NotFound {
            message: format!("{resource_type} not found: {id}"),
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::NotFound { message } => write!(f, "{}", message),
            RestError::Conflict { message } => write!(f, "{}", message),
            RestError::NoTenant { message } => write!(f, "{}", message),
            RestError::SchemaBind { message } => write!(f, "{}", message),
            RestError::Storage { message } => write!(f, "Storage error: {}", message),
            RestError::Timeout => write!(f, "Request timed out"),
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "Request failed");
        }
        (status, Json(error_body(status, self.code(), &self.to_string()))).into_response()
    }
}

/// Builds the JSON error body.
pub fn error_body(status: StatusCode, code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "status": status.as_u16(),
        "code": code,
        "message": message,
    })
}

// Conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(e) => e.into(),
            StorageError::Resource(e) => e.into(),
            StorageError::Tenant(e) => e.into(),
            StorageError::Schema(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { .. } => RestError::NotFound {
                message: err.to_string(),
            },
            ResourceError::AlreadyExists { .. } => RestError::Conflict {
                message: err.to_string(),
            },
        }
    }
}

impl From<TenantError> for RestError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::NoTenantInContext => RestError::NoTenant {
                message: err.to_string(),
            },
            TenantError::UnknownTenant { .. } => RestError::NotFound {
                message: err.to_string(),
            },
            TenantError::NotActive { .. } => RestError::Conflict {
                message: err.to_string(),
            },
            TenantError::AlreadySet { .. } => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

impl From<SchemaError> for RestError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::NamespaceMissing { .. }
            | SchemaError::BindFailed { .. }
            | SchemaError::ReleaseFailed { .. } => RestError::SchemaBind {
                message: err.to_string(),
            },
            SchemaError::MigrationFailed { .. } | SchemaError::TeardownFailed { .. } => {
                RestError::Storage {
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        RestError::Storage {
            message: err.to_string(),
        }
    }
}

/// Result type alias for HTTP API operations.
pub type RestResult<T> = Result<T, RestError>;
