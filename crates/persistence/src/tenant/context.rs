//! Per-request tenant context.

use super::SchemaName;

/// The tenant a request has been attributed to.
///
/// Built once per request by the HTTP layer after host resolution and passed
/// by reference into every gateway operation. It carries no process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    schema: SchemaName,
    /// Optional correlation ID for request tracing.
    correlation_id: Option<String>,
}

impl TenantContext {
    /// Creates a context for the tenant owning `schema`.
    pub fn new(schema: SchemaName) -> Self {
        Self {
            schema,
            correlation_id: None,
        }
    }

    /// Creates a context with the specified correlation ID for tracing.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Returns the tenant's schema name.
    pub fn schema(&self) -> &SchemaName {
        &self.schema
    }

    /// Returns the correlation ID, if set.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}
