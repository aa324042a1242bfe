//! Tenant context extractor.
//!
//! Reads the [`TenantContext`] the tenant middleware attached to the request.

use atrium_persistence::tenant::TenantContext;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::RestError;
use crate::tenant::RequestTenantExt;

/// Axum extractor for the request's tenant.
///
/// Rejects with `500 no-tenant` when no tenant was resolved, which happens
/// only if a tenant-scoped route is reachable through a skipped path.
///
/// # Example
///
/// ```rust,ignore
/// use atrium_rest::extractors::TenantExtractor;
///
/// async fn handler(tenant: TenantExtractor) {
///     println!("Tenant: {}", tenant.schema());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TenantExtractor {
    context: TenantContext,
}

impl TenantExtractor {
    /// Returns a reference to the tenant context.
    pub fn context(&self) -> &TenantContext {
        &self.context
    }

    /// Returns the tenant's schema name.
    pub fn schema(&self) -> &str {
        self.context.schema().as_str()
    }

    /// Consumes the extractor and returns the tenant context.
    pub fn into_context(self) -> TenantContext {
        self.context
    }
}

impl std::fmt::Display for TenantExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.schema())
    }
}

impl<S> FromRequestParts<S> for TenantExtractor
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts.extensions.tenant()?.clone();
        Ok(TenantExtractor { context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_persistence::tenant::SchemaName;
    use axum::http::Request;

    #[tokio::test]
    async fn test_extract_attached_tenant() {
        let (mut parts, _) = Request::new(()).into_parts();
        parts
            .extensions
            .set_tenant(TenantContext::new(SchemaName::new("acme").unwrap()))
            .unwrap();

        let tenant = TenantExtractor::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(tenant.schema(), "acme");
        assert_eq!(tenant.to_string(), "acme");
    }

    #[tokio::test]
    async fn test_extract_missing_tenant() {
        let (mut parts, _) = Request::new(()).into_parts();
        let err = TenantExtractor::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "no-tenant");
    }
}
