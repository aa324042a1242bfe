//! Host-based tenant resolution.
//!
//! Provides the [`TenantResolver`] which derives a tenant schema name from the
//! request host, bypassing a configured list of tenant-management paths.

use atrium_persistence::tenant::SchemaName;
use axum::http::{header, request::Parts};

use crate::config::ServerConfig;
use crate::error::RestError;

/// Outcome of resolving a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The path is on the skip list; no tenant is attached.
    Skipped,
    /// The host named this tenant.
    Resolved(SchemaName),
}

/// Resolves the tenant for a request from its host's subdomain.
#[derive(Debug, Clone)]
pub struct TenantResolver {
    skip_paths: Vec<String>,
    base_domain: Option<String>,
}

impl TenantResolver {
    /// Creates a resolver with the given skip list and optional base domain.
    pub fn new(skip_paths: Vec<String>, base_domain: Option<String>) -> Self {
        let skip_paths = skip_paths
            .into_iter()
            .map(|p| p.trim().trim_end_matches('/').to_string())
            .collect();
        Self {
            skip_paths,
            base_domain,
        }
    }

    /// Creates a resolver from the server configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.tenant_skip_paths.clone(), config.base_domain.clone())
    }

    /// Returns `true` if `path` is exempt from tenant resolution.
    ///
    /// Matching is by whole path segments: `/tenants` skips `/tenants` and
    /// `/tenants/7` but not `/tenantsx`.
    pub fn is_skipped(&self, path: &str) -> bool {
        self.skip_paths.iter().any(|prefix| {
            prefix.is_empty()
                || path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Resolves the tenant for a request.
    ///
    /// The host comes from the `Host` header, falling back to the URI
    /// authority for absolute-form requests.
    pub fn resolve(&self, parts: &Parts) -> Result<Resolution, RestError> {
        if self.is_skipped(parts.uri.path()) {
            return Ok(Resolution::Skipped);
        }

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .ok_or_else(|| RestError::NoTenant {
                message: "no tenant in request context: request has no host".to_string(),
            })?;

        SchemaName::from_host(&host, self.base_domain.as_deref())
            .map(Resolution::Resolved)
            .map_err(|e| RestError::NoTenant {
                message: format!("no tenant in request context: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, host: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(host) = host {
            builder = builder.header(header::HOST, host);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn resolver() -> TenantResolver {
        TenantResolver::new(vec!["/tenants".into(), "/health/".into()], None)
    }

    #[test]
    fn test_skip_is_segment_aware() {
        let resolver = resolver();
        assert!(resolver.is_skipped("/tenants"));
        assert!(resolver.is_skipped("/tenants/7"));
        assert!(resolver.is_skipped("/health"));
        assert!(!resolver.is_skipped("/tenantsx"));
        assert!(!resolver.is_skipped("/books"));
    }

    #[test]
    fn test_resolve_skipped_path_ignores_host() {
        let resolution = resolver().resolve(&parts("/tenants", Some("example.com"))).unwrap();
        assert_eq!(resolution, Resolution::Skipped);
    }

    #[test]
    fn test_resolve_from_host_header() {
        let resolution = resolver()
            .resolve(&parts("/books", Some("acme.example.com:8080")))
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Resolved(SchemaName::new("acme").unwrap())
        );
    }

    #[test]
    fn test_resolve_from_uri_authority() {
        let resolution = resolver()
            .resolve(&parts("http://globex.example.com/books", None))
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Resolved(SchemaName::new("globex").unwrap())
        );
    }

    #[test]
    fn test_resolve_with_base_domain() {
        let resolver = TenantResolver::new(vec![], Some("localhost".into()));
        let resolution = resolver
            .resolve(&parts("/books", Some("acme.localhost:8080")))
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Resolved(SchemaName::new("acme").unwrap())
        );
    }

    #[test]
    fn test_resolve_without_subdomain_fails() {
        let err = resolver()
            .resolve(&parts("/books", Some("example.com")))
            .unwrap_err();
        assert_eq!(err.code(), "no-tenant");

        let err = resolver().resolve(&parts("/books", None)).unwrap_err();
        assert_eq!(err.code(), "no-tenant");
    }
}
