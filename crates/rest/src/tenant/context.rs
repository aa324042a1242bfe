//! Per-request tenant storage in `http::Extensions`.

use atrium_persistence::error::TenantError;
use atrium_persistence::tenant::TenantContext;
use http::Extensions;

/// Set-once access to the tenant attached to a request.
pub trait RequestTenantExt {
    /// Attaches `ctx` to the request.
    ///
    /// Fails with [`TenantError::AlreadySet`] if a tenant is already attached.
    fn set_tenant(&mut self, ctx: TenantContext) -> Result<(), TenantError>;

    /// Returns the attached tenant, or [`TenantError::NoTenantInContext`].
    fn tenant(&self) -> Result<&TenantContext, TenantError>;
}

impl RequestTenantExt for Extensions {
    fn set_tenant(&mut self, ctx: TenantContext) -> Result<(), TenantError> {
        if let Some(existing) = self.get::<TenantContext>() {
            return Err(TenantError::AlreadySet {
                schema: existing.schema().to_string(),
            });
        }
        self.insert(ctx);
        Ok(())
    }

    fn tenant(&self) -> Result<&TenantContext, TenantError> {
        self.get::<TenantContext>()
            .ok_or(TenantError::NoTenantInContext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_persistence::tenant::SchemaName;

    fn ctx(name: &str) -> TenantContext {
        TenantContext::new(SchemaName::new(name).unwrap())
    }

    #[test]
    fn test_get_without_set() {
        let extensions = Extensions::new();
        assert!(matches!(
            extensions.tenant(),
            Err(TenantError::NoTenantInContext)
        ));
    }

    #[test]
    fn test_set_then_get() {
        let mut extensions = Extensions::new();
        extensions.set_tenant(ctx("acme")).unwrap();
        assert_eq!(extensions.tenant().unwrap().schema().as_str(), "acme");
    }

    #[test]
    fn test_second_set_fails_and_keeps_first() {
        let mut extensions = Extensions::new();
        extensions.set_tenant(ctx("acme")).unwrap();

        let err = extensions.set_tenant(ctx("globex")).unwrap_err();
        assert!(matches!(err, TenantError::AlreadySet { ref schema } if schema == "acme"));
        assert_eq!(extensions.tenant().unwrap().schema().as_str(), "acme");
    }
}
