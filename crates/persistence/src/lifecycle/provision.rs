use tracing::{debug, info, warn};

use super::TenantLifecycle;
use crate::core::Backend;
use crate::error::StorageResult;
use crate::tenant::{SchemaName, Tenant, TenantStatus};

impl<B: Backend> TenantLifecycle<B> {
    /// Registers a tenant and materializes its namespace.
    ///
    /// 1. Derives the schema name (`ValidationError` on failure, nothing stored).
    /// 2. Inserts the record in `provisioning` (`AlreadyExists` on a duplicate
    ///    domain URL or schema name).
    /// 3. Migrates the namespace, then marks the tenant `active`. A failed
    ///    migration leaves the record in `provisioning`.
    pub async fn provision(&self, domain_url: &str) -> StorageResult<Tenant> {
        let schema = SchemaName::from_domain_url(domain_url, self.base_domain.as_deref())?;
        let domain_url = domain_url.trim();
        debug!(domain_url = %domain_url, schema = %schema, "Provisioning tenant");

        let tenant = self.backend.insert_tenant(domain_url, &schema).await?;

        if let Err(e) = self.backend.migrate_namespace(&schema).await {
            warn!(
                tenant_id = tenant.id,
                schema = %schema,
                error = %e,
                "Namespace migration failed, tenant left in provisioning"
            );
            return Err(e);
        }

        let tenant = self
            .backend
            .set_status(tenant.id, TenantStatus::Active)
            .await?;
        info!(tenant_id = tenant.id, schema = %schema, "Tenant provisioned");
        Ok(tenant)
    }
}
