use tracing::{debug, error, info};

use super::TenantLifecycle;
use crate::core::Backend;
use crate::error::{StorageError, StorageResult};
use crate::tenant::TenantStatus;

impl<B: Backend> TenantLifecycle<B> {
    /// Tears down a tenant's namespace, then removes its record.
    ///
    /// 1. Looks up the tenant (`NotFound`, nothing mutated).
    /// 2. Marks it `decommissioning` so resource operations are rejected, then
    ///    drops the namespace. If the drop fails the previous status is
    ///    restored and the error returned.
    /// 3. Deletes the record.
    pub async fn decommission(&self, id: i64) -> StorageResult<()> {
        let tenant = self
            .backend
            .get_tenant(id)
            .await?
            .ok_or_else(|| StorageError::not_found("Tenant", id))?;
        debug!(
            tenant_id = id,
            schema = %tenant.schema_name,
            status = %tenant.status,
            "Decommissioning tenant"
        );

        let previous = tenant.status;
        self.backend
            .set_status(id, TenantStatus::Decommissioning)
            .await?;

        if let Err(e) = self.backend.drop_namespace(&tenant.schema_name).await {
            if let Err(restore) = self.backend.set_status(id, previous).await {
                error!(
                    tenant_id = id,
                    error = %restore,
                    "Failed to restore tenant status after teardown failure"
                );
            }
            return Err(e);
        }

        self.backend.delete_tenant(id).await?;
        info!(tenant_id = id, schema = %tenant.schema_name, "Tenant decommissioned");
        Ok(())
    }
}
