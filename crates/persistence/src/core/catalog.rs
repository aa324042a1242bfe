//! Tenant catalog trait.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::tenant::{SchemaName, Tenant, TenantStatus};

/// Storage for tenant records.
///
/// The catalog lives outside every tenant namespace and is never accessed
/// through a [`SchemaScope`](super::SchemaScope).
#[async_trait]
pub trait TenantCatalog: Send + Sync {
    /// Registers a tenant in [`TenantStatus::Provisioning`].
    ///
    /// Fails with `ResourceError::AlreadyExists` if either the domain URL or
    /// the schema name is already registered.
    async fn insert_tenant(&self, domain_url: &str, schema: &SchemaName) -> StorageResult<Tenant>;

    /// Looks up a tenant by id.
    async fn get_tenant(&self, id: i64) -> StorageResult<Option<Tenant>>;

    /// Looks up a tenant by schema name.
    async fn find_by_schema(&self, schema: &SchemaName) -> StorageResult<Option<Tenant>>;

    /// Updates a tenant's status and returns the updated record.
    ///
    /// Fails with `ResourceError::NotFound` if the tenant does not exist.
    async fn set_status(&self, id: i64, status: TenantStatus) -> StorageResult<Tenant>;

    /// Deletes a tenant record.
    ///
    /// Fails with `ResourceError::NotFound` if the tenant does not exist.
    async fn delete_tenant(&self, id: i64) -> StorageResult<()>;

    /// Lists all tenants ordered by id.
    async fn list_tenants(&self) -> StorageResult<Vec<Tenant>>;

    /// Counts registered tenants.
    async fn count_tenants(&self) -> StorageResult<u64>;
}
