//! Tenant namespace management.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::tenant::SchemaName;

/// Version of the object set migrated into each namespace.
pub const NAMESPACE_VERSION: i32 = 1;

/// Creation and teardown of tenant namespaces.
#[async_trait]
pub trait NamespaceManager: Send + Sync {
    /// Creates the namespace and migrates the tenant object set into it.
    ///
    /// Idempotent: re-running against a migrated namespace is a no-op.
    /// Failures are reported as `SchemaError::MigrationFailed`.
    async fn migrate_namespace(&self, schema: &SchemaName) -> StorageResult<()>;

    /// Drops the namespace and everything in it.
    ///
    /// Dropping a namespace that does not exist succeeds. Failures are
    /// reported as `SchemaError::TeardownFailed`.
    async fn drop_namespace(&self, schema: &SchemaName) -> StorageResult<()>;

    /// Returns `true` if the namespace exists.
    async fn namespace_exists(&self, schema: &SchemaName) -> StorageResult<bool>;
}
