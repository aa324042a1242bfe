//! Schema management for PostgreSQL.

use async_trait::async_trait;
use tracing::debug;

use crate::core::NamespaceManager;
use crate::error::{SchemaError, StorageResult};
use crate::tenant::SchemaName;

use super::PostgresBackend;
use super::schema::{SCHEMA_EXISTS_SQL, drop_schema_sql, namespace_ddl};

#[async_trait]
impl NamespaceManager for PostgresBackend {
    async fn migrate_namespace(&self, schema: &SchemaName) -> StorageResult<()> {
        let migration_failed = |message: String| SchemaError::MigrationFailed {
            schema: schema.to_string(),
            message,
        };

        let mut client = self
            .get_client()
            .await
            .map_err(|e| migration_failed(e.to_string()))?;
        let tx = client
            .transaction()
            .await
            .map_err(|e| migration_failed(e.to_string()))?;
        tx.batch_execute(&namespace_ddl(schema))
            .await
            .map_err(|e| migration_failed(e.to_string()))?;
        tx.commit()
            .await
            .map_err(|e| migration_failed(e.to_string()))?;

        debug!(schema = %schema, "Migrated schema");
        Ok(())
    }

    async fn drop_namespace(&self, schema: &SchemaName) -> StorageResult<()> {
        let teardown = |message: String| SchemaError::TeardownFailed {
            schema: schema.to_string(),
            message,
        };

        let client = self
            .get_client()
            .await
            .map_err(|e| teardown(e.to_string()))?;
        client
            .batch_execute(&drop_schema_sql(schema))
            .await
            .map_err(|e| teardown(e.to_string()))?;

        debug!(schema = %schema, "Dropped schema");
        Ok(())
    }

    async fn namespace_exists(&self, schema: &SchemaName) -> StorageResult<bool> {
        let client = self.get_client().await?;
        let row = client
            .query_one(SCHEMA_EXISTS_SQL, &[&schema.as_str()])
            .await?;
        Ok(row.get(0))
    }
}
