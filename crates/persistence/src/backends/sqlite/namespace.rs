//! Namespace files for SQLite.
//!
//! A namespace is a database file; migrating attaches it under a temporary
//! alias, runs the object-set DDL and detaches it again.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::Connection;
use tracing::{debug, warn};

use crate::core::NamespaceManager;
use crate::error::{SchemaError, StorageResult};
use crate::tenant::SchemaName;

use super::SqliteBackend;
use super::schema::{self, MIGRATION_ALIAS, SCOPE_ALIAS};

fn migrate(conn: &Connection, path: &Path) -> rusqlite::Result<()> {
    conn.execute(
        &format!("ATTACH DATABASE ?1 AS {MIGRATION_ALIAS}"),
        [path.to_string_lossy().into_owned()],
    )?;
    let result = conn.execute_batch(&schema::namespace_ddl(MIGRATION_ALIAS));
    let detach = conn.execute_batch(&format!("DETACH DATABASE {MIGRATION_ALIAS}"));
    result.and(detach)
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[async_trait]
impl NamespaceManager for SqliteBackend {
    async fn migrate_namespace(&self, schema: &SchemaName) -> StorageResult<()> {
        let path = self.namespace_path(schema);
        let conn = self.connection().lock().await;

        migrate(&conn, &path).map_err(|e| {
            if schema::is_attached(&conn, MIGRATION_ALIAS).unwrap_or(false) {
                let _ = conn.execute_batch(&format!("DETACH DATABASE {MIGRATION_ALIAS}"));
            }
            SchemaError::MigrationFailed {
                schema: schema.to_string(),
                message: e.to_string(),
            }
        })?;

        debug!(schema = %schema, path = %path.display(), "Migrated namespace");
        Ok(())
    }

    async fn drop_namespace(&self, schema: &SchemaName) -> StorageResult<()> {
        let path = self.namespace_path(schema);
        let conn = self.connection().lock().await;
        let teardown = |message: String| SchemaError::TeardownFailed {
            schema: schema.to_string(),
            message,
        };

        // A scope whose drop-time detach failed may have left the file attached.
        if schema::is_attached(&conn, SCOPE_ALIAS).map_err(|e| teardown(e.to_string()))? {
            conn.execute_batch(&format!("DETACH DATABASE {SCOPE_ALIAS}"))
                .map_err(|e| teardown(e.to_string()))?;
        }

        if !path.exists() {
            warn!(schema = %schema, "Namespace file already absent");
        }
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let file = path.with_file_name(format!("{}.db{}", schema.as_str(), suffix));
            remove_if_exists(&file).map_err(|e| teardown(e.to_string()))?;
        }

        debug!(schema = %schema, "Dropped namespace");
        Ok(())
    }

    async fn namespace_exists(&self, schema: &SchemaName) -> StorageResult<bool> {
        Ok(self.namespace_path(schema).is_file())
    }
}
