//! SQLite catalog and namespace schema definitions.

use rusqlite::Connection;

use crate::core::NAMESPACE_VERSION;
use crate::error::{BackendError, StorageError, StorageResult};

/// Current catalog schema version.
pub const CATALOG_VERSION: i32 = 1;

/// Alias a tenant namespace is attached under for the duration of a scope.
pub const SCOPE_ALIAS: &str = "tenant";

/// Alias a namespace is attached under while it is being migrated.
pub const MIGRATION_ALIAS: &str = "migrating";

/// Initialize the catalog schema.
pub fn initialize_catalog(conn: &Connection) -> StorageResult<()> {
    let current_version = get_catalog_version(conn)?;

    if current_version == 0 {
        create_catalog_v1(conn)?;
        set_catalog_version(conn, CATALOG_VERSION)?;
    }

    Ok(())
}

fn internal(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

/// Get the current catalog version.
fn get_catalog_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS catalog_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| internal(format!("Failed to create catalog_version table: {}", e)))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM catalog_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

fn set_catalog_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM catalog_version", [])
        .map_err(|e| internal(format!("Failed to clear catalog_version: {}", e)))?;
    conn.execute("INSERT INTO catalog_version (version) VALUES (?1)", [version])
        .map_err(|e| internal(format!("Failed to set catalog_version: {}", e)))?;
    Ok(())
}

fn create_catalog_v1(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tenants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            domain_url TEXT NOT NULL UNIQUE,
            schema_name TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL
                CHECK (status IN ('provisioning', 'active', 'decommissioning')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_tenants_status ON tenants(status);",
    )
    .map_err(|e| internal(format!("Failed to create tenants table: {}", e)))
}

/// DDL for the tenant object set, qualified with the attach alias.
pub fn namespace_ddl(alias: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {alias}.books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            tenant_schema TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS {alias}.idx_books_name ON books(name);
        CREATE TABLE IF NOT EXISTS {alias}.schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        INSERT OR IGNORE INTO {alias}.schema_version (version) VALUES ({NAMESPACE_VERSION});"
    )
}

/// Returns `true` if a database is attached under `alias`.
pub fn is_attached(conn: &Connection, alias: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) FROM pragma_database_list WHERE name = ?1",
        [alias],
        |row| row.get::<_, i64>(0),
    )
    .map(|count| count > 0)
}
