//! PostgreSQL catalog and namespace schema definitions.

use crate::core::NAMESPACE_VERSION;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::tenant::SchemaName;

/// Current catalog schema version.
pub const CATALOG_VERSION: i32 = 1;

/// Initialize the catalog schema in `public`.
pub async fn initialize_catalog(client: &deadpool_postgres::Client) -> StorageResult<()> {
    let current_version = get_catalog_version(client).await?;

    if current_version == 0 {
        create_catalog_v1(client).await?;
        set_catalog_version(client, CATALOG_VERSION).await?;
    }

    Ok(())
}

async fn get_catalog_version(client: &deadpool_postgres::Client) -> StorageResult<i32> {
    client
        .execute(
            "CREATE TABLE IF NOT EXISTS public.catalog_version (
                version INTEGER NOT NULL
            )",
            &[],
        )
        .await
        .map_err(|e| pg_error(format!("Failed to create catalog_version table: {}", e)))?;

    let row = client
        .query_opt("SELECT version FROM public.catalog_version LIMIT 1", &[])
        .await
        .map_err(|e| pg_error(format!("Failed to query catalog version: {}", e)))?;

    Ok(row.map(|r| r.get::<_, i32>(0)).unwrap_or(0))
}

async fn set_catalog_version(client: &deadpool_postgres::Client, version: i32) -> StorageResult<()> {
    client
        .execute("DELETE FROM public.catalog_version", &[])
        .await
        .map_err(|e| pg_error(format!("Failed to clear catalog_version: {}", e)))?;

    client
        .execute(
            "INSERT INTO public.catalog_version (version) VALUES ($1)",
            &[&version],
        )
        .await
        .map_err(|e| pg_error(format!("Failed to set catalog_version: {}", e)))?;

    Ok(())
}

async fn create_catalog_v1(client: &deadpool_postgres::Client) -> StorageResult<()> {
    client
        .batch_execute(
            "CREATE TABLE IF NOT EXISTS public.tenants (
                id BIGSERIAL PRIMARY KEY,
                domain_url TEXT NOT NULL UNIQUE,
                schema_name TEXT NOT NULL UNIQUE,
                status TEXT NOT NULL
                    CHECK (status IN ('provisioning', 'active', 'decommissioning')),
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            );
            CREATE INDEX IF NOT EXISTS idx_tenants_status ON public.tenants(status);",
        )
        .await
        .map_err(|e| pg_error(format!("Failed to create tenants table: {}", e)))
}

fn pg_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "postgres".to_string(),
        message,
        source: None,
    })
}

/// Escapes a SQL identifier (schema name, table name, etc.).
pub fn escape_identifier(id: &str) -> String {
    format!("\"{}\"", id.replace('"', "\"\""))
}

/// SQL to bind a session to exactly one schema.
pub fn set_search_path_sql(schema: &SchemaName) -> String {
    format!("SET search_path TO {}", escape_identifier(schema.as_str()))
}

/// SQL to create the schema and the tenant object set inside it.
pub fn namespace_ddl(schema: &SchemaName) -> String {
    let s = escape_identifier(schema.as_str());
    format!(
        "CREATE SCHEMA IF NOT EXISTS {s};
        CREATE TABLE IF NOT EXISTS {s}.books (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            tenant_schema TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        CREATE INDEX IF NOT EXISTS idx_books_name ON {s}.books(name);
        CREATE TABLE IF NOT EXISTS {s}.schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        INSERT INTO {s}.schema_version (version) VALUES ({NAMESPACE_VERSION})
            ON CONFLICT (version) DO NOTHING;"
    )
}

/// SQL to drop a schema and everything in it.
pub fn drop_schema_sql(schema: &SchemaName) -> String {
    format!(
        "DROP SCHEMA IF EXISTS {} CASCADE",
        escape_identifier(schema.as_str())
    )
}

/// SQL to check if a schema exists; takes the schema name as `$1`.
pub const SCHEMA_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = $1)";
