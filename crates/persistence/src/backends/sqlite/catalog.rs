//! TenantCatalog implementation for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

use crate::core::TenantCatalog;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::tenant::{SchemaName, Tenant, TenantStatus};

use super::SqliteBackend;

const TENANT_COLUMNS: &str = "id, domain_url, schema_name, status, created_at, updated_at";

struct TenantRow {
    id: i64,
    domain_url: String,
    schema_name: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            domain_url: row.get(1)?,
            schema_name: row.get(2)?,
            status: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn into_tenant(self) -> StorageResult<Tenant> {
        let schema_name = SchemaName::new(self.schema_name).map_err(|e| {
            StorageError::Backend(BackendError::CorruptRow {
                table: "tenants".to_string(),
                message: e.to_string(),
            })
        })?;
        Ok(Tenant {
            id: self.id,
            domain_url: self.domain_url,
            schema_name,
            status: self.status.parse()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn fetch_tenant(conn: &Connection, id: i64) -> StorageResult<Option<Tenant>> {
    let sql = format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE id = ?1");
    conn.query_row(&sql, [id], TenantRow::read)
        .optional()?
        .map(TenantRow::into_tenant)
        .transpose()
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl TenantCatalog for SqliteBackend {
    async fn insert_tenant(&self, domain_url: &str, schema: &SchemaName) -> StorageResult<Tenant> {
        let conn = self.connection().lock().await;

        let existing: Option<(String, String)> = conn
            .query_row(
                "SELECT domain_url, schema_name FROM tenants
                 WHERE domain_url = ?1 OR schema_name = ?2 LIMIT 1",
                params![domain_url, schema.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        if let Some((existing_url, existing_schema)) = existing {
            let key = if existing_url == domain_url {
                existing_url
            } else {
                format!("schema {existing_schema}")
            };
            return Err(StorageError::already_exists("Tenant", key));
        }

        let now = Utc::now();
        conn.execute(
            "INSERT INTO tenants (domain_url, schema_name, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![
                domain_url,
                schema.as_str(),
                TenantStatus::Provisioning.as_str(),
                now
            ],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                StorageError::already_exists("Tenant", domain_url)
            } else {
                e.into()
            }
        })?;

        Ok(Tenant {
            id: conn.last_insert_rowid(),
            domain_url: domain_url.to_string(),
            schema_name: schema.clone(),
            status: TenantStatus::Provisioning,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_tenant(&self, id: i64) -> StorageResult<Option<Tenant>> {
        let conn = self.connection().lock().await;
        fetch_tenant(&conn, id)
    }

    async fn find_by_schema(&self, schema: &SchemaName) -> StorageResult<Option<Tenant>> {
        let conn = self.connection().lock().await;
        let sql = format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE schema_name = ?1");
        conn.query_row(&sql, [schema.as_str()], TenantRow::read)
            .optional()?
            .map(TenantRow::into_tenant)
            .transpose()
    }

    async fn set_status(&self, id: i64, status: TenantStatus) -> StorageResult<Tenant> {
        let conn = self.connection().lock().await;
        let changed = conn.execute(
            "UPDATE tenants SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), Utc::now(), id],
        )?;
        if changed == 0 {
            return Err(StorageError::not_found("Tenant", id));
        }
        fetch_tenant(&conn, id)?.ok_or_else(|| StorageError::not_found("Tenant", id))
    }

    async fn delete_tenant(&self, id: i64) -> StorageResult<()> {
        let conn = self.connection().lock().await;
        let changed = conn.execute("DELETE FROM tenants WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(StorageError::not_found("Tenant", id));
        }
        Ok(())
    }

    async fn list_tenants(&self) -> StorageResult<Vec<Tenant>> {
        let conn = self.connection().lock().await;
        let sql = format!("SELECT {TENANT_COLUMNS} FROM tenants ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], TenantRow::read)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(TenantRow::into_tenant).collect()
    }

    async fn count_tenants(&self) -> StorageResult<u64> {
        let conn = self.connection().lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM tenants", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
