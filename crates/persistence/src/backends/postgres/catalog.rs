//! TenantCatalog implementation for PostgreSQL.

use async_trait::async_trait;
use tokio_postgres::Row;
use tokio_postgres::error::SqlState;

use crate::core::TenantCatalog;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::tenant::{SchemaName, Tenant, TenantStatus};

use super::PostgresBackend;

const TENANT_COLUMNS: &str = "id, domain_url, schema_name, status, created_at, updated_at";

fn tenant_from_row(row: &Row) -> StorageResult<Tenant> {
    let schema_name = SchemaName::new(row.get::<_, String>("schema_name")).map_err(|e| {
        StorageError::Backend(BackendError::CorruptRow {
            table: "tenants".to_string(),
            message: e.to_string(),
        })
    })?;
    let status: TenantStatus = row.get::<_, String>("status").parse()?;
    Ok(Tenant {
        id: row.get("id"),
        domain_url: row.get("domain_url"),
        schema_name,
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl TenantCatalog for PostgresBackend {
    async fn insert_tenant(&self, domain_url: &str, schema: &SchemaName) -> StorageResult<Tenant> {
        let client = self.get_client().await?;

        let existing = client
            .query_opt(
                "SELECT domain_url, schema_name FROM public.tenants
                 WHERE domain_url = $1 OR schema_name = $2 LIMIT 1",
                &[&domain_url, &schema.as_str()],
            )
            .await?;
        if let Some(row) = existing {
            let existing_url: String = row.get(0);
            let key = if existing_url == domain_url {
                existing_url
            } else {
                format!("schema {}", row.get::<_, String>(1))
            };
            return Err(StorageError::already_exists("Tenant", key));
        }

        let sql = format!(
            "INSERT INTO public.tenants (domain_url, schema_name, status)
             VALUES ($1, $2, $3) RETURNING {TENANT_COLUMNS}"
        );
        let row = client
            .query_one(
                &sql,
                &[
                    &domain_url,
                    &schema.as_str(),
                    &TenantStatus::Provisioning.as_str(),
                ],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    StorageError::already_exists("Tenant", domain_url)
                } else {
                    e.into()
                }
            })?;
        tenant_from_row(&row)
    }

    async fn get_tenant(&self, id: i64) -> StorageResult<Option<Tenant>> {
        let client = self.get_client().await?;
        let sql = format!("SELECT {TENANT_COLUMNS} FROM public.tenants WHERE id = $1");
        client
            .query_opt(&sql, &[&id])
            .await?
            .as_ref()
            .map(tenant_from_row)
            .transpose()
    }

    async fn find_by_schema(&self, schema: &SchemaName) -> StorageResult<Option<Tenant>> {
        let client = self.get_client().await?;
        let sql = format!("SELECT {TENANT_COLUMNS} FROM public.tenants WHERE schema_name = $1");
        client
            .query_opt(&sql, &[&schema.as_str()])
            .await?
            .as_ref()
            .map(tenant_from_row)
            .transpose()
    }

    async fn set_status(&self, id: i64, status: TenantStatus) -> StorageResult<Tenant> {
        let client = self.get_client().await?;
        let sql = format!(
            "UPDATE public.tenants SET status = $1, updated_at = now()
             WHERE id = $2 RETURNING {TENANT_COLUMNS}"
        );
        let row = client
            .query_opt(&sql, &[&status.as_str(), &id])
            .await?
            .ok_or_else(|| StorageError::not_found("Tenant", id))?;
        tenant_from_row(&row)
    }

    async fn delete_tenant(&self, id: i64) -> StorageResult<()> {
        let client = self.get_client().await?;
        let deleted = client
            .execute("DELETE FROM public.tenants WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(StorageError::not_found("Tenant", id));
        }
        Ok(())
    }

    async fn list_tenants(&self) -> StorageResult<Vec<Tenant>> {
        let client = self.get_client().await?;
        let sql = format!("SELECT {TENANT_COLUMNS} FROM public.tenants ORDER BY id");
        client
            .query(&sql, &[])
            .await?
            .iter()
            .map(tenant_from_row)
            .collect()
    }

    async fn count_tenants(&self) -> StorageResult<u64> {
        let client = self.get_client().await?;
        let row = client
            .query_one("SELECT COUNT(*) FROM public.tenants", &[])
            .await?;
        Ok(row.get::<_, i64>(0) as u64)
    }
}
