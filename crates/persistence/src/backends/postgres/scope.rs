//! Schema scopes for PostgreSQL.
//!
//! Each scope owns an exclusive pooled connection whose `search_path` is
//! narrowed to the tenant schema. Releasing the scope restores the recorded
//! `search_path` before the connection returns to the pool.

use async_trait::async_trait;
use tokio_postgres::Row;
use tracing::warn;

use crate::core::{BoundConnection, SchemaBinding, SchemaScope};
use crate::error::{SchemaError, StorageError, StorageResult};
use crate::tenant::SchemaName;
use crate::types::{Book, BookUpdate, NewBook};

use super::PostgresBackend;
use super::schema::{SCHEMA_EXISTS_SQL, set_search_path_sql};

const BOOK_COLUMNS: &str = "id, name, tenant_schema, created_at, updated_at";

fn book_from_row(row: &Row) -> Book {
    Book {
        id: row.get("id"),
        name: row.get("name"),
        tenant_schema: row.get("tenant_schema"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// A pooled connection with `search_path` bound to one tenant schema.
pub struct PgScopedConnection {
    client: Option<deadpool_postgres::Client>,
    schema: SchemaName,
    previous_search_path: String,
    bound: bool,
}

impl PgScopedConnection {
    fn client(&self) -> StorageResult<&deadpool_postgres::Client> {
        self.client.as_ref().ok_or_else(|| {
            SchemaError::BindFailed {
                schema: self.schema.to_string(),
                message: "connection already discarded".to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl BoundConnection for PgScopedConnection {
    fn schema(&self) -> &SchemaName {
        &self.schema
    }

    async fn list_books(&mut self) -> StorageResult<Vec<Book>> {
        let rows = self
            .client()?
            .query(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"), &[])
            .await?;
        Ok(rows.iter().map(book_from_row).collect())
    }

    async fn get_book(&mut self, id: i64) -> StorageResult<Option<Book>> {
        let row = self
            .client()?
            .query_opt(
                &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"),
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(book_from_row))
    }

    async fn insert_book(&mut self, book: &NewBook) -> StorageResult<Book> {
        let row = self
            .client()?
            .query_one(
                &format!(
                    "INSERT INTO books (name, tenant_schema) VALUES ($1, $2)
                     RETURNING {BOOK_COLUMNS}"
                ),
                &[&book.name, &self.schema.as_str()],
            )
            .await?;
        Ok(book_from_row(&row))
    }

    async fn update_book(&mut self, id: i64, update: &BookUpdate) -> StorageResult<Option<Book>> {
        let row = self
            .client()?
            .query_opt(
                &format!(
                    "UPDATE books SET name = $1, updated_at = now() WHERE id = $2
                     RETURNING {BOOK_COLUMNS}"
                ),
                &[&update.name, &id],
            )
            .await?;
        Ok(row.as_ref().map(book_from_row))
    }

    async fn delete_book(&mut self, id: i64) -> StorageResult<bool> {
        let deleted = self
            .client()?
            .execute("DELETE FROM books WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }

    async fn unbind(&mut self) -> StorageResult<()> {
        if !self.bound {
            return Ok(());
        }
        let release_failed = |e: tokio_postgres::Error| -> StorageError {
            SchemaError::ReleaseFailed {
                schema: self.schema.to_string(),
                message: e.to_string(),
            }
            .into()
        };
        self.client()?
            .query_one(
                "SELECT set_config('search_path', $1, false)",
                &[&self.previous_search_path],
            )
            .await
            .map_err(release_failed)?;
        self.bound = false;
        Ok(())
    }

    fn restore_on_drop(&mut self) {
        if !self.bound {
            return;
        }
        // Detach from the pool so the bound session is closed instead of reused.
        if let Some(client) = self.client.take() {
            warn!(schema = %self.schema, "Discarding connection with bound search_path");
            drop(deadpool_postgres::Client::take(client));
        }
        self.bound = false;
    }
}

#[async_trait]
impl SchemaBinding for PostgresBackend {
    async fn enter(&self, schema: &SchemaName) -> StorageResult<SchemaScope> {
        let bind_failed = |message: String| SchemaError::BindFailed {
            schema: schema.to_string(),
            message,
        };

        let client = self
            .get_client()
            .await
            .map_err(|e| bind_failed(e.to_string()))?;

        let exists: bool = client
            .query_one(SCHEMA_EXISTS_SQL, &[&schema.as_str()])
            .await
            .map_err(|e| bind_failed(e.to_string()))?
            .get(0);
        if !exists {
            return Err(SchemaError::NamespaceMissing {
                schema: schema.to_string(),
            }
            .into());
        }

        let previous_search_path: String = client
            .query_one("SHOW search_path", &[])
            .await
            .map_err(|e| bind_failed(e.to_string()))?
            .get(0);
        client
            .batch_execute(&set_search_path_sql(schema))
            .await
            .map_err(|e| bind_failed(e.to_string()))?;

        Ok(SchemaScope::new(Box::new(PgScopedConnection {
            client: Some(client),
            schema: schema.clone(),
            previous_search_path,
            bound: true,
        })))
    }
}
