//! Schema scopes for SQLite.
//!
//! Entering a scope takes the shared connection's lock and attaches the
//! tenant's namespace file under [`SCOPE_ALIAS`]. The lock is held until the
//! scope ends, so concurrent scopes queue and never see each other's binding.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tokio::sync::OwnedMutexGuard;
use tracing::{error, warn};

use crate::core::{BoundConnection, SchemaBinding, SchemaScope};
use crate::error::{SchemaError, StorageResult};
use crate::tenant::SchemaName;
use crate::types::{Book, BookUpdate, NewBook};

use super::SqliteBackend;
use super::schema::{SCOPE_ALIAS, is_attached};

fn read_book(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        name: row.get(1)?,
        tenant_schema: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// The shared connection with a tenant namespace attached.
pub struct SqliteScopedConnection {
    conn: OwnedMutexGuard<Connection>,
    schema: SchemaName,
    attached: bool,
}

impl SqliteScopedConnection {
    fn select_book(&self, id: i64) -> StorageResult<Option<Book>> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT id, name, tenant_schema, created_at, updated_at
                     FROM {SCOPE_ALIAS}.books WHERE id = ?1"
                ),
                [id],
                read_book,
            )
            .optional()?)
    }

    fn detach(&mut self) -> rusqlite::Result<()> {
        if self.attached {
            self.conn
                .execute_batch(&format!("DETACH DATABASE {SCOPE_ALIAS}"))?;
            self.attached = false;
        }
        Ok(())
    }
}

#[async_trait]
impl BoundConnection for SqliteScopedConnection {
    fn schema(&self) -> &SchemaName {
        &self.schema
    }

    async fn list_books(&mut self) -> StorageResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, tenant_schema, created_at, updated_at
             FROM {SCOPE_ALIAS}.books ORDER BY id"
        ))?;
        let books = stmt
            .query_map([], read_book)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(books)
    }

    async fn get_book(&mut self, id: i64) -> StorageResult<Option<Book>> {
        self.select_book(id)
    }

    async fn insert_book(&mut self, book: &NewBook) -> StorageResult<Book> {
        let now = Utc::now();
        self.conn.execute(
            &format!(
                "INSERT INTO {SCOPE_ALIAS}.books (name, tenant_schema, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)"
            ),
            params![book.name, self.schema.as_str(), now],
        )?;
        Ok(Book {
            id: self.conn.last_insert_rowid(),
            name: book.name.clone(),
            tenant_schema: self.schema.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_book(&mut self, id: i64, update: &BookUpdate) -> StorageResult<Option<Book>> {
        let changed = self.conn.execute(
            &format!("UPDATE {SCOPE_ALIAS}.books SET name = ?1, updated_at = ?2 WHERE id = ?3"),
            params![update.name, Utc::now(), id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.select_book(id)
    }

    async fn delete_book(&mut self, id: i64) -> StorageResult<bool> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {SCOPE_ALIAS}.books WHERE id = ?1"),
            [id],
        )?;
        Ok(changed > 0)
    }

    async fn unbind(&mut self) -> StorageResult<()> {
        self.detach().map_err(|e| {
            SchemaError::ReleaseFailed {
                schema: self.schema.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn restore_on_drop(&mut self) {
        // The next enter() detaches a stale alias before attaching.
        if let Err(e) = self.detach() {
            error!(schema = %self.schema, error = %e, "Failed to detach namespace on drop");
        }
    }
}

#[async_trait]
impl SchemaBinding for SqliteBackend {
    async fn enter(&self, schema: &SchemaName) -> StorageResult<SchemaScope> {
        let conn = self.connection().clone().lock_owned().await;
        let path = self.namespace_path(schema);
        let bind_failed = |e: rusqlite::Error| SchemaError::BindFailed {
            schema: schema.to_string(),
            message: e.to_string(),
        };

        if !path.is_file() {
            return Err(SchemaError::NamespaceMissing {
                schema: schema.to_string(),
            }
            .into());
        }

        if is_attached(&conn, SCOPE_ALIAS).map_err(bind_failed)? {
            warn!(schema = %schema, "Detaching stale namespace binding");
            conn.execute_batch(&format!("DETACH DATABASE {SCOPE_ALIAS}"))
                .map_err(bind_failed)?;
        }

        conn.execute(
            &format!("ATTACH DATABASE ?1 AS {SCOPE_ALIAS}"),
            [path.to_string_lossy().into_owned()],
        )
        .map_err(bind_failed)?;

        Ok(SchemaScope::new(Box::new(SqliteScopedConnection {
            conn,
            schema: schema.clone(),
            attached: true,
        })))
    }
}
