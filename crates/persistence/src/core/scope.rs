//! Scoped binding of a storage handle to one tenant namespace.
//!
//! [`SchemaBinding::enter`] hands out a [`SchemaScope`] that owns a storage
//! handle bound to exactly one namespace. While the scope is alive no other
//! scope can observe that binding: the SQLite backend holds its shared
//! connection's lock for the whole scope, and the PostgreSQL backend gives each
//! scope an exclusive pooled connection.
//!
//! A scope is finished with [`SchemaScope::release`], which restores the
//! handle's prior binding and reports failures. A scope dropped without
//! release (early `?` return, panic, cancelled request future) restores the
//! handle synchronously on a best-effort basis.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::StorageResult;
use crate::tenant::SchemaName;
use crate::types::{Book, BookUpdate, NewBook};

/// A storage handle bound to one tenant namespace.
///
/// Every method operates strictly inside [`schema`](Self::schema).
#[async_trait]
pub trait BoundConnection: Send {
    /// The namespace this handle is bound to.
    fn schema(&self) -> &SchemaName;

    /// Lists all books ordered by id.
    async fn list_books(&mut self) -> StorageResult<Vec<Book>>;

    /// Fetches a book by id.
    async fn get_book(&mut self, id: i64) -> StorageResult<Option<Book>>;

    /// Inserts a book, stamping it with the bound schema.
    async fn insert_book(&mut self, book: &NewBook) -> StorageResult<Book>;

    /// Renames a book and returns the updated record, or `None` if absent.
    async fn update_book(&mut self, id: i64, update: &BookUpdate) -> StorageResult<Option<Book>>;

    /// Deletes a book; returns `false` if it did not exist.
    async fn delete_book(&mut self, id: i64) -> StorageResult<bool>;

    /// Restores the handle's prior binding.
    async fn unbind(&mut self) -> StorageResult<()>;

    /// Restores the handle's prior binding without awaiting.
    ///
    /// Called from `Drop` when a scope was not released. Implementations must
    /// leave the handle unusable by other tenants if they cannot restore it.
    fn restore_on_drop(&mut self);
}

/// Entry point for scoped namespace access.
#[async_trait]
pub trait SchemaBinding: Send + Sync {
    /// Binds a storage handle to `schema`.
    ///
    /// Waits while another scope holds a shared handle. Fails with
    /// `SchemaError::NamespaceMissing` if the namespace does not exist and
    /// `SchemaError::BindFailed` if the handle cannot be rebound.
    async fn enter(&self, schema: &SchemaName) -> StorageResult<SchemaScope>;
}

/// An active binding of a storage handle to one namespace.
pub struct SchemaScope {
    conn: Box<dyn BoundConnection>,
    released: bool,
}

impl SchemaScope {
    /// Wraps a freshly bound connection.
    pub fn new(conn: Box<dyn BoundConnection>) -> Self {
        debug!(schema = %conn.schema(), "Entered schema scope");
        Self {
            conn,
            released: false,
        }
    }

    /// The namespace this scope is bound to.
    pub fn schema(&self) -> &SchemaName {
        self.conn.schema()
    }

    /// The bound connection.
    pub fn connection(&mut self) -> &mut dyn BoundConnection {
        self.conn.as_mut()
    }

    /// Restores the handle and ends the scope.
    ///
    /// If restoring fails the drop-time restore still runs.
    pub async fn release(mut self) -> StorageResult<()> {
        self.conn.unbind().await?;
        self.released = true;
        debug!(schema = %self.conn.schema(), "Released schema scope");
        Ok(())
    }
}

impl Drop for SchemaScope {
    fn drop(&mut self) {
        if !self.released {
            warn!(
                schema = %self.conn.schema(),
                "Schema scope dropped without release, restoring handle"
            );
            self.conn.restore_on_drop();
        }
    }
}

impl std::fmt::Debug for SchemaScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaScope")
            .field("schema", self.conn.schema())
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::SchemaError;

    #[derive(Default)]
    struct Counters {
        unbinds: AtomicUsize,
        drop_restores: AtomicUsize,
    }

    struct FakeConnection {
        schema: SchemaName,
        counters: Arc<Counters>,
        fail_unbind: bool,
    }

    #[async_trait]
    impl BoundConnection for FakeConnection {
        fn schema(&self) -> &SchemaName {
            &self.schema
        }

        async fn list_books(&mut self) -> StorageResult<Vec<Book>> {
            Ok(Vec::new())
        }

        async fn get_book(&mut self, _id: i64) -> StorageResult<Option<Book>> {
            Ok(None)
        }

        async fn insert_book(&mut self, _book: &NewBook) -> StorageResult<Book> {
            unimplemented!()
        }

        async fn update_book(
            &mut self,
            _id: i64,
            _update: &BookUpdate,
        ) -> StorageResult<Option<Book>> {
            Ok(None)
        }

        async fn delete_book(&mut self, _id: i64) -> StorageResult<bool> {
            Ok(false)
        }

        async fn unbind(&mut self) -> StorageResult<()> {
            self.counters.unbinds.fetch_add(1, Ordering::SeqCst);
            if self.fail_unbind {
                return Err(SchemaError::ReleaseFailed {
                    schema: self.schema.to_string(),
                    message: "connection lost".to_string(),
                }
                .into());
            }
            Ok(())
        }

        fn restore_on_drop(&mut self) {
            self.counters.drop_restores.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn scope(fail_unbind: bool) -> (SchemaScope, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let conn = FakeConnection {
            schema: SchemaName::new("acme").unwrap(),
            counters: counters.clone(),
            fail_unbind,
        };
        (SchemaScope::new(Box::new(conn)), counters)
    }

    #[tokio::test]
    async fn test_release_restores_once() {
        let (scope, counters) = scope(false);
        assert_eq!(scope.schema().as_str(), "acme");
        scope.release().await.unwrap();

        assert_eq!(counters.unbinds.load(Ordering::SeqCst), 1);
        assert_eq!(counters.drop_restores.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drop_without_release_restores() {
        let (mut scope, counters) = scope(false);
        let _ = scope.connection().list_books().await.unwrap();
        drop(scope);

        assert_eq!(counters.unbinds.load(Ordering::SeqCst), 0);
        assert_eq!(counters.drop_restores.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_release_falls_back_to_drop_restore() {
        let (scope, counters) = scope(true);
        let err = scope.release().await.unwrap_err();
        assert!(err.to_string().contains("failed to release schema acme"));

        assert_eq!(counters.unbinds.load(Ordering::SeqCst), 1);
        assert_eq!(counters.drop_restores.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_early_return_restores() {
        async fn failing_op(mut scope: SchemaScope) -> StorageResult<()> {
            scope
                .connection()
                .get_book(7)
                .await?
                .ok_or_else(|| crate::error::StorageError::not_found("Book", 7))?;
            scope.release().await
        }

        let (scope, counters) = scope(false);
        assert!(failing_op(scope).await.is_err());
        assert_eq!(counters.drop_restores.load(Ordering::SeqCst), 1);
    }
}
