//! Tenant-scoped book operations.
//!
//! [`BookGateway`] is the only way request handlers reach tenant-owned data.
//! Every operation:
//!
//! 1. takes the request's [`TenantContext`],
//! 2. checks the catalog that the tenant exists and is `active`,
//! 3. enters a [`SchemaScope`] bound to the tenant's schema,
//! 4. runs its queries and releases the scope on every exit path.
//!
//! The gateway never creates or drops namespaces.

use std::sync::Arc;

use tracing::{debug, error};

use crate::core::{Backend, SchemaScope};
use crate::error::{StorageError, StorageResult, TenantError};
use crate::tenant::{Tenant, TenantContext};
use crate::types::{Book, BookUpdate, NewBook};

/// Book operations confined to the caller's tenant.
#[derive(Debug)]
pub struct BookGateway<B> {
    backend: Arc<B>,
}

impl<B> Clone for BookGateway<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> BookGateway<B> {
    /// Creates a gateway over `backend`.
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Lists the caller's books.
    pub async fn list(&self, ctx: &TenantContext) -> StorageResult<Vec<Book>> {
        let mut scope = self.enter(ctx).await?;
        let result = scope.connection().list_books().await;
        finish(scope, result).await
    }

    /// Fetches one of the caller's books.
    pub async fn get(&self, ctx: &TenantContext, id: i64) -> StorageResult<Book> {
        let mut scope = self.enter(ctx).await?;
        let result = scope
            .connection()
            .get_book(id)
            .await
            .and_then(|book| book.ok_or_else(|| StorageError::not_found("Book", id)));
        finish(scope, result).await
    }

    /// Creates a book in the caller's schema.
    pub async fn create(&self, ctx: &TenantContext, book: NewBook) -> StorageResult<Book> {
        book.validate()?;
        let mut scope = self.enter(ctx).await?;
        let result = scope.connection().insert_book(&book).await;
        if let Ok(created) = &result {
            debug!(schema = %ctx.schema(), book_id = created.id, "Created book");
        }
        finish(scope, result).await
    }

    /// Renames one of the caller's books.
    ///
    /// A blank name is rejected before any scope is entered.
    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: i64,
        update: BookUpdate,
    ) -> StorageResult<Book> {
        update.validate()?;
        let mut scope = self.enter(ctx).await?;
        let result: StorageResult<Book> = async {
            let conn = scope.connection();
            if conn.get_book(id).await?.is_none() {
                return Err(StorageError::not_found("Book", id));
            }
            conn.update_book(id, &update)
                .await?
                .ok_or_else(|| StorageError::not_found("Book", id))
        }
        .await;
        finish(scope, result).await
    }

    /// Deletes one of the caller's books.
    pub async fn delete(&self, ctx: &TenantContext, id: i64) -> StorageResult<()> {
        let mut scope = self.enter(ctx).await?;
        let result: StorageResult<()> = async {
            let conn = scope.connection();
            if conn.get_book(id).await?.is_none() {
                return Err(StorageError::not_found("Book", id));
            }
            if !conn.delete_book(id).await? {
                return Err(StorageError::not_found("Book", id));
            }
            Ok(())
        }
        .await;
        finish(scope, result).await
    }

    async fn active_tenant(&self, ctx: &TenantContext) -> StorageResult<Tenant> {
        let tenant = self
            .backend
            .find_by_schema(ctx.schema())
            .await?
            .ok_or_else(|| TenantError::UnknownTenant {
                schema: ctx.schema().to_string(),
            })?;

        if !tenant.is_active() {
            return Err(TenantError::NotActive {
                schema: ctx.schema().to_string(),
                status: tenant.status,
            }
            .into());
        }
        Ok(tenant)
    }

    async fn enter(&self, ctx: &TenantContext) -> StorageResult<SchemaScope> {
        let tenant = self.active_tenant(ctx).await?;
        debug!(
            tenant_id = tenant.id,
            schema = %tenant.schema_name,
            correlation_id = ctx.correlation_id().unwrap_or("-"),
            "Entering tenant scope"
        );
        self.backend.enter(&tenant.schema_name).await
    }
}

/// Releases `scope`, preferring the operation's error over a release error.
async fn finish<T>(scope: SchemaScope, result: StorageResult<T>) -> StorageResult<T> {
    let schema = scope.schema().clone();
    match (result, scope.release().await) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(release)) => Err(release),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(release)) => {
            error!(schema = %schema, error = %release, "Failed to release scope after error");
            Err(e)
        }
    }
}
