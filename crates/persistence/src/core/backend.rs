//! Backend abstraction for database drivers.

use std::fmt::Debug;

use async_trait::async_trait;

use super::{NamespaceManager, SchemaBinding, TenantCatalog};
use crate::error::StorageResult;

/// Identifies the type of database backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// SQLite catalog with one attached database file per namespace.
    Sqlite,
    /// PostgreSQL with one schema per namespace.
    Postgres,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Sqlite => write!(f, "sqlite"),
            BackendKind::Postgres => write!(f, "postgres"),
        }
    }
}

/// A storage backend usable by the lifecycle workflows and the book gateway.
///
/// Implementations are shared behind an `Arc` by every request task, so all
/// methods take `&self`.
#[async_trait]
pub trait Backend:
    TenantCatalog + NamespaceManager + SchemaBinding + Send + Sync + Debug + 'static
{
    /// Returns the kind of backend.
    fn kind(&self) -> BackendKind;

    /// Returns a human-readable name for this backend.
    fn name(&self) -> &'static str;

    /// Creates the tenant catalog if it does not exist yet.
    async fn initialize(&self) -> StorageResult<()>;

    /// Checks if the backend is healthy and accepting connections.
    async fn health_check(&self) -> StorageResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Sqlite.to_string(), "sqlite");
        assert_eq!(BackendKind::Postgres.to_string(), "postgres");
    }
}
