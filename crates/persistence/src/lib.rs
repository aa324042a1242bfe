//! Atrium Persistence Layer
//!
//! This crate owns everything below the HTTP surface of the Atrium
//! multi-tenant backend: the tenant catalog, per-tenant storage namespaces,
//! scoped binding of storage handles to a namespace, the provisioning and
//! decommissioning workflows, and the tenant-scoped book gateway.
//!
//! # Backend Features
//!
//! - `sqlite` (default) - a catalog database plus one database file per tenant
//!   namespace, attached to a single shared connection for the duration of a scope
//! - `postgres` - one PostgreSQL schema per tenant, bound by `search_path` on an
//!   exclusive pooled connection
//!
//! # Architecture
//!
//! - [`tenant`] - schema names, tenant records, and the per-request [`TenantContext`](tenant::TenantContext)
//! - [`types`] - the tenant-owned `Book` resource
//! - [`error`] - error taxonomy for all operations
//! - [`core`] - catalog, namespace and schema-binding traits plus [`SchemaScope`](core::SchemaScope)
//! - [`lifecycle`] - provisioning and decommissioning workflows
//! - [`gateway`] - tenant-scoped book operations
//! - [`backends`] - SQLite and PostgreSQL implementations
//!
//! # Schema Names
//!
//! A tenant's namespace is named after the subdomain of its domain URL:
//!
//! ```
//! use atrium_persistence::tenant::SchemaName;
//!
//! let schema = SchemaName::from_domain_url("https://acme.example.com", None).unwrap();
//! assert_eq!(schema.as_str(), "acme");
//!
//! assert!(SchemaName::from_domain_url("example.com", None).is_err());
//! ```
//!
//! # Scopes
//!
//! All reads and writes of tenant-owned data run inside a [`SchemaScope`](core::SchemaScope).
//! Entering a scope binds a storage handle to exactly one namespace; releasing it
//! (or dropping it on an early return) restores the handle.
//!
//! ```ignore
//! let mut scope = backend.enter(&schema).await?;
//! let books = scope.connection().list_books().await;
//! scope.release().await?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod tenant;
pub mod types;

pub use error::{StorageError, StorageResult};
