//! Core storage traits and abstractions.
//!
//! - [`Backend`] - a complete storage driver: catalog, namespaces and scopes
//! - [`TenantCatalog`] - tenant records, stored outside every tenant namespace
//! - [`NamespaceManager`] - creation and teardown of tenant namespaces
//! - [`SchemaBinding`] - entering a [`SchemaScope`] bound to one namespace
//! - [`BoundConnection`] - book operations on a handle bound to a namespace
//!
//! # Trait Hierarchy
//!
//! ```text
//! Backend
//!     ├── TenantCatalog
//!     ├── NamespaceManager
//!     └── SchemaBinding ── enter() ──> SchemaScope ── connection() ──> BoundConnection
//! ```
//!
//! The lifecycle workflows only use [`TenantCatalog`] and [`NamespaceManager`];
//! the book gateway only uses [`TenantCatalog`] lookups and [`SchemaBinding`].

mod backend;
mod catalog;
mod namespace;
mod scope;

pub use backend::{Backend, BackendKind};
pub use catalog::TenantCatalog;
pub use namespace::{NAMESPACE_VERSION, NamespaceManager};
pub use scope::{BoundConnection, SchemaBinding, SchemaScope};
