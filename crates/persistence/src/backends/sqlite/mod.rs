//! SQLite backend implementation.
//!
//! Suited to development and single-node deployments.
//!
//! # Layout
//!
//! ```text
//! {data_dir}/
//!     catalog.db          -- tenants table
//!     schemas/
//!         acme.db         -- books + schema_version for tenant "acme"
//!         globex.db
//! ```
//!
//! # Example
//!
//! ```no_run
//! use atrium_persistence::backends::sqlite::SqliteBackend;
//! use atrium_persistence::core::Backend;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::open("./data")?;
//! backend.initialize().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! -- catalog.db
//! CREATE TABLE tenants (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     domain_url TEXT NOT NULL UNIQUE,
//!     schema_name TEXT NOT NULL UNIQUE,
//!     status TEXT NOT NULL,
//!     created_at TEXT NOT NULL,
//!     updated_at TEXT NOT NULL
//! );
//!
//! -- schemas/{schema}.db
//! CREATE TABLE books (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     name TEXT NOT NULL,
//!     tenant_schema TEXT NOT NULL,
//!     created_at TEXT NOT NULL,
//!     updated_at TEXT NOT NULL
//! );
//! ```

mod backend;
mod catalog;
mod namespace;
mod schema;
mod scope;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use scope::SqliteScopedConnection;
