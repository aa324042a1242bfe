//! PostgreSQL backend implementation.
//!
//! Tenants live in `public.tenants`; each tenant's data lives in its own
//! schema. Connections are pooled with deadpool-postgres.
//!
//! # Example
//!
//! ```no_run
//! use atrium_persistence::backends::postgres::{PostgresBackend, PostgresConfig};
//! use atrium_persistence::core::Backend;
//!
//! # async fn main_example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PostgresConfig::from_connection_string("postgres://atrium@localhost/atrium")?;
//! let backend = PostgresBackend::new(config).await?;
//! backend.initialize().await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod catalog;
mod namespace;
mod schema;
mod scope;

pub use backend::{PostgresBackend, PostgresConfig, PostgresSslMode};
pub use scope::PgScopedConnection;
