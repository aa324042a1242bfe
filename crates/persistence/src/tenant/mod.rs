//! Tenant identity for schema-per-tenant storage.
//!
//! - [`SchemaName`] - validated namespace identifier derived from a domain URL or request host
//! - [`Tenant`] / [`TenantStatus`] - catalog records and their lifecycle states
//! - [`TenantContext`] - the tenant resolved for a single request
//!
//! # Examples
//!
//! ```
//! use atrium_persistence::tenant::{SchemaName, TenantContext};
//!
//! let schema = SchemaName::from_host("acme.example.com:8080", None).unwrap();
//! let ctx = TenantContext::new(schema).with_correlation_id("req-1");
//!
//! assert_eq!(ctx.schema().as_str(), "acme");
//! assert_eq!(ctx.correlation_id(), Some("req-1"));
//! ```
//!
//! With a configured base domain, only the label directly in front of it counts:
//!
//! ```
//! use atrium_persistence::tenant::SchemaName;
//!
//! let schema = SchemaName::from_host("acme.localhost:8080", Some("localhost")).unwrap();
//! assert_eq!(schema.as_str(), "acme");
//! assert!(SchemaName::from_host("localhost:8080", Some("localhost")).is_err());
//! ```

mod context;
mod model;
mod schema;

pub use context::TenantContext;
pub use model::{Tenant, TenantStatus};
pub use schema::{MAX_SCHEMA_NAME_LEN, SchemaName};
