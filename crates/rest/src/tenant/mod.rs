//! Tenant identification for inbound requests.
//!
//! Every request outside the skip list is attributed to exactly one tenant by
//! the subdomain of its host:
//!
//! | Host | Base domain | Tenant schema |
//! |------|-------------|---------------|
//! | `acme.example.com` | none | `acme` |
//! | `acme.localhost:8080` | `localhost` | `acme` |
//! | `my-shop.example.com` | `example.com` | `my_shop` |
//! | `example.com` | none | *(unresolved)* |
//!
//! [`TenantResolver`] performs the derivation, the tenant middleware stores
//! the result as a [`TenantContext`](atrium_persistence::tenant::TenantContext)
//! in the request extensions, and [`RequestTenantExt`] reads it back.

mod context;
mod resolver;

pub use context::RequestTenantExt;
pub use resolver::{Resolution, TenantResolver};
