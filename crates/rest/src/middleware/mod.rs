//! HTTP middleware for the Atrium API.
//!
//! - [`tenant`] - Tenant resolution from the request host

pub mod tenant;

pub use tenant::tenant_middleware;
