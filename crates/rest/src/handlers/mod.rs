//! HTTP request handlers.
//!
//! - [`tenants`] - Tenant provisioning, lookup and decommissioning
//! - [`books`] - Tenant-scoped book CRUD
//! - [`health`] - Health check endpoint

pub mod books;
pub mod health;
pub mod tenants;

// Re-export handlers for convenience
pub use books::{
    create_book_handler, delete_book_handler, get_book_handler, list_books_handler,
    update_book_handler,
};
pub use health::health_handler;
pub use tenants::{create_tenant_handler, delete_tenant_handler, get_tenant_handler};
