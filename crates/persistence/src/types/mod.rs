//! Tenant-owned resource types.
//!
//! Every value here lives inside a single tenant namespace and is only read or
//! written through a [`SchemaScope`](crate::core::SchemaScope).

mod book;

pub use book::{Book, BookUpdate, NewBook};
