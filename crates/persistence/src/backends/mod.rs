//! Database backend implementations.
//!
//! Each backend is gated behind a feature flag.
//!
//! | Backend | Feature | Namespace | Scope binding |
//! |---------|---------|-----------|---------------|
//! | SQLite | `sqlite` | database file per tenant | `ATTACH` on one shared, locked connection |
//! | PostgreSQL | `postgres` | schema per tenant | `search_path` on an exclusive pooled connection |

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;
