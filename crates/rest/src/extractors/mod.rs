//! Axum extractors for the Atrium API.
//!
//! - [`TenantExtractor`] - The tenant resolved for the request
//! - [`JsonBody`] - JSON request body with API-shaped rejections
//! - [`RecordId`] - Numeric `{id}` path parameter

mod json_body;
mod record_id;
mod tenant;

pub use json_body::JsonBody;
pub use record_id::RecordId;
pub use tenant::TenantExtractor;
