//! Route configuration for the Atrium API.

pub mod api_routes;

pub use api_routes::create_routes;
