//! Common test utilities for API testing.
//!
//! - [`harness`] - Test server over a temporary SQLite data directory

#![allow(dead_code)]

pub mod harness;
