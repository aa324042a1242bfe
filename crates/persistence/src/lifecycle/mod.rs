//! Tenant lifecycle workflows.
//!
//! Provisioning and decommissioning are ordered multi-step sequences over the
//! tenant catalog and the tenant's namespace. Neither workflow compensates a
//! failed later step:
//!
//! - a failed migration leaves the record in `provisioning`; decommissioning
//!   such a tenant cleans it up
//! - a failed record delete after namespace teardown leaves a
//!   `decommissioning` record without a namespace; retrying the
//!   decommission completes it

mod decommission;
mod provision;

use std::sync::Arc;

use crate::core::Backend;

/// Runs provisioning and decommissioning against a backend.
#[derive(Debug)]
pub struct TenantLifecycle<B> {
    backend: Arc<B>,
    base_domain: Option<String>,
}

impl<B: Backend> TenantLifecycle<B> {
    /// Creates a lifecycle runner over `backend`.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            base_domain: None,
        }
    }

    /// Sets the base domain used to derive schema names from domain URLs.
    pub fn with_base_domain(mut self, base_domain: Option<String>) -> Self {
        self.base_domain = base_domain;
        self
    }

    /// Returns the backend.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }
}

impl<B> Clone for TenantLifecycle<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            base_domain: self.base_domain.clone(),
        }
    }
}
