//! Tenant catalog records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SchemaName;
use crate::error::BackendError;

/// Lifecycle state of a tenant.
///
/// Tenants move strictly forward: `Provisioning` → `Active` → `Decommissioning`,
/// after which the record is deleted. A tenant whose namespace migration
/// failed stays in `Provisioning` until it is decommissioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    /// Record registered, namespace not yet migrated.
    Provisioning,
    /// Namespace migrated; resource operations are accepted.
    Active,
    /// Removal accepted; resource operations are rejected.
    Decommissioning,
}

impl TenantStatus {
    /// Returns the stored representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Provisioning => "provisioning",
            TenantStatus::Active => "active",
            TenantStatus::Decommissioning => "decommissioning",
        }
    }
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TenantStatus {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provisioning" => Ok(TenantStatus::Provisioning),
            "active" => Ok(TenantStatus::Active),
            "decommissioning" => Ok(TenantStatus::Decommissioning),
            other => Err(BackendError::CorruptRow {
                table: "tenants".to_string(),
                message: format!("unknown tenant status '{other}'"),
            }),
        }
    }
}

/// A registered tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Domain URL as supplied at provisioning time.
    pub domain_url: String,
    /// Namespace holding the tenant's data.
    pub schema_name: SchemaName,
    /// Current lifecycle state.
    pub status: TenantStatus,
    /// When the record was registered.
    pub created_at: DateTime<Utc>,
    /// When the status last changed.
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Returns `true` if resource operations are accepted for this tenant.
    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        for status in [
            TenantStatus::Provisioning,
            TenantStatus::Active,
            TenantStatus::Decommissioning,
        ] {
            assert_eq!(status.as_str().parse::<TenantStatus>().unwrap(), status);
        }
        assert!("removed".parse::<TenantStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&TenantStatus::Decommissioning).unwrap(),
            "\"decommissioning\""
        );
    }
}
