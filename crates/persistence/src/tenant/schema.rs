//! Schema name derivation and validation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::{Host, Url};

use crate::error::ValidationError;

/// Maximum schema name length (PostgreSQL identifier limit).
pub const MAX_SCHEMA_NAME_LEN: usize = 63;

static SCHEMA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_]*$").expect("schema pattern is a valid regex")
});

/// Names the backends reserve for themselves.
const RESERVED: &[&str] = &["public", "information_schema", "main", "temp"];

/// A validated storage namespace identifier.
///
/// Schema names are lower-case ASCII identifiers (`[a-z_][a-z0-9_]*`, at most
/// 63 characters) that do not collide with names reserved by either backend.
/// Hyphens in a subdomain are normalized to underscores, so `my-shop.example.com`
/// maps to `my_shop`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaName(String);

impl SchemaName {
    /// Validates `name` as a schema name.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let invalid = |message: &str| ValidationError::InvalidSchemaName {
            name: name.clone(),
            message: message.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("schema name is empty"));
        }
        if name.len() > MAX_SCHEMA_NAME_LEN {
            return Err(invalid(&format!(
                "exceeds maximum length of {MAX_SCHEMA_NAME_LEN} characters"
            )));
        }
        if !SCHEMA_PATTERN.is_match(&name) {
            return Err(invalid(
                "must start with a letter or underscore and contain only lowercase letters, digits and underscores",
            ));
        }
        if name.starts_with("pg_") || RESERVED.contains(&name.as_str()) {
            return Err(invalid("name is reserved"));
        }

        Ok(Self(name))
    }

    /// Derives a schema name from a tenant's domain URL.
    ///
    /// The scheme, port and path are optional and ignored; the subdomain of the
    /// host becomes the schema name.
    pub fn from_domain_url(
        domain_url: &str,
        base_domain: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let trimmed = domain_url.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: "domainURL".to_string(),
            });
        }

        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };
        let host = hostname(&candidate, domain_url)?;
        Self::from_hostname(&host, base_domain)
    }

    /// Derives a schema name from a request `Host` value (`name[:port]`).
    pub fn from_host(host: &str, base_domain: Option<&str>) -> Result<Self, ValidationError> {
        let host = hostname(&format!("http://{}", host.trim()), host)?;
        Self::from_hostname(&host, base_domain)
    }

    fn from_hostname(host: &str, base_domain: Option<&str>) -> Result<Self, ValidationError> {
        let host = host.trim_end_matches('.');
        let missing = || ValidationError::MissingSubdomain {
            host: host.to_string(),
        };

        let label = match base_domain {
            Some(base) => {
                let base = base.trim_matches('.').to_ascii_lowercase();
                host.strip_suffix(base.as_str())
                    .and_then(|rest| rest.strip_suffix('.'))
                    .filter(|label| !label.is_empty() && !label.contains('.'))
                    .ok_or_else(missing)?
            }
            None => {
                let labels: Vec<&str> = host.split('.').collect();
                if labels.len() < 3 || labels.iter().any(|l| l.is_empty()) {
                    return Err(missing());
                }
                labels[0]
            }
        };

        Self::new(label.replace('-', "_"))
    }

    /// Returns the schema name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extracts the lower-cased domain of `candidate`; IP literals have no subdomain.
fn hostname(candidate: &str, original: &str) -> Result<String, ValidationError> {
    let parsed = Url::parse(candidate).map_err(|e| ValidationError::InvalidDomainUrl {
        domain_url: original.to_string(),
        message: e.to_string(),
    })?;

    match parsed.host() {
        Some(Host::Domain(domain)) => Ok(domain.to_ascii_lowercase()),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Err(ValidationError::MissingSubdomain {
            host: original.to_string(),
        }),
        None => Err(ValidationError::InvalidDomainUrl {
            domain_url: original.to_string(),
            message: "no host".to_string(),
        }),
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SchemaName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SchemaName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SchemaName> for String {
    fn from(value: SchemaName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_domain_url_variants() {
        for input in [
            "acme.example.com",
            "ACME.Example.com",
            "http://acme.example.com",
            "https://acme.example.com:8443/path?q=1",
            "  acme.example.com  ",
        ] {
            let schema = SchemaName::from_domain_url(input, None).unwrap();
            assert_eq!(schema.as_str(), "acme", "input: {input}");
        }
    }

    #[test]
    fn test_from_domain_url_is_deterministic() {
        let a = SchemaName::from_domain_url("shop.example.org", None).unwrap();
        let b = SchemaName::from_domain_url("https://shop.example.org/", None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_domain_url_without_subdomain() {
        let err = SchemaName::from_domain_url("example.com", None).unwrap_err();
        assert!(matches!(err, ValidationError::MissingSubdomain { .. }));

        let err = SchemaName::from_domain_url("localhost", None).unwrap_err();
        assert!(matches!(err, ValidationError::MissingSubdomain { .. }));
    }

    #[test]
    fn test_from_domain_url_empty() {
        let err = SchemaName::from_domain_url("   ", None).unwrap_err();
        assert!(matches!(err, ValidationError::MissingRequiredField { .. }));
    }

    #[test]
    fn test_from_domain_url_ip_literal() {
        let err = SchemaName::from_domain_url("http://10.0.0.1:8080", None).unwrap_err();
        assert!(matches!(err, ValidationError::MissingSubdomain { .. }));
    }

    #[test]
    fn test_hyphen_normalized() {
        let schema = SchemaName::from_domain_url("my-shop.example.com", None).unwrap();
        assert_eq!(schema.as_str(), "my_shop");
    }

    #[test]
    fn test_from_host_strips_port() {
        let schema = SchemaName::from_host("acme.example.com:8080", None).unwrap();
        assert_eq!(schema.as_str(), "acme");
    }

    #[test]
    fn test_from_host_with_base_domain() {
        let schema = SchemaName::from_host("globex.localhost:8080", Some("localhost")).unwrap();
        assert_eq!(schema.as_str(), "globex");

        let schema = SchemaName::from_host("globex.example.com", Some(".example.com")).unwrap();
        assert_eq!(schema.as_str(), "globex");

        assert!(SchemaName::from_host("a.b.example.com", Some("example.com")).is_err());
        assert!(SchemaName::from_host("globex.other.com", Some("example.com")).is_err());
        assert!(SchemaName::from_host("example.com", Some("example.com")).is_err());
    }

    #[test]
    fn test_invalid_names() {
        assert!(SchemaName::new("").is_err());
        assert!(SchemaName::new("1acme").is_err());
        assert!(SchemaName::new("Acme").is_err());
        assert!(SchemaName::new("ac;me").is_err());
        assert!(SchemaName::new("pg_catalog").is_err());
        assert!(SchemaName::new("public").is_err());
        assert!(SchemaName::new("main").is_err());
        assert!(SchemaName::new("a".repeat(64)).is_err());
        assert!(SchemaName::new("a".repeat(63)).is_ok());
        assert!(SchemaName::new("_acme_2").is_ok());
    }

    #[test]
    fn test_invalid_subdomain_rejected() {
        let err = SchemaName::from_domain_url("1st.example.com", None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSchemaName { .. }));

        assert!(SchemaName::from_domain_url("www.public.example.com", None).is_ok());
        let err = SchemaName::from_domain_url("public.example.com", None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSchemaName { .. }));
    }

    #[test]
    fn test_serde_validates() {
        let schema: SchemaName = serde_json::from_str("\"acme\"").unwrap();
        assert_eq!(schema.as_str(), "acme");
        assert_eq!(serde_json::to_string(&schema).unwrap(), "\"acme\"");
        assert!(serde_json::from_str::<SchemaName>("\"pg_toast\"").is_err());
    }
}
