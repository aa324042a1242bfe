//! Server configuration for the Atrium HTTP API.
//!
//! Configuration can come from command line arguments, environment variables
//! or be built programmatically.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ATRIUM_SERVER_PORT` | 8080 | Server port |
//! | `ATRIUM_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `ATRIUM_LOG_LEVEL` | info | Log level |
//! | `ATRIUM_REQUEST_TIMEOUT` | 10 | Request timeout (seconds) |
//! | `ATRIUM_SHUTDOWN_TIMEOUT` | 5 | Graceful shutdown window (seconds) |
//! | `ATRIUM_MAX_BODY_SIZE` | 1048576 | Max request body (bytes) |
//! | `ATRIUM_ENABLE_CORS` | true | Enable CORS |
//! | `ATRIUM_CORS_ORIGINS` | * | Allowed origins |
//! | `ATRIUM_STORAGE_BACKEND` | sqlite | `sqlite` or `postgres` |
//! | `ATRIUM_DATA_DIR` | ./data | SQLite catalog and namespace files |
//! | `ATRIUM_DATABASE_URL` | - | PostgreSQL connection string |
//! | `ATRIUM_BASE_DOMAIN` | - | Base domain for subdomain extraction |
//! | `ATRIUM_TENANT_SKIP_PATHS` | /tenants,/health | Paths exempt from tenant resolution |
//! | `ATRIUM_ENABLE_REQUEST_ID` | true | Generate and propagate `x-request-id` |
//!
//! # Example
//!
//! ```rust
//! use atrium_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     base_domain: Some("localhost".to_string()),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;

/// Which storage backend the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackendMode {
    /// SQLite catalog plus one database file per tenant.
    #[default]
    Sqlite,
    /// PostgreSQL with one schema per tenant.
    Postgres,
}

impl fmt::Display for StorageBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackendMode::Sqlite => write!(f, "sqlite"),
            StorageBackendMode::Postgres => write!(f, "postgres"),
        }
    }
}

impl FromStr for StorageBackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackendMode::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(StorageBackendMode::Postgres),
            other => Err(format!(
                "unknown storage backend '{other}' (expected sqlite or postgres)"
            )),
        }
    }
}

/// Server configuration for the Atrium HTTP API.
#[derive(Debug, Clone, Parser)]
#[command(name = "atrium")]
#[command(about = "Multi-tenant schema-per-tenant backend")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "ATRIUM_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "ATRIUM_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "ATRIUM_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "ATRIUM_REQUEST_TIMEOUT", default_value = "10")]
    pub request_timeout: u64,

    /// Seconds to wait for in-flight requests during shutdown.
    #[arg(long, env = "ATRIUM_SHUTDOWN_TIMEOUT", default_value = "5")]
    pub shutdown_timeout: u64,

    /// Maximum request body size in bytes.
    #[arg(long, env = "ATRIUM_MAX_BODY_SIZE", default_value = "1048576")]
    pub max_body_size: usize,

    /// Enable CORS.
    #[arg(long, env = "ATRIUM_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "ATRIUM_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Storage backend.
    #[arg(long, env = "ATRIUM_STORAGE_BACKEND", default_value = "sqlite")]
    pub storage_backend: String,

    /// Directory holding the SQLite catalog and tenant namespace files.
    #[arg(long, env = "ATRIUM_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// PostgreSQL connection string.
    #[arg(long, env = "ATRIUM_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Base domain; the label directly before it names the tenant.
    #[arg(long, env = "ATRIUM_BASE_DOMAIN")]
    pub base_domain: Option<String>,

    /// Path prefixes exempt from tenant resolution (comma-separated).
    #[arg(
        long,
        env = "ATRIUM_TENANT_SKIP_PATHS",
        default_value = "/tenants,/health",
        value_delimiter = ','
    )]
    pub tenant_skip_paths: Vec<String>,

    /// Enable request ID generation and propagation.
    #[arg(long, env = "ATRIUM_ENABLE_REQUEST_ID", default_value = "true")]
    pub enable_request_id: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 10,
            shutdown_timeout: 5,
            max_body_size: 1024 * 1024,
            enable_cors: true,
            cors_origins: "*".to_string(),
            storage_backend: "sqlite".to_string(),
            data_dir: PathBuf::from("./data"),
            database_url: None,
            base_domain: None,
            tenant_skip_paths: vec!["/tenants".to_string(), "/health".to_string()],
            enable_request_id: true,
        }
    }
}

impl ServerConfig {
    /// Reads configuration from environment variables, ignoring argv.
    pub fn from_env() -> Self {
        Self::try_parse_from(["atrium"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the parsed storage backend.
    pub fn storage_backend_mode(&self) -> Result<StorageBackendMode, String> {
        self.storage_backend.parse()
    }

    /// Returns the request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Returns the shutdown window as a [`Duration`].
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Validates the configuration, reporting every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if let Err(e) = self.storage_backend_mode() {
            errors.push(e);
        }

        if let Some(base) = &self.base_domain {
            if base.trim_matches('.').is_empty() {
                errors.push("Base domain cannot be empty".to_string());
            }
        }

        for path in &self.tenant_skip_paths {
            if !path.starts_with('/') {
                errors.push(format!("Tenant skip path '{path}' must start with '/'"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses an ephemeral port, `localhost` as the base domain and short
    /// timeouts.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            shutdown_timeout: 1,
            enable_cors: false,
            base_domain: Some("localhost".to_string()),
            enable_request_id: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.tenant_skip_paths, vec!["/tenants", "/health"]);
        assert!(config.enable_cors);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_storage_backend_mode() {
        let mut config = ServerConfig::default();
        assert_eq!(config.storage_backend_mode(), Ok(StorageBackendMode::Sqlite));

        config.storage_backend = "PostgreSQL".to_string();
        assert_eq!(
            config.storage_backend_mode(),
            Ok(StorageBackendMode::Postgres)
        );

        config.storage_backend = "mongodb".to_string();
        assert!(config.storage_backend_mode().is_err());
    }

    #[test]
    fn test_validate_valid() {
        assert!(ServerConfig::default().validate().is_ok());
        assert!(ServerConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_all_errors() {
        let config = ServerConfig {
            request_timeout: 0,
            storage_backend: "oracle".to_string(),
            tenant_skip_paths: vec!["tenants".to_string()],
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("timeout")));
        assert!(errors.iter().any(|e| e.contains("oracle")));
        assert!(errors.iter().any(|e| e.contains("skip path")));
    }

    #[test]
    fn test_parse_from_args() {
        let config = ServerConfig::try_parse_from([
            "atrium",
            "--port",
            "9000",
            "--tenant-skip-paths",
            "/tenants,/admin",
            "--base-domain",
            "example.com",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.tenant_skip_paths, vec!["/tenants", "/admin"]);
        assert_eq!(config.base_domain.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
        assert_eq!(config.base_domain.as_deref(), Some("localhost"));
    }
}
