//! SQLite backend implementation.

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::{Backend, BackendKind};
use crate::error::{BackendError, StorageError, StorageResult};
use crate::tenant::SchemaName;

use super::schema;

/// SQLite backend for the tenant catalog and tenant namespaces.
///
/// The catalog lives in `{data_dir}/catalog.db`; each tenant namespace is a
/// separate database file in `{data_dir}/schemas/`. All work goes through one
/// shared connection to the catalog. A schema scope holds that connection's
/// lock while the tenant's file is attached, so only one namespace binding is
/// live at a time.
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
    data_dir: PathBuf,
    config: SqliteBackendConfig,
}

impl Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("data_dir", &self.data_dir)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Configuration for the SQLite backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteBackendConfig {
    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,

    /// Enable WAL mode on the catalog database.
    #[serde(default = "default_true")]
    pub enable_wal: bool,
}

fn default_busy_timeout_ms() -> u32 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for SqliteBackendConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: default_busy_timeout_ms(),
            enable_wal: true,
        }
    }
}

impl SqliteBackend {
    /// Opens or creates a backend rooted at `data_dir`.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> StorageResult<Self> {
        Self::with_config(data_dir, SqliteBackendConfig::default())
    }

    /// Creates a backend with custom configuration.
    pub fn with_config<P: AsRef<Path>>(
        data_dir: P,
        config: SqliteBackendConfig,
    ) -> StorageResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(data_dir.join("schemas")).map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: "sqlite".to_string(),
                message: format!("Failed to create data directory {}: {}", data_dir.display(), e),
            })
        })?;

        let conn = Connection::open(data_dir.join("catalog.db")).map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: "sqlite".to_string(),
                message: e.to_string(),
            })
        })?;
        Self::configure_connection(&conn, &config)?;

        tracing::info!(data_dir = %data_dir.display(), "Opened SQLite backend");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            data_dir,
            config,
        })
    }

    /// Initialize the catalog schema.
    pub async fn init_schema(&self) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        schema::initialize_catalog(&conn)
    }

    /// Configure connection settings.
    fn configure_connection(conn: &Connection, config: &SqliteBackendConfig) -> StorageResult<()> {
        conn.busy_timeout(std::time::Duration::from_millis(
            config.busy_timeout_ms as u64,
        ))
        .map_err(|e| {
            StorageError::Backend(BackendError::Internal {
                backend_name: "sqlite".to_string(),
                message: format!("Failed to set busy timeout: {}", e),
                source: None,
            })
        })?;

        if config.enable_wal {
            conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
                .map_err(|e| {
                    StorageError::Backend(BackendError::Internal {
                        backend_name: "sqlite".to_string(),
                        message: format!("Failed to enable WAL mode: {}", e),
                        source: None,
                    })
                })?;
        }

        Ok(())
    }

    /// Returns the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &SqliteBackendConfig {
        &self.config
    }

    /// Path of the database file holding `schema`.
    pub fn namespace_path(&self, schema: &SchemaName) -> PathBuf {
        self.data_dir
            .join("schemas")
            .join(format!("{}.db", schema.as_str()))
    }

    /// The shared connection.
    pub(crate) fn connection(&self) -> &Arc<Mutex<Connection>> {
        &self.conn
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn initialize(&self) -> StorageResult<()> {
        self.init_schema().await
    }

    async fn health_check(&self) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |_| Ok(())).map_err(|e| {
            StorageError::Backend(BackendError::Unavailable {
                backend_name: "sqlite".to_string(),
                message: format!("Health check failed: {}", e),
            })
        })
    }
}
