//! Atrium server
//!
//! A multi-tenant backend that keeps each tenant's data in its own schema.

use std::sync::Arc;

use atrium_persistence::core::Backend;
use atrium_rest::{
    Server, ServerConfig, StorageBackendMode, create_app_with_config, init_logging,
    shutdown_signal,
};
use clap::Parser;
use tracing::info;

/// Binds the listener and serves until SIGINT/SIGTERM, then drains.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let server = Server::init(app, config).await?;
    let handle = server.shutdown_handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        handle.shutdown();
    });

    server.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let backend_mode = config
        .storage_backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid storage backend configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %backend_mode,
        base_domain = config.base_domain.as_deref().unwrap_or("-"),
        "Starting Atrium server"
    );

    match backend_mode {
        StorageBackendMode::Sqlite => start_sqlite(config).await,
        StorageBackendMode::Postgres => start_postgres(config).await,
    }
}

/// Starts the server with the SQLite backend.
#[cfg(feature = "sqlite")]
async fn start_sqlite(config: ServerConfig) -> anyhow::Result<()> {
    use atrium_persistence::backends::sqlite::SqliteBackend;

    info!(data_dir = %config.data_dir.display(), "Initializing SQLite backend");
    let backend = SqliteBackend::open(&config.data_dir)?;
    backend.initialize().await?;

    let app = create_app_with_config(Arc::new(backend), config.clone());
    serve(app, &config).await
}

/// Fallback when sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
async fn start_sqlite(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The sqlite backend requires the 'sqlite' feature. \
         Build with: cargo build -p atrium-server --features sqlite"
    )
}

/// Starts the server with the PostgreSQL backend.
#[cfg(feature = "postgres")]
async fn start_postgres(config: ServerConfig) -> anyhow::Result<()> {
    use atrium_persistence::backends::postgres::PostgresBackend;

    let backend = match config.database_url.as_deref() {
        Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {
            info!("Initializing PostgreSQL backend from connection string");
            PostgresBackend::from_connection_string(url).await?
        }
        _ => {
            info!("Initializing PostgreSQL backend from environment variables");
            PostgresBackend::from_env().await?
        }
    };
    backend.initialize().await?;

    let app = create_app_with_config(Arc::new(backend), config.clone());
    serve(app, &config).await
}

/// Fallback when postgres feature is not enabled.
#[cfg(not(feature = "postgres"))]
async fn start_postgres(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The postgres backend requires the 'postgres' feature. \
         Build with: cargo build -p atrium-server --features postgres"
    )
}

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("At least one database backend feature must be enabled");
