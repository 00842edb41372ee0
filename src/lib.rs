pub mod api;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod models;
pub mod store;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};
use crate::dashboard::DashboardState;
use crate::db::DatabaseError;
use crate::store::SqliteRecordStore;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the default
/// filter; a second call is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Open the records database, serve the dashboard API and block until
/// Ctrl-C.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    tracing::info!(path = %config.database_path.display(), "Opening records database");

    let store = Arc::new(SqliteRecordStore::open(&config.database_path)?);
    let dashboard = Arc::new(DashboardState::new(store, &config.dashboard));

    let mut server = api::start_dashboard_server(dashboard, config.bind_addr).await?;
    tracing::info!(addr = %server.session.server_addr, "Dashboard API listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupt received, shutting down");

    server.shutdown();
    server.stopped().await;
    Ok(())
}
