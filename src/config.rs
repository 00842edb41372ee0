use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::dashboard::ColorScheme;
use crate::models::TimeWindow;

/// Application-level constants
pub const APP_NAME: &str = "HealthSpend";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8740";

pub const ENV_DATABASE: &str = "HEALTHSPEND_DB";
pub const ENV_BIND: &str = "HEALTHSPEND_BIND";
pub const ENV_DEFAULT_WINDOW: &str = "HEALTHSPEND_DEFAULT_WINDOW";
pub const ENV_COLOR_SCHEME: &str = "HEALTHSPEND_COLOR_SCHEME";

/// Application data directory: ~/HealthSpend/ (falls back to the working
/// directory when no home directory can be determined)
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the records database
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("records.db")
}

/// Log filter used when `RUST_LOG` is not set
pub fn default_log_filter() -> &'static str {
    "healthspend=info,tower_http=info"
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Dashboard behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardConfig {
    pub default_window: TimeWindow,
    pub color_scheme: ColorScheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Read configuration from `HEALTHSPEND_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path = lookup(ENV_DATABASE)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let bind_raw = lookup(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.trim().parse().map_err(|e: std::net::AddrParseError| ConfigError {
            key: ENV_BIND,
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let default_window = match lookup(ENV_DEFAULT_WINDOW) {
            Some(raw) => raw.parse().map_err(|e: crate::models::UnknownWindow| ConfigError {
                key: ENV_DEFAULT_WINDOW,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => TimeWindow::default(),
        };

        let color_scheme = match lookup(ENV_COLOR_SCHEME) {
            Some(raw) => raw.parse().map_err(|e: crate::dashboard::UnknownColorScheme| ConfigError {
                key: ENV_COLOR_SCHEME,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => ColorScheme::default(),
        };

        Ok(Self {
            database_path,
            bind_addr,
            dashboard: DashboardConfig {
                default_window,
                color_scheme,
            },
        })
    }
}
