use crate::config::ConfigError;
use crate::datasource::DataSourceError;
use crate::notify::NotifyError;
use thiserror::Error;

/// Fatal conditions that stop the monitor.
///
/// Fetch and dispatch failures inside a cycle are recovered locally and only
/// reach this type while building the clients at startup.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to build data source: {0}")]
    DataSource(#[from] DataSourceError),
    #[error("Failed to build notifier: {0}")]
    Notifier(#[from] NotifyError),
    #[error("Monitoring cycle failed: {0}")]
    CycleFailed(String),
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
