//! Data source abstraction for fetching account state from the exchange.

use crate::domain::{Fill, PositionSnapshot};
use async_trait::async_trait;
use std::fmt;

pub mod hyperliquid;
pub mod mock;

pub use hyperliquid::HyperliquidDataSource;
pub use mock::MockDataSource;

/// Data source trait for fetching positions and recent fills of one address.
///
/// Failures surface as an error, never as partial data. Implementations do not
/// retry; a failed call is skipped until the next poll.
#[async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Fetch the current open positions.
    async fn fetch_positions(&self, user: &str) -> Result<PositionSnapshot, DataSourceError>;

    /// Fetch the recent fills window, in the order the source returns them.
    async fn fetch_fills(&self, user: &str) -> Result<Vec<Fill>, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    /// Network error (e.g., connection refused, DNS failure)
    NetworkError(String),
    /// The per-call timeout elapsed
    Timeout,
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Other error
    Other(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::Timeout => write!(f, "Request timed out"),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}

impl From<reqwest::Error> for DataSourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DataSourceError::Timeout
        } else if err.is_decode() {
            DataSourceError::ParseError(err.to_string())
        } else {
            DataSourceError::NetworkError(err.to_string())
        }
    }
}
