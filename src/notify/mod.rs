//! Notification sinks that deliver rendered alerts.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod mock;
pub mod telegram;

pub use mock::RecordingNotifier;
pub use telegram::TelegramNotifier;

/// Markup dialect a sink understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Markup {
    /// `<b>` for bold and `<code>` for inline code; dynamic text is escaped.
    Html,
    /// No markup; emphasis markers are dropped.
    #[default]
    Plain,
}

/// A destination for notification text.
#[async_trait]
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Deliver one message.
    async fn send(&self, text: &str) -> Result<(), NotifyError>;

    /// Markup this sink renders. Sinks that cannot render markup keep the default.
    fn markup(&self) -> Markup {
        Markup::Plain
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Notification error: {0}")]
    Other(String),
}

// The Bot API URL embeds the token, so it never reaches the error text.
impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NotifyError::Timeout
        } else {
            NotifyError::Network(err.without_url().to_string())
        }
    }
}
