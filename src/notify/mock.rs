//! In-memory sink for tests.

use super::{Markup, Notifier, NotifyError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Records every delivered message; can be told to fail some sends.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    markup: Markup,
    delivered: Mutex<Vec<String>>,
    attempts: Mutex<usize>,
    fail_matching: Vec<String>,
    fail_all: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }

    /// Reject any message containing `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_matching.push(needle.to_string());
        self
    }

    /// Reject every message.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Messages delivered so far, in send order.
    pub fn messages(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of send calls, failed ones included.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        *self.attempts.lock().unwrap_or_else(|e| e.into_inner()) += 1;

        if self.fail_all || self.fail_matching.iter().any(|n| text.contains(n.as_str())) {
            return Err(NotifyError::Http {
                status: 500,
                message: "rejected by test sink".to_string(),
            });
        }

        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(text.to_string());
        Ok(())
    }

    fn markup(&self) -> Markup {
        self.markup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_and_fails_selectively() {
        let sink = RecordingNotifier::new().failing_on("ETH");

        assert!(sink.send("BTC opened").await.is_ok());
        assert!(sink.send("ETH opened").await.is_err());
        assert!(sink.send("SOL opened").await.is_ok());

        assert_eq!(sink.messages(), vec!["BTC opened", "SOL opened"]);
        assert_eq!(sink.attempts(), 3);
    }
}
