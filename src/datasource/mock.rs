//! Mock data source for testing without network calls.

use super::{DataSource, DataSourceError};
use crate::domain::{Fill, PositionSnapshot};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted data source: each fetch pops the next queued response.
///
/// Once a queue is down to its last response, that response is returned for
/// every further call. An empty queue yields an empty snapshot / fill list.
#[derive(Debug, Default)]
pub struct MockDataSource {
    positions: Mutex<VecDeque<Result<PositionSnapshot, DataSourceError>>>,
    fills: Mutex<VecDeque<Result<Vec<Fill>, DataSourceError>>>,
}

impl MockDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful positions response.
    pub fn with_positions(self, snapshot: PositionSnapshot) -> Self {
        self.push_positions(Ok(snapshot));
        self
    }

    /// Queue a failing positions response.
    pub fn with_positions_error(self, err: DataSourceError) -> Self {
        self.push_positions(Err(err));
        self
    }

    /// Queue a successful fills response.
    pub fn with_fills(self, fills: Vec<Fill>) -> Self {
        self.push_fills(Ok(fills));
        self
    }

    /// Queue a failing fills response.
    pub fn with_fills_error(self, err: DataSourceError) -> Self {
        self.push_fills(Err(err));
        self
    }

    pub fn push_positions(&self, response: Result<PositionSnapshot, DataSourceError>) {
        self.positions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    pub fn push_fills(&self, response: Result<Vec<Fill>, DataSourceError>) {
        self.fills
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }
}

fn next_response<T: Clone + Default>(
    queue: &Mutex<VecDeque<Result<T, DataSourceError>>>,
) -> Result<T, DataSourceError> {
    let mut queue = queue.lock().unwrap_or_else(|e| e.into_inner());
    if queue.len() > 1 {
        queue.pop_front().unwrap_or_else(|| Ok(T::default()))
    } else {
        queue.front().cloned().unwrap_or_else(|| Ok(T::default()))
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch_positions(&self, _user: &str) -> Result<PositionSnapshot, DataSourceError> {
        next_response(&self.positions)
    }

    async fn fetch_fills(&self, _user: &str) -> Result<Vec<Fill>, DataSourceError> {
        next_response(&self.fills)
    }
}
