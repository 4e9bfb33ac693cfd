//! Pure change-detection over successive account polls.

use crate::domain::Fill;

pub mod fill_dedup;
pub mod position_diff;

pub use fill_dedup::{detect_new_fills, SeenFillIds};
pub use position_diff::{detect_position_changes, PositionEvent, SIZE_EPSILON};

/// Anything a cycle may notify about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    Position(PositionEvent),
    Trade(Fill),
}

impl From<PositionEvent> for MonitorEvent {
    fn from(event: PositionEvent) -> Self {
        MonitorEvent::Position(event)
    }
}

impl From<Fill> for MonitorEvent {
    fn from(fill: Fill) -> Self {
        MonitorEvent::Trade(fill)
    }
}
