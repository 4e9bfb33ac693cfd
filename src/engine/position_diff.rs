use crate::domain::{Coin, Decimal, Position, PositionSnapshot};

/// Size changes at or below this are treated as upstream noise.
pub const SIZE_EPSILON: Decimal = Decimal::from_scaled(1, 4);

/// A change between two position snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionEvent {
    /// Coin absent from the previous snapshot.
    Opened { position: Position },
    /// Size moved by more than [`SIZE_EPSILON`].
    Modified {
        position: Position,
        previous_size: Decimal,
    },
    /// Coin absent from the current snapshot; carries the last known position.
    Closed { previous: Position },
}

impl PositionEvent {
    pub fn coin(&self) -> &Coin {
        match self {
            PositionEvent::Opened { position } | PositionEvent::Modified { position, .. } => {
                &position.coin
            }
            PositionEvent::Closed { previous } => &previous.coin,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PositionEvent::Opened { .. } => "opened",
            PositionEvent::Modified { .. } => "modified",
            PositionEvent::Closed { .. } => "closed",
        }
    }
}

/// Compare two snapshots and list what changed.
///
/// Opened and modified events come first, then closed events, each group in
/// ascending coin order. The first cycle only establishes a baseline and
/// always yields nothing.
pub fn detect_position_changes(
    previous: &PositionSnapshot,
    current: &PositionSnapshot,
    is_first_cycle: bool,
) -> Vec<PositionEvent> {
    if is_first_cycle {
        return Vec::new();
    }

    let mut events = Vec::new();

    for position in current.iter() {
        match previous.get(&position.coin) {
            None => events.push(PositionEvent::Opened {
                position: position.clone(),
            }),
            Some(old) => {
                if position.szi.abs_diff(&old.szi) > SIZE_EPSILON {
                    events.push(PositionEvent::Modified {
                        position: position.clone(),
                        previous_size: old.szi,
                    });
                }
            }
        }
    }

    for old in previous.iter() {
        if !current.contains(&old.coin) {
            events.push(PositionEvent::Closed {
                previous: old.clone(),
            });
        }
    }

    events
}
