//! Open positions as reported by one account-state poll.

use crate::domain::{Coin, Decimal};
use std::collections::BTreeMap;

/// Direction derived from a signed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionSide {
    Long,
    Short,
    Neutral,
}

impl PositionSide {
    pub fn from_size(size: Decimal) -> Self {
        if size.is_positive() {
            PositionSide::Long
        } else if size.is_negative() {
            PositionSide::Short
        } else {
            PositionSide::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "LONG",
            PositionSide::Short => "SHORT",
            PositionSide::Neutral => "NEUTRAL",
        }
    }
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One open position. Fields other than the size may be missing upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub coin: Coin,
    /// Signed size: positive = long, negative = short.
    pub szi: Decimal,
    pub entry_px: Option<Decimal>,
    pub leverage: Option<Decimal>,
    pub position_value: Option<Decimal>,
    pub unrealized_pnl: Option<Decimal>,
}

impl Position {
    /// A position with only coin and size known.
    pub fn new(coin: Coin, szi: Decimal) -> Self {
        Self {
            coin,
            szi,
            entry_px: None,
            leverage: None,
            position_value: None,
            unrealized_pnl: None,
        }
    }

    pub fn with_entry_px(mut self, px: Decimal) -> Self {
        self.entry_px = Some(px);
        self
    }

    pub fn with_leverage(mut self, leverage: Decimal) -> Self {
        self.leverage = Some(leverage);
        self
    }

    pub fn with_position_value(mut self, value: Decimal) -> Self {
        self.position_value = Some(value);
        self
    }

    pub fn with_unrealized_pnl(mut self, pnl: Decimal) -> Self {
        self.unrealized_pnl = Some(pnl);
        self
    }

    pub fn side(&self) -> PositionSide {
        PositionSide::from_size(self.szi)
    }
}

/// All open positions of one poll, keyed by coin.
///
/// Backed by a BTreeMap so iteration is always in ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionSnapshot {
    positions: BTreeMap<Coin, Position>,
}

impl PositionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a position, replacing any earlier entry for the same coin.
    pub fn insert(&mut self, position: Position) {
        self.positions.insert(position.coin.clone(), position);
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.insert(position);
        self
    }

    pub fn get(&self, coin: &Coin) -> Option<&Position> {
        self.positions.get(coin)
    }

    pub fn contains(&self, coin: &Coin) -> bool {
        self.positions.contains_key(coin)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions in ascending coin order.
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }
}

impl FromIterator<Position> for PositionSnapshot {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut snapshot = PositionSnapshot::new();
        for position in iter {
            snapshot.insert(position);
        }
        snapshot
    }
}
