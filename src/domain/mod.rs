//! Domain types for account monitoring.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: TimeMs, Address, Coin, Side
//! - Position snapshots and trade fills as typed value structs

pub mod decimal;
pub mod fill;
pub mod position;
pub mod primitives;

pub use decimal::Decimal;
pub use fill::Fill;
pub use position::{Position, PositionSide, PositionSnapshot};
pub use primitives::{Address, Coin, Side, TimeMs};
