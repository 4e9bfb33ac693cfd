//! Fill type representing a single trade execution.

use crate::domain::{Coin, Decimal, Side, TimeMs};

/// A single trade fill/execution.
///
/// Everything but the coin is optional; a fill with missing fields is still
/// reported, with the gaps rendered as `N/A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    /// Trade ID as reported, stable across polls. Opaque.
    pub tid: Option<String>,
    pub coin: Coin,
    pub side: Option<Side>,
    pub px: Option<Decimal>,
    pub sz: Option<Decimal>,
    pub fee: Option<Decimal>,
    /// Execution time in milliseconds since Unix epoch.
    pub time_ms: Option<TimeMs>,
}

impl Fill {
    pub fn new(coin: Coin) -> Self {
        Fill {
            tid: None,
            coin,
            side: None,
            px: None,
            sz: None,
            fee: None,
            time_ms: None,
        }
    }

    pub fn with_tid(mut self, tid: impl Into<String>) -> Self {
        self.tid = Some(tid.into());
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_time(mut self, time_ms: TimeMs) -> Self {
        self.time_ms = Some(time_ms);
        self
    }

    pub fn with_px(mut self, px: Decimal) -> Self {
        self.px = Some(px);
        self
    }

    pub fn with_sz(mut self, sz: Decimal) -> Self {
        self.sz = Some(sz);
        self
    }

    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.fee = Some(fee);
        self
    }

    /// The id used for deduplication. None when missing or blank, in which
    /// case the fill can never be reported.
    pub fn trade_id(&self) -> Option<&str> {
        self.tid.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_builder() {
        let fill = Fill::new(Coin::new("ETH"))
            .with_tid("7")
            .with_side(Side::Sell)
            .with_px(Decimal::from_str_canonical("3000").unwrap())
            .with_sz(Decimal::from_str_canonical("0.5").unwrap());

        assert_eq!(fill.trade_id(), Some("7"));
        assert_eq!(fill.coin.as_str(), "ETH");
        assert_eq!(fill.side, Some(Side::Sell));
        assert_eq!(fill.px.map(|p| p.to_string()), Some("3000".to_string()));
        assert_eq!(fill.fee, None);
        assert_eq!(fill.time_ms, None);
    }

    #[test]
    fn test_blank_trade_id_is_unusable() {
        assert_eq!(Fill::new(Coin::new("BTC")).trade_id(), None);
        assert_eq!(Fill::new(Coin::new("BTC")).with_tid("  ").trade_id(), None);
        assert_eq!(Fill::new(Coin::new("BTC")).with_tid(" 42 ").trade_id(), Some("42"));
    }
}
