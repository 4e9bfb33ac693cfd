//! Domain primitives: TimeMs, Address, Coin, Side.

use chrono::{DateTime, TimeZone, Utc};

/// Time in milliseconds since Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeMs(pub i64);

impl TimeMs {
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    pub fn as_ms(&self) -> i64 {
        self.0
    }

    /// Convert to a UTC datetime, or None if the value is out of chrono's range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

/// Wallet address (hex string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: String) -> Self {
        Address(addr)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for notifications: first 8 and last 6 characters.
    ///
    /// Addresses too short to split that way keep only their first half, so
    /// the full value is never rendered.
    pub fn redacted(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() > 14 {
            let head: String = chars[..8].iter().collect();
            let tail: String = chars[chars.len() - 6..].iter().collect();
            format!("{}...{}", head, tail)
        } else {
            let head: String = chars[..chars.len() / 2].iter().collect();
            format!("{}...", head)
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coin/asset symbol (e.g., "BTC", "ETH").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coin(pub String);

impl Coin {
    pub fn new(coin: impl Into<String>) -> Self {
        Coin(coin.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trade side: Buy or Sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Parse the Hyperliquid wire code: "B" (bid) is a buy, "A" (ask) a sell.
    /// Spelled-out names are accepted as well.
    pub fn from_wire(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "b" | "buy" => Some(Side::Buy),
            "a" | "sell" => Some(Side::Sell),
            _ => None,
        }
    }

    pub fn as_upper(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_from_wire() {
        assert_eq!(Side::from_wire("B"), Some(Side::Buy));
        assert_eq!(Side::from_wire("A"), Some(Side::Sell));
        assert_eq!(Side::from_wire("sell"), Some(Side::Sell));
        assert_eq!(Side::from_wire("X"), None);
    }

    #[test]
    fn test_side_rendering() {
        assert_eq!(Side::Sell.as_upper(), "SELL");
        assert_eq!(Side::Buy.as_upper(), "BUY");
    }

    #[test]
    fn test_address_redacted() {
        let addr = Address::new("0xcb58b8f5ec6d47985f0728465c25a08ef9ad2c7b".to_string());
        assert_eq!(addr.redacted(), "0xcb58b8...ad2c7b");
    }

    #[test]
    fn test_short_address_never_rendered_in_full() {
        let addr = Address::new("0x1234".to_string());
        assert_eq!(addr.redacted(), "0x1...");
    }

    #[test]
    fn test_timems_to_utc() {
        let t = TimeMs::new(1_700_000_000_000);
        let dt = t.to_utc().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2023-11-14 22:13:20");
    }
}
