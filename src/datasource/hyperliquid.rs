//! Hyperliquid API client implementation.

use super::{DataSource, DataSourceError};
use crate::domain::{Coin, Decimal, Fill, Position, PositionSnapshot, Side, TimeMs};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const MAINNET_API_URL: &str = "https://api.hyperliquid.xyz";
pub const TESTNET_API_URL: &str = "https://api.hyperliquid-testnet.xyz";

/// Hyperliquid data source using the public Info API.
#[derive(Debug, Clone)]
pub struct HyperliquidDataSource {
    client: Client,
    base_url: String,
}

impl HyperliquidDataSource {
    /// Create a data source with a per-request timeout.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, DataSourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataSourceError::Other(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_info(
        &self,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, DataSourceError> {
        let url = format!("{}/info", self.base_url);

        let response = self.client.post(&url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DataSourceError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<serde_json::Value>().await?)
    }
}

#[async_trait]
impl DataSource for HyperliquidDataSource {
    async fn fetch_positions(&self, user: &str) -> Result<PositionSnapshot, DataSourceError> {
        debug!("Fetching clearinghouse state for user={}", user);

        let payload = serde_json::json!({
            "type": "clearinghouseState",
            "user": user
        });

        let response = self.post_info(payload).await?;
        parse_positions(&response)
    }

    async fn fetch_fills(&self, user: &str) -> Result<Vec<Fill>, DataSourceError> {
        debug!("Fetching fills for user={}", user);

        let payload = serde_json::json!({
            "type": "userFills",
            "user": user
        });

        let response = self.post_info(payload).await?;

        let fills_json = response
            .as_array()
            .ok_or_else(|| DataSourceError::ParseError("Expected array response".to_string()))?;

        let mut fills = Vec::with_capacity(fills_json.len());
        for fill_json in fills_json {
            match parse_fill(fill_json) {
                Ok(fill) => fills.push(fill),
                Err(e) => {
                    warn!("Failed to parse fill: {}", e);
                }
            }
        }

        Ok(fills)
    }
}

/// Build a snapshot from a `clearinghouseState` response.
fn parse_positions(state: &serde_json::Value) -> Result<PositionSnapshot, DataSourceError> {
    let entries = state
        .get("assetPositions")
        .and_then(|v| v.as_array())
        .ok_or_else(|| DataSourceError::ParseError("Missing assetPositions field".to_string()))?;

    let mut snapshot = PositionSnapshot::new();
    for entry in entries {
        let position_json = entry.get("position").unwrap_or(entry);
        match parse_position(position_json) {
            Ok(position) => snapshot.insert(position),
            Err(e) => {
                warn!("Failed to parse position: {}", e);
            }
        }
    }

    Ok(snapshot)
}

fn parse_position(position_json: &serde_json::Value) -> Result<Position, DataSourceError> {
    let coin = position_json
        .get("coin")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DataSourceError::ParseError("Missing coin field".to_string()))?;

    let szi = decimal_field(position_json, "szi")
        .ok_or_else(|| DataSourceError::ParseError(format!("Missing or invalid szi for {}", coin)))?;

    Ok(Position {
        coin: Coin::new(coin),
        szi,
        entry_px: decimal_field(position_json, "entryPx"),
        leverage: position_json
            .get("leverage")
            .and_then(|lev| decimal_field(lev, "value")),
        position_value: decimal_field(position_json, "positionValue"),
        unrealized_pnl: decimal_field(position_json, "unrealizedPnl"),
    })
}

/// Only the coin is required. Missing side, time or amounts are kept as gaps
/// so the trade is still reported.
fn parse_fill(fill_json: &serde_json::Value) -> Result<Fill, DataSourceError> {
    let coin = fill_json
        .get("coin")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DataSourceError::ParseError("Missing coin field".to_string()))?;

    let side = match fill_json.get("side").and_then(|v| v.as_str()) {
        Some(code) => {
            let side = Side::from_wire(code);
            if side.is_none() {
                warn!(coin, side = code, "Unknown fill side");
            }
            side
        }
        None => None,
    };

    let tid = fill_json.get("tid").and_then(|v| match v {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        _ => None,
    });

    Ok(Fill {
        tid,
        coin: Coin::new(coin),
        side,
        px: decimal_field(fill_json, "px"),
        sz: decimal_field(fill_json, "sz"),
        fee: decimal_field(fill_json, "fee"),
        time_ms: fill_json.get("time").and_then(|v| v.as_i64()).map(TimeMs::new),
    })
}

/// Read a decimal that Hyperliquid encodes as a string (numbers are tolerated).
fn decimal_field(json: &serde_json::Value, key: &str) -> Option<Decimal> {
    match json.get(key)? {
        serde_json::Value::String(s) => Decimal::from_str_canonical(s).ok(),
        serde_json::Value::Number(n) => Decimal::from_str_canonical(&n.to_string()).ok(),
        _ => None,
    }
}
