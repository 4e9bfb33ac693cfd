//! Rendering of detected events into notification text.
//!
//! Formatting is pure: position messages take the wall-clock time as an
//! argument, fill messages use the fill's own execution time.

use crate::domain::{Address, Decimal, Fill, Position, Side};
use crate::engine::{MonitorEvent, PositionEvent};
use crate::notify::Markup;
use chrono::{DateTime, Utc};

/// Marker rendered in place of a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Clone)]
pub struct EventFormatter {
    address: Address,
    markup: Markup,
}

impl EventFormatter {
    pub fn new(address: Address, markup: Markup) -> Self {
        Self { address, markup }
    }

    pub fn markup(&self) -> Markup {
        self.markup
    }

    pub fn format(&self, event: &MonitorEvent, now: DateTime<Utc>) -> String {
        match event {
            MonitorEvent::Position(event) => self.format_position(event, now),
            MonitorEvent::Trade(fill) => self.format_fill(fill),
        }
    }

    pub fn format_position(&self, event: &PositionEvent, now: DateTime<Utc>) -> String {
        let mut out = match event {
            PositionEvent::Opened { position } => self.position_body("OPENED", position, None),
            PositionEvent::Modified {
                position,
                previous_size,
            } => self.position_body("MODIFIED", position, Some(*previous_size)),
            PositionEvent::Closed { previous } => {
                let mut out = format!("🔵 {}\n\n", self.bold("Position CLOSED"));
                out.push_str(&self.field("Asset", &self.text(previous.coin.as_str())));
                out.push_str(&self.field("Previous Size", &previous.szi.to_string()));
                out
            }
        };
        out.push_str(&self.footer(&now.format(TIME_FORMAT).to_string()));
        out
    }

    pub fn format_fill(&self, fill: &Fill) -> String {
        let emoji = match fill.side {
            Some(Side::Buy) => "🟢",
            Some(Side::Sell) | None => "🔴",
        };
        let side = fill.side.map(|s| s.as_upper()).unwrap_or(NOT_AVAILABLE);
        let tid = fill.tid.as_deref().unwrap_or(NOT_AVAILABLE);
        let time = fill
            .time_ms
            .and_then(|t| t.to_utc())
            .map(|t| t.format(TIME_FORMAT).to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let mut out = format!("{} {}\n\n", emoji, self.bold("NEW TRADE"));
        out.push_str(&self.field("Asset", &self.text(fill.coin.as_str())));
        out.push_str(&self.field("Side", side));
        out.push_str(&self.field("Price", &money(fill.px)));
        out.push_str(&self.field("Size", &plain(fill.sz)));
        out.push_str(&self.field("Fee", &money(fill.fee)));
        out.push_str(&self.field("Trade ID", &self.code(tid)));
        out.push_str(&self.footer(&time));
        out
    }

    /// Sent once, after the baseline has been established.
    pub fn started(&self) -> String {
        format!(
            "✅ {}\n\nNow monitoring address:\n{}\n\nYou will receive notifications for:\n\
             • New positions opened\n\
             • Positions closed\n\
             • Position size changes\n\
             • New trades executed",
            self.bold("Monitoring Started"),
            self.code(self.address.as_str()),
        )
    }

    pub fn stopped(&self) -> String {
        format!("⚠️ {}", self.bold("Monitoring Stopped"))
    }

    pub fn failure(&self, error: &str) -> String {
        format!("❌ {}\n\n{}", self.bold("Monitor Error"), self.text(error))
    }

    fn position_body(
        &self,
        action: &str,
        position: &Position,
        previous_size: Option<Decimal>,
    ) -> String {
        let mut out = format!("🔔 {}\n\n", self.bold(&format!("Position {}", action)));
        out.push_str(&self.field("Asset", &self.text(position.coin.as_str())));
        out.push_str(&self.field("Side", position.side().as_str()));
        out.push_str(&self.field("Size", &position.szi.abs().to_string()));
        if let Some(prev) = previous_size {
            out.push_str(&self.field("Previous Size", &prev.to_string()));
        }
        out.push_str(&self.field("Entry Price", &money(position.entry_px)));
        out.push_str(&self.field("Leverage", &leverage(position.leverage)));
        out.push_str(&self.field("Position Value", &money(position.position_value)));
        out.push_str(&self.field("Unrealized PnL", &money(position.unrealized_pnl)));
        out
    }

    fn footer(&self, time: &str) -> String {
        format!(
            "\n{} {}\n{} {}",
            self.bold("Address:"),
            self.code(&self.address.redacted()),
            self.bold("Time:"),
            time
        )
    }

    fn field(&self, label: &str, value: &str) -> String {
        format!("{} {}\n", self.bold(&format!("{}:", label)), value)
    }

    fn bold(&self, s: &str) -> String {
        match self.markup {
            Markup::Html => format!("<b>{}</b>", escape_html(s)),
            Markup::Plain => s.to_string(),
        }
    }

    fn code(&self, s: &str) -> String {
        match self.markup {
            Markup::Html => format!("<code>{}</code>", escape_html(s)),
            Markup::Plain => s.to_string(),
        }
    }

    fn text(&self, s: &str) -> String {
        match self.markup {
            Markup::Html => escape_html(s),
            Markup::Plain => s.to_string(),
        }
    }
}

fn plain(value: Option<Decimal>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn money(value: Option<Decimal>) -> String {
    match value {
        Some(v) if v.is_negative() => format!("-${}", v.abs()),
        Some(v) => format!("${}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn leverage(value: Option<Decimal>) -> String {
    value
        .map(|v| format!("{}x", v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
