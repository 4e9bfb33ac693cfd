pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod format;
pub mod notify;
pub mod orchestration;

pub use config::Config;
pub use datasource::{DataSource, DataSourceError, HyperliquidDataSource, MockDataSource};
pub use domain::{Address, Coin, Decimal, Fill, Position, PositionSide, PositionSnapshot, Side, TimeMs};
pub use error::MonitorError;
pub use format::EventFormatter;
pub use notify::{Markup, Notifier, NotifyError, RecordingNotifier, TelegramNotifier};
