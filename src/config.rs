use crate::datasource::hyperliquid::{MAINNET_API_URL, TESTNET_API_URL};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_ADDRESS: &str = "0xcb58b8f5ec6d47985f0728465c25a08ef9ad2c7b";
const DEFAULT_LOG_FILE: &str = "hypewatch.log";

#[derive(Clone)]
pub struct Config {
    pub address: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    pub use_testnet: bool,
    pub hyperliquid_api_url: String,
    pub check_interval: Duration,
    pub http_timeout: Duration,
    /// None keeps every seen trade id for the life of the process.
    pub seen_fills_retention_polls: Option<u64>,
    /// None disables file logging.
    pub log_file: Option<String>,
}

// Bot token is a credential.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("address", &self.address)
            .field("telegram_bot_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("use_testnet", &self.use_testnet)
            .field("hyperliquid_api_url", &self.hyperliquid_api_url)
            .field("check_interval", &self.check_interval)
            .field("http_timeout", &self.http_timeout)
            .field("seen_fills_retention_polls", &self.seen_fills_retention_polls)
            .field("log_file", &self.log_file)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let address = env_map
            .get("HYPERLIQUID_ADDRESS")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        if address.is_empty() {
            return Err(ConfigError::InvalidValue(
                "HYPERLIQUID_ADDRESS".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let telegram_bot_token = required(&env_map, "TELEGRAM_BOT_TOKEN")?;
        let telegram_chat_id = required(&env_map, "TELEGRAM_CHAT_ID")?;

        let use_testnet = match env_map
            .get("USE_TESTNET")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
            .unwrap_or("false")
        {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" | "" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "USE_TESTNET".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        let hyperliquid_api_url = env_map
            .get("HYPERLIQUID_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                if use_testnet {
                    TESTNET_API_URL.to_string()
                } else {
                    MAINNET_API_URL.to_string()
                }
            });

        let check_interval = Duration::from_secs(positive_u64(&env_map, "CHECK_INTERVAL", 300)?);
        let http_timeout = Duration::from_secs(positive_u64(&env_map, "HTTP_TIMEOUT_SECS", 10)?);

        let seen_fills_retention_polls = match env_map.get("SEEN_FILLS_RETENTION_POLLS") {
            Some(s) if !s.trim().is_empty() => {
                Some(positive_u64(&env_map, "SEEN_FILLS_RETENTION_POLLS", 0)?)
            }
            _ => None,
        };

        let log_file = match env_map.get("LOG_FILE") {
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(s.trim().to_string()),
            None => Some(DEFAULT_LOG_FILE.to_string()),
        };

        Ok(Config {
            address,
            telegram_bot_token,
            telegram_chat_id,
            use_testnet,
            hyperliquid_api_url,
            check_interval,
            http_timeout,
            seen_fills_retention_polls,
            log_file,
        })
    }
}

fn required(env_map: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    env_map
        .get(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

fn positive_u64(
    env_map: &HashMap<String, String>,
    key: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    let value = match env_map.get(key) {
        Some(s) => s.trim().parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a positive integer".to_string())
        })?,
        None => default,
    };
    if value == 0 {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}
