//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Terminal Credentials ===
    /// Trading account number.
    pub mt5_account: u64,

    /// Account password.
    pub mt5_password: String,

    /// Broker server name (e.g. "MetaQuotes-Demo").
    pub mt5_server: String,

    /// Base URL of the terminal's local REST bridge.
    #[serde(default = "default_bridge_url")]
    pub mt5_bridge_url: String,

    // === Trading Parameters ===
    /// Symbol to trade (e.g. "EURUSD").
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Order volume in lots.
    #[serde(default = "default_volume")]
    pub volume: Decimal,

    /// Trade direction: buy or sell.
    #[serde(default = "default_direction")]
    pub direction: String,

    /// Allowed slippage in points.
    #[serde(default = "default_slippage")]
    pub slippage: u32,

    /// Magic number tagging orders to this bot.
    #[serde(default = "default_magic")]
    pub order_magic: u64,

    /// Comment attached to every order.
    #[serde(default)]
    pub order_comment: String,

    /// Fill policy: IOC, FOK, or RETURN.
    #[serde(default = "default_fill_policy")]
    pub fill_policy: String,

    // === HTTP Configuration ===
    /// Request timeout against the bridge, in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:6542".to_string()
}

fn default_symbol() -> String {
    "EURUSD".to_string()
}

fn default_volume() -> Decimal {
    Decimal::new(1, 1) // 0.1 lots
}

fn default_direction() -> String {
    "buy".to_string()
}

fn default_slippage() -> u32 {
    20
}

fn default_magic() -> u64 {
    1
}

fn default_fill_policy() -> String {
    "IOC".to_string()
}

fn default_http_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.mt5_account == 0 {
            return Err("MT5_ACCOUNT is required".to_string());
        }

        if self.mt5_password.is_empty() {
            return Err("MT5_PASSWORD is required".to_string());
        }

        if self.mt5_server.is_empty() {
            return Err("MT5_SERVER is required".to_string());
        }

        if self.symbol.is_empty() {
            return Err("SYMBOL must not be empty".to_string());
        }

        if self.volume <= Decimal::ZERO {
            return Err("VOLUME must be positive".to_string());
        }

        let dir = self.direction.to_lowercase();
        if dir != "buy" && dir != "sell" {
            return Err("DIRECTION must be buy or sell".to_string());
        }

        let fill = self.fill_policy.to_uppercase();
        if fill != "IOC" && fill != "FOK" && fill != "RETURN" {
            return Err("FILL_POLICY must be IOC, FOK, or RETURN".to_string());
        }

        Ok(())
    }
}
