//! HTTP client for the terminal's local REST bridge.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::GatewayError;
use crate::trading::order::{OrderRequest, OrderResult, Side};
use crate::trading::position::Position;

use super::gateway::{TerminalGateway, Tick};

/// Client for the MetaTrader terminal's local REST bridge.
#[derive(Debug, Clone)]
pub struct TerminalClient {
    /// HTTP client for bridge requests.
    http: reqwest::Client,
    /// Base URL of the bridge.
    base_url: String,
}

/// Generic status response from the bridge.
#[derive(Debug, Clone, Deserialize)]
struct StatusResponse {
    /// Whether the call succeeded inside the terminal.
    success: bool,
    /// Terminal-reported diagnostic, if any.
    #[serde(default)]
    message: Option<String>,
}

impl StatusResponse {
    fn message(&self) -> String {
        self.message.clone().unwrap_or_else(|| "no detail".to_string())
    }
}

/// Login request body.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    account: u64,
    password: &'a str,
    server: &'a str,
}

/// Tick response from the bridge. Prices arrive as strings.
#[derive(Debug, Clone, Deserialize)]
struct TickResponse {
    bid: String,
    ask: String,
    /// Unix timestamp of the quote, seconds.
    time: i64,
}

/// Position row from the bridge. Decimals arrive as strings, the side
/// as the venue's numeric order-type code.
#[derive(Debug, Clone, Deserialize)]
struct PositionResponse {
    ticket: u64,
    symbol: String,
    volume: String,
    #[serde(rename = "type")]
    position_type: u8,
    #[serde(default)]
    price_open: Option<String>,
    #[serde(default)]
    sl: Option<String>,
    #[serde(default)]
    tp: Option<String>,
    #[serde(default)]
    profit: Option<String>,
    /// Unix timestamp the position was opened, seconds.
    #[serde(default)]
    time: i64,
}

/// Positions-total response from the bridge.
#[derive(Debug, Clone, Deserialize)]
struct TotalResponse {
    total: usize,
}

impl TerminalClient {
    /// Create a new bridge client from config with tuned HTTP settings.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(std::time::Duration::from_millis(500))
            .tcp_nodelay(true)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: config.mt5_bridge_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL of the bridge.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn parse_decimal(value: &str, field: &str) -> Result<Decimal, GatewayError> {
        value
            .parse()
            .map_err(|_| GatewayError::Decode(format!("invalid decimal in {field}: {value}")))
    }

    fn parse_opt_decimal(value: &Option<String>, field: &str) -> Result<Decimal, GatewayError> {
        match value {
            Some(v) => Self::parse_decimal(v, field),
            None => Ok(Decimal::ZERO),
        }
    }

    fn parse_time(unix_seconds: i64) -> Result<DateTime<Utc>, GatewayError> {
        DateTime::from_timestamp(unix_seconds, 0)
            .ok_or_else(|| GatewayError::Decode(format!("invalid timestamp: {unix_seconds}")))
    }

    fn convert_position(row: PositionResponse) -> Result<Position, GatewayError> {
        let side = Side::from_code(row.position_type).ok_or_else(|| {
            GatewayError::Decode(format!(
                "unknown position type {} for ticket {}",
                row.position_type, row.ticket
            ))
        })?;

        Ok(Position {
            ticket: row.ticket,
            symbol: row.symbol,
            volume: Self::parse_decimal(&row.volume, "volume")?,
            side,
            price_open: Self::parse_opt_decimal(&row.price_open, "price_open")?,
            stop_loss: Self::parse_opt_decimal(&row.sl, "sl")?,
            take_profit: Self::parse_opt_decimal(&row.tp, "tp")?,
            profit: Self::parse_opt_decimal(&row.profit, "profit")?,
            opened_at: Self::parse_time(row.time)?,
        })
    }
}

#[async_trait]
impl TerminalGateway for TerminalClient {
    #[instrument(skip(self))]
    async fn initialize(&self) -> Result<(), GatewayError> {
        let url = format!("{}/initialize", self.base_url);

        let response = self.http.post(&url).send().await?;
        if !response.status().is_success() {
            return Err(GatewayError::InitFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let status: StatusResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(format!("initialize response: {e}")))?;

        if !status.success {
            return Err(GatewayError::InitFailed(status.message()));
        }

        debug!("terminal initialized");
        Ok(())
    }

    #[instrument(skip(self, password), fields(account = account, server = server))]
    async fn login(&self, account: u64, password: &str, server: &str) -> Result<(), GatewayError> {
        let url = format!("{}/login", self.base_url);
        let body = LoginRequest {
            account,
            password,
            server,
        };

        let response = self.http.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(GatewayError::LoginFailed {
                account,
                reason: format!("HTTP {}", response.status()),
            });
        }

        let status: StatusResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(format!("login response: {e}")))?;

        if !status.success {
            return Err(GatewayError::LoginFailed {
                account,
                reason: status.message(),
            });
        }

        debug!("logged in");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn shutdown(&self) -> Result<(), GatewayError> {
        let url = format!("{}/shutdown", self.base_url);

        let response = self.http.post(&url).send().await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "shutdown request failed");
            return Err(GatewayError::Decode(format!(
                "shutdown failed: HTTP {}",
                response.status()
            )));
        }

        debug!("terminal shut down");
        Ok(())
    }

    #[instrument(skip(self), fields(symbol = symbol))]
    async fn symbol_tick(&self, symbol: &str) -> Result<Tick, GatewayError> {
        let url = format!("{}/symbol_info_tick", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::TickUnavailable {
                symbol: symbol.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let tick: TickResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(format!("tick response: {e}")))?;

        Ok(Tick {
            bid: Self::parse_decimal(&tick.bid, "bid")?,
            ask: Self::parse_decimal(&tick.ask, "ask")?,
            time: Self::parse_time(tick.time)?,
        })
    }

    #[instrument(skip(self))]
    async fn positions(&self) -> Result<Vec<Position>, GatewayError> {
        let url = format!("{}/positions", self.base_url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GatewayError::QueryFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let rows: Vec<PositionResponse> = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(format!("positions response: {e}")))?;

        let positions = rows
            .into_iter()
            .map(Self::convert_position)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = positions.len(), "retrieved positions");
        Ok(positions)
    }

    #[instrument(skip(self))]
    async fn positions_total(&self) -> Result<usize, GatewayError> {
        let url = format!("{}/positions_total", self.base_url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GatewayError::QueryFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let total: TotalResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(format!("positions_total response: {e}")))?;

        Ok(total.total)
    }

    #[instrument(skip(self, request), fields(symbol = %request.symbol, side = %request.side))]
    async fn order_send(&self, request: &OrderRequest) -> Result<OrderResult, GatewayError> {
        let url = format!("{}/order_send", self.base_url);

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // The bridge mirrors the trade server: rejections carry a
            // retcode and comment in the error body.
            if let Ok(result) = serde_json::from_str::<OrderResult>(&body) {
                return Err(GatewayError::Rejected {
                    retcode: result.retcode,
                    comment: result.comment,
                });
            }
            return Err(GatewayError::Decode(format!(
                "order_send failed: HTTP {status} - {body}"
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| GatewayError::Decode(format!("order_send response: {e}")))
    }
}
