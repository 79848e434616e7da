//! Terminal gateway contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::trading::order::{OrderRequest, OrderResult};
use crate::trading::position::Position;

/// Latest bid/ask quote snapshot for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Best bid price.
    pub bid: Decimal,
    /// Best ask price.
    pub ask: Decimal,
    /// Quote timestamp.
    pub time: DateTime<Utc>,
}

/// Session with a trading terminal.
///
/// The session lifecycle (uninitialized, logged in, shut down) is owned by
/// the terminal itself; callers are expected to use a gateway sequentially,
/// awaiting each call before the next.
#[async_trait]
pub trait TerminalGateway: Send + Sync {
    /// Establish the connection to the terminal.
    async fn initialize(&self) -> Result<(), GatewayError>;

    /// Log in to a trading account on the given broker server.
    async fn login(&self, account: u64, password: &str, server: &str) -> Result<(), GatewayError>;

    /// Tear the session down.
    async fn shutdown(&self) -> Result<(), GatewayError>;

    /// Fetch the latest tick for a symbol.
    async fn symbol_tick(&self, symbol: &str) -> Result<Tick, GatewayError>;

    /// Snapshot all open positions.
    async fn positions(&self) -> Result<Vec<Position>, GatewayError>;

    /// Count of open positions.
    async fn positions_total(&self) -> Result<usize, GatewayError>;

    /// Submit a trade request.
    async fn order_send(&self, request: &OrderRequest) -> Result<OrderResult, GatewayError>;
}
