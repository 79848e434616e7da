//! Mock terminal gateway for unit testing.
//!
//! Scripted ticks, positions, and failure modes; no network access.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::error::GatewayError;
use crate::trading::order::{OrderRequest, OrderResult, RETCODE_DONE};
use crate::trading::position::Position;

use super::gateway::{TerminalGateway, Tick};

/// Configuration for mock terminal behavior.
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    /// Whether initialize should fail.
    pub fail_init: bool,
    /// Whether login should fail.
    pub fail_login: bool,
    /// Whether tick lookups should fail.
    pub fail_tick: bool,
    /// Whether position queries should fail.
    pub fail_positions: bool,
    /// Whether order submissions should be rejected.
    pub fail_order: bool,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
}

/// Mock terminal gateway for testing.
#[derive(Debug, Clone)]
pub struct MockTerminal {
    behavior: MockBehavior,
    ticks: Arc<Mutex<HashMap<String, Tick>>>,
    positions: Arc<Mutex<Vec<Position>>>,
    sent: Arc<Mutex<Vec<OrderRequest>>>,
    next_ticket: Arc<Mutex<u64>>,
}

impl MockTerminal {
    /// Create a new mock terminal with default behavior.
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::default())
    }

    /// Create a mock terminal with custom behavior.
    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            ticks: Arc::new(Mutex::new(HashMap::new())),
            positions: Arc::new(Mutex::new(Vec::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            next_ticket: Arc::new(Mutex::new(1000)),
        }
    }

    /// Script the tick for a symbol.
    pub fn set_tick(&self, symbol: impl Into<String>, bid: Decimal, ask: Decimal) {
        let mut ticks = self.ticks.lock().unwrap();
        ticks.insert(
            symbol.into(),
            Tick {
                bid,
                ask,
                time: Utc::now(),
            },
        );
    }

    /// Add an open position.
    pub fn add_position(&self, position: Position) {
        self.positions.lock().unwrap().push(position);
    }

    /// Snapshot of every order submitted so far.
    pub fn sent_orders(&self) -> Vec<OrderRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Open positions currently held by the mock.
    pub fn open_positions(&self) -> Vec<Position> {
        self.positions.lock().unwrap().clone()
    }

    /// Clear all scripted data.
    pub fn clear(&self) {
        self.ticks.lock().unwrap().clear();
        self.positions.lock().unwrap().clear();
        self.sent.lock().unwrap().clear();
    }

    async fn simulate_latency(&self) {
        if self.behavior.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.behavior.latency_ms)).await;
        }
    }
}

impl Default for MockTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TerminalGateway for MockTerminal {
    async fn initialize(&self) -> Result<(), GatewayError> {
        self.simulate_latency().await;
        if self.behavior.fail_init {
            return Err(GatewayError::InitFailed("mock init failure".to_string()));
        }
        Ok(())
    }

    async fn login(&self, account: u64, _password: &str, _server: &str) -> Result<(), GatewayError> {
        self.simulate_latency().await;
        if self.behavior.fail_login {
            return Err(GatewayError::LoginFailed {
                account,
                reason: "mock login failure".to_string(),
            });
        }
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn symbol_tick(&self, symbol: &str) -> Result<Tick, GatewayError> {
        self.simulate_latency().await;
        if self.behavior.fail_tick {
            return Err(GatewayError::TickUnavailable {
                symbol: symbol.to_string(),
                reason: "mock tick failure".to_string(),
            });
        }

        let ticks = self.ticks.lock().unwrap();
        ticks
            .get(symbol)
            .copied()
            .ok_or_else(|| GatewayError::TickUnavailable {
                symbol: symbol.to_string(),
                reason: "no tick scripted".to_string(),
            })
    }

    async fn positions(&self) -> Result<Vec<Position>, GatewayError> {
        self.simulate_latency().await;
        if self.behavior.fail_positions {
            return Err(GatewayError::QueryFailed(
                "mock positions failure".to_string(),
            ));
        }
        Ok(self.positions.lock().unwrap().clone())
    }

    async fn positions_total(&self) -> Result<usize, GatewayError> {
        self.simulate_latency().await;
        if self.behavior.fail_positions {
            return Err(GatewayError::QueryFailed(
                "mock positions failure".to_string(),
            ));
        }
        Ok(self.positions.lock().unwrap().len())
    }

    async fn order_send(&self, request: &OrderRequest) -> Result<OrderResult, GatewayError> {
        self.simulate_latency().await;
        if self.behavior.fail_order {
            return Err(GatewayError::Rejected {
                retcode: 10006,
                comment: "mock rejection".to_string(),
            });
        }

        self.sent.lock().unwrap().push(request.clone());

        // A closing order flattens the referenced position.
        if let Some(ticket) = request.position {
            self.positions.lock().unwrap().retain(|p| p.ticket != ticket);
        }

        let mut next = self.next_ticket.lock().unwrap();
        *next += 1;

        Ok(OrderResult {
            retcode: RETCODE_DONE,
            order: *next,
            deal: *next,
            volume: Some(request.volume),
            price: Some(request.price),
            comment: "done".to_string(),
            request_id: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trading::order::{Side, TradeParams};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn mock_tick_lookup() {
        let terminal = MockTerminal::new();
        terminal.set_tick("EURUSD", dec!(1.0850), dec!(1.0852));

        let tick = terminal.symbol_tick("EURUSD").await.unwrap();
        assert_eq!(tick.bid, dec!(1.0850));
        assert_eq!(tick.ask, dec!(1.0852));

        assert!(terminal.symbol_tick("GBPUSD").await.is_err());
    }

    #[tokio::test]
    async fn mock_order_send_records_requests() {
        let terminal = MockTerminal::new();
        terminal.set_tick("EURUSD", dec!(1.0850), dec!(1.0852));

        let tick = terminal.symbol_tick("EURUSD").await.unwrap();
        let request = OrderRequest::market(
            "EURUSD",
            dec!(0.1),
            Side::Buy,
            &tick,
            &TradeParams::default(),
        );

        let result = terminal.order_send(&request).await.unwrap();
        assert!(result.is_done());
        assert_eq!(terminal.sent_orders().len(), 1);
    }

    #[tokio::test]
    async fn mock_failure_modes() {
        let terminal = MockTerminal::with_behavior(MockBehavior {
            fail_login: true,
            fail_positions: true,
            ..Default::default()
        });

        assert!(terminal.login(1, "pw", "srv").await.is_err());
        assert!(terminal.positions().await.is_err());
        assert!(terminal.positions_total().await.is_err());
        assert!(terminal.initialize().await.is_ok());
    }
}
