//! Trading module for order construction and execution.
//!
//! This module handles:
//! - Order types and construction
//! - Market order execution and position closing
//! - Bulk liquidation and position snapshots

pub mod execution;
pub mod order;
pub mod position;

pub use execution::{close_all, close_position, execute_market_order, open_positions, CloseOutcome};
pub use order::{FillPolicy, OrderRequest, OrderResult, Side, TimePolicy, TradeAction, TradeParams};
pub use position::{Position, SideFilter};
