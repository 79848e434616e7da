//! MetaTrader 5 terminal automation bot.
//!
//! A thin, typed layer over a MetaTrader-5-style trading terminal: log in,
//! place market orders, snapshot open positions, and flatten them in bulk.
//! All venue semantics stay behind the [`terminal::TerminalGateway`] trait;
//! the crate's own logic is order construction (buys price at the ask, sells
//! at the bid), side inversion for closing, and the sequential liquidation
//! workflow.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`terminal`]: Gateway contract, REST bridge client, test mock
//! - [`trading`]: Order types, execution, and liquidation workflows

pub mod config;
pub mod error;
pub mod terminal;
pub mod trading;

pub use config::Config;
pub use error::{BotError, Result};
