//! Terminal module: the connection gateway to the trading terminal.
//!
//! This module handles:
//! - The gateway contract (session, ticks, positions, order submission)
//! - The REST bridge client
//! - A mock gateway for testing

pub mod client;
pub mod gateway;
pub mod mock;

pub use client::TerminalClient;
pub use gateway::{TerminalGateway, Tick};
pub use mock::{MockBehavior, MockTerminal};
