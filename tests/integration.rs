//! Integration tests against a live terminal bridge.
//!
//! These tests require a running MT5 bridge and valid MT5_* environment
//! variables. Run with: cargo test --test integration -- --ignored
//!
//! Note: the login test touches a real trading account; use a demo account.

use mt5_autotrader::config::Config;
use mt5_autotrader::terminal::{TerminalClient, TerminalGateway};
use mt5_autotrader::trading::open_positions;

/// Get a test config from environment, or skip.
fn test_config() -> Option<Config> {
    dotenvy::dotenv().ok();

    let config = Config::load().ok()?;
    if config.validate().is_err() {
        return None;
    }

    Some(config)
}

/// Test that the terminal session can be established and torn down.
#[tokio::test]
#[ignore = "requires a running MT5 bridge"]
async fn test_initialize_and_login() {
    let config = match test_config() {
        Some(c) => c,
        None => {
            println!("Skipping: MT5_* environment not configured");
            return;
        }
    };

    let client = TerminalClient::new(&config);

    let init = client.initialize().await;
    assert!(init.is_ok(), "Failed to initialize: {:?}", init.err());

    let login = client
        .login(config.mt5_account, &config.mt5_password, &config.mt5_server)
        .await;
    assert!(login.is_ok(), "Failed to log in: {:?}", login.err());

    let shutdown = client.shutdown().await;
    assert!(shutdown.is_ok(), "Failed to shut down: {:?}", shutdown.err());
}

/// Test that we can fetch a tick for the configured symbol.
#[tokio::test]
#[ignore = "requires a running MT5 bridge"]
async fn test_symbol_tick() {
    let config = match test_config() {
        Some(c) => c,
        None => {
            println!("Skipping: MT5_* environment not configured");
            return;
        }
    };

    let client = TerminalClient::new(&config);
    client.initialize().await.expect("initialize failed");
    client
        .login(config.mt5_account, &config.mt5_password, &config.mt5_server)
        .await
        .expect("login failed");

    let result = client.symbol_tick(&config.symbol).await;
    assert!(result.is_ok(), "Failed to fetch tick: {:?}", result.err());

    let tick = result.unwrap();
    assert!(tick.ask >= tick.bid, "Ask should not be below bid");
    println!("{}: bid={} ask={}", config.symbol, tick.bid, tick.ask);

    client.shutdown().await.ok();
}

/// Test that we can snapshot open positions.
#[tokio::test]
#[ignore = "requires a running MT5 bridge"]
async fn test_open_positions() {
    let config = match test_config() {
        Some(c) => c,
        None => {
            println!("Skipping: MT5_* environment not configured");
            return;
        }
    };

    let client = TerminalClient::new(&config);
    client.initialize().await.expect("initialize failed");
    client
        .login(config.mt5_account, &config.mt5_password, &config.mt5_server)
        .await
        .expect("login failed");

    let result = open_positions(&client).await;
    assert!(result.is_ok(), "Failed to query positions: {:?}", result.err());

    let positions = result.unwrap();
    println!("Found {} open positions", positions.len());
    for position in positions.iter().take(5) {
        println!(
            "  ticket={} {} {} {} lots",
            position.ticket, position.symbol, position.side, position.volume
        );
    }

    client.shutdown().await.ok();
}
