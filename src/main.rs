//! MetaTrader 5 terminal automation bot entry point.

use std::str::FromStr;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mt5_autotrader::config::Config;
use mt5_autotrader::terminal::{TerminalClient, TerminalGateway};
use mt5_autotrader::trading::{
    close_all, execute_market_order, open_positions, FillPolicy, Position, Side, SideFilter,
    TradeParams,
};

/// MetaTrader 5 terminal automation bot.
#[derive(Parser, Debug)]
#[command(name = "mt5-autotrader")]
#[command(about = "Places market orders and manages open positions via the MT5 terminal bridge")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full workflow: order, snapshot, liquidate (default).
    Run,

    /// Check configuration validity.
    CheckConfig,

    /// Print the open position table.
    Positions,

    /// Close open positions, optionally filtered by side.
    CloseAll {
        /// Direction filter: buy, sell, or all.
        #[arg(long, default_value = "all")]
        side: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("mt5_autotrader=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Positions) => cmd_positions().await,
        Some(Command::CloseAll { side }) => cmd_close_all(&side).await,
        Some(Command::Run) | None => cmd_run().await,
    }
}

/// Build the shared trade parameters from config.
fn trade_params(config: &Config) -> anyhow::Result<TradeParams> {
    let fill_policy = FillPolicy::from_str(&config.fill_policy)
        .map_err(|_| anyhow::anyhow!("invalid FILL_POLICY: {}", config.fill_policy))?;

    Ok(TradeParams::default()
        .with_deviation(config.slippage)
        .with_magic(config.order_magic)
        .with_comment(config.order_comment.clone())
        .with_fill_policy(fill_policy))
}

/// Connect and log in, or bail out early.
///
/// Initialization failure returns without a shutdown call; login failure
/// shuts the session down first.
async fn connect(client: &TerminalClient, config: &Config) -> anyhow::Result<()> {
    if let Err(e) = client.initialize().await {
        error!("terminal initialization failed: {}", e);
        return Err(e.into());
    }

    if let Err(e) = client
        .login(config.mt5_account, &config.mt5_password, &config.mt5_server)
        .await
    {
        error!("terminal login failed: {}", e);
        if let Err(shutdown_err) = client.shutdown().await {
            warn!("shutdown after failed login also failed: {}", shutdown_err);
        }
        return Err(e.into());
    }

    info!(account = config.mt5_account, server = %config.mt5_server, "logged in");
    Ok(())
}

/// Print the open position table.
fn print_positions(positions: &[Position]) {
    if positions.is_empty() {
        println!("No open positions.");
        return;
    }

    println!(
        "{:<12} {:<10} {:<6} {:>8} {:>10} {:>10} {:>10} {:>10}",
        "TICKET", "SYMBOL", "SIDE", "VOLUME", "OPEN", "SL", "TP", "PROFIT"
    );
    for p in positions {
        println!(
            "{:<12} {:<10} {:<6} {:>8} {:>10} {:>10} {:>10} {:>10}",
            p.ticket, p.symbol, p.side, p.volume, p.price_open, p.stop_loss, p.take_profit, p.profit
        );
    }
    println!("{} open position(s)", positions.len());
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("MT5 AUTOTRADER - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Account: {}", config.mt5_account);
    println!("  Server: {}", config.mt5_server);
    println!("  Bridge URL: {}", config.mt5_bridge_url);
    println!("  Symbol: {}", config.symbol);
    println!("  Volume: {} lots", config.volume);
    println!("  Direction: {}", config.direction);
    println!("  Slippage: {} points", config.slippage);
    println!("  Magic: {}", config.order_magic);
    println!("  Fill Policy: {}", config.fill_policy);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the open position table from a live session.
async fn cmd_positions() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let client = TerminalClient::new(&config);
    connect(&client, &config).await?;

    match open_positions(&client).await {
        Ok(positions) => print_positions(&positions),
        Err(e) => error!("position query failed: {}", e),
    }

    client.shutdown().await?;
    Ok(())
}

/// Close open positions, optionally filtered by side.
async fn cmd_close_all(side: &str) -> anyhow::Result<()> {
    let filter = SideFilter::from_str(side)
        .map_err(|_| anyhow::anyhow!("invalid side filter: {side} (expected buy, sell, or all)"))?;

    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    let params = trade_params(&config)?;

    let client = TerminalClient::new(&config);
    connect(&client, &config).await?;

    match close_all(&client, filter, &params).await {
        Ok(outcomes) => {
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(result) => println!(
                        "ticket {} ({}): closed, retcode {}",
                        outcome.ticket, outcome.symbol, result.retcode
                    ),
                    Err(e) => println!("ticket {} ({}): FAILED - {}", outcome.ticket, outcome.symbol, e),
                }
            }
            println!("{} position(s) targeted", outcomes.len());
        }
        Err(e) => error!("bulk liquidation aborted: {}", e),
    }

    client.shutdown().await?;
    Ok(())
}

/// Run the full workflow: place the configured order, snapshot positions,
/// then flatten everything.
async fn cmd_run() -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let side = Side::from_str(&config.direction)
        .map_err(|_| anyhow::anyhow!("invalid DIRECTION: {}", config.direction))?;
    let params = trade_params(&config)?;

    let client = TerminalClient::new(&config);
    connect(&client, &config).await?;

    info!("Placing market order");
    match execute_market_order(&client, &config.symbol, config.volume, side, &params).await {
        Ok(result) => info!(
            retcode = result.retcode,
            order = result.order,
            "market order result"
        ),
        Err(e) => error!("market order failed: {}", e),
    }

    info!("Retrieving open positions");
    match open_positions(&client).await {
        Ok(positions) => print_positions(&positions),
        Err(e) => error!("position query failed: {}", e),
    }

    info!("Closing all trades");
    match close_all(&client, SideFilter::All, &params).await {
        Ok(outcomes) => {
            let closed = outcomes.iter().filter(|o| o.result.is_ok()).count();
            info!(
                total = outcomes.len(),
                closed = closed,
                "liquidation finished"
            );
        }
        Err(e) => error!("bulk liquidation aborted: {}", e),
    }

    client.shutdown().await?;
    info!("Session closed");

    Ok(())
}
