//! Market order execution, position closing, and bulk liquidation.

use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument};

use crate::error::{GatewayError, TradingError};
use crate::terminal::TerminalGateway;

use super::order::{OrderRequest, OrderResult, Side, TradeParams};
use super::position::{Position, SideFilter};

/// Outcome of closing one position during bulk liquidation.
#[derive(Debug)]
pub struct CloseOutcome {
    /// Ticket of the position that was targeted.
    pub ticket: u64,
    /// Symbol of the position.
    pub symbol: String,
    /// Submission result for the closing order.
    pub result: Result<OrderResult, TradingError>,
}

/// Execute a market order for a fresh entry.
///
/// Fetches the current tick, prices the order by side (buys at the ask,
/// sells at the bid), and submits it. Every failure surfaces as a typed
/// error; callers decide whether it is fatal.
#[instrument(skip(gateway, params), fields(symbol = symbol, side = %side, volume = %volume))]
pub async fn execute_market_order<G>(
    gateway: &G,
    symbol: &str,
    volume: Decimal,
    side: Side,
    params: &TradeParams,
) -> Result<OrderResult, TradingError>
where
    G: TerminalGateway + ?Sized,
{
    params.validate().map_err(TradingError::InvalidParams)?;
    if symbol.is_empty() {
        return Err(TradingError::InvalidParams("symbol is required".to_string()));
    }
    if volume <= Decimal::ZERO {
        return Err(TradingError::InvalidParams(
            "volume must be positive".to_string(),
        ));
    }

    let tick = gateway
        .symbol_tick(symbol)
        .await
        .map_err(|source| TradingError::TickFetch {
            symbol: symbol.to_string(),
            source,
        })?;

    let request = OrderRequest::market(symbol, volume, side, &tick, params);
    request.validate().map_err(TradingError::InvalidParams)?;

    debug!(price = %request.price, "submitting market order");

    let result = gateway
        .order_send(&request)
        .await
        .map_err(|source| TradingError::SubmissionFailed {
            symbol: symbol.to_string(),
            source,
        })?;

    info!(
        retcode = result.retcode,
        order = result.order,
        deal = result.deal,
        "market order executed"
    );

    Ok(result)
}

/// Close a single open position.
///
/// The closing order inverts the position's side, prices off the inverted
/// side's tick (closing a buy hits the bid), and copies volume and ticket
/// verbatim.
#[instrument(skip(gateway, position, params), fields(ticket = position.ticket, symbol = %position.symbol))]
pub async fn close_position<G>(
    gateway: &G,
    position: &Position,
    params: &TradeParams,
) -> Result<OrderResult, TradingError>
where
    G: TerminalGateway + ?Sized,
{
    params.validate().map_err(TradingError::InvalidParams)?;

    let tick = gateway
        .symbol_tick(&position.symbol)
        .await
        .map_err(|source| TradingError::TickFetch {
            symbol: position.symbol.clone(),
            source,
        })?;

    let close_side = position.side.invert();
    let mut request = OrderRequest::market(
        position.symbol.clone(),
        position.volume,
        close_side,
        &tick,
        params,
    );
    request.position = Some(position.ticket);
    // Closing orders carry no risk levels of their own.
    request.sl = Decimal::ZERO;
    request.tp = Decimal::ZERO;

    info!(side = %close_side, price = %request.price, "closing position");

    let result = gateway
        .order_send(&request)
        .await
        .map_err(|source| TradingError::SubmissionFailed {
            symbol: position.symbol.clone(),
            source,
        })?;

    info!(retcode = result.retcode, deal = result.deal, "position closed");

    Ok(result)
}

/// Close every open position matching the side filter, sequentially.
///
/// Each closure is independent: a failure on one position is logged and
/// recorded, and the remaining positions are still attempted. A failed
/// position query is returned as an error; zero open positions is a no-op.
#[instrument(skip(gateway, params), fields(filter = %filter))]
pub async fn close_all<G>(
    gateway: &G,
    filter: SideFilter,
    params: &TradeParams,
) -> Result<Vec<CloseOutcome>, GatewayError>
where
    G: TerminalGateway + ?Sized,
{
    if gateway.positions_total().await? == 0 {
        debug!("no open positions, nothing to close");
        return Ok(Vec::new());
    }

    let positions = gateway.positions().await?;
    let targets: Vec<Position> = positions
        .into_iter()
        .filter(|p| filter.matches(p.side))
        .collect();

    info!(count = targets.len(), "liquidating positions");

    let mut outcomes = Vec::with_capacity(targets.len());
    for position in &targets {
        let result = close_position(gateway, position, params).await;
        if let Err(e) = &result {
            error!(ticket = position.ticket, error = %e, "failed to close position");
        }
        outcomes.push(CloseOutcome {
            ticket: position.ticket,
            symbol: position.symbol.clone(),
            result,
        });
    }

    let closed = outcomes.iter().filter(|o| o.result.is_ok()).count();
    info!(
        total = outcomes.len(),
        closed = closed,
        failed = outcomes.len() - closed,
        "bulk liquidation complete"
    );

    Ok(outcomes)
}

/// Snapshot all open positions.
///
/// Zero open positions yields an empty vector; a failed query yields an
/// error. The two are deliberately distinct.
#[instrument(skip(gateway))]
pub async fn open_positions<G>(gateway: &G) -> Result<Vec<Position>, GatewayError>
where
    G: TerminalGateway + ?Sized,
{
    if gateway.positions_total().await? == 0 {
        return Ok(Vec::new());
    }
    gateway.positions().await
}
