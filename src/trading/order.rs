//! Order types and construction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::terminal::Tick;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order.
    #[strum(serialize = "BUY", serialize = "buy")]
    Buy,
    /// Sell order.
    #[strum(serialize = "SELL", serialize = "sell")]
    Sell,
}

impl Side {
    /// The venue's numeric order-type code (ORDER_TYPE_BUY=0, ORDER_TYPE_SELL=1).
    pub fn code(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Map a venue order-type code back to a side.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    /// The opposite side. Used to flatten an open position.
    pub fn invert(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Pick the execution price for this side from a tick.
    /// Buys lift the ask, sells hit the bid.
    pub fn pick_price(self, tick: &Tick) -> Decimal {
        match self {
            Side::Buy => tick.ask,
            Side::Sell => tick.bid,
        }
    }
}

/// Order expiration policy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimePolicy {
    /// Good-till-cancelled (ORDER_TIME_GTC).
    #[default]
    #[strum(serialize = "GTC", serialize = "gtc")]
    Gtc,
    /// Valid for the current trading day (ORDER_TIME_DAY).
    #[strum(serialize = "DAY", serialize = "day")]
    Day,
}

/// Venue rule governing partial execution (ORDER_FILLING_*).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum FillPolicy {
    /// Fill-or-kill: execute entirely or not at all.
    #[strum(serialize = "FOK", serialize = "fok")]
    Fok,
    /// Immediate-or-cancel: fill what is available, cancel the rest.
    #[default]
    #[strum(serialize = "IOC", serialize = "ioc")]
    Ioc,
    /// Keep the unfilled remainder on the book.
    #[strum(serialize = "RETURN", serialize = "return")]
    Return,
}

/// Trade request action. Market orders are immediate deals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    /// Immediate execution at market (TRADE_ACTION_DEAL).
    Deal,
}

/// Risk and attribution parameters shared by order construction and closing.
#[derive(Debug, Clone)]
pub struct TradeParams {
    /// Stop-loss price, zero when unset.
    pub stop_loss: Decimal,
    /// Take-profit price, zero when unset.
    pub take_profit: Decimal,
    /// Allowed slippage in points.
    pub deviation: u32,
    /// Magic number attributing the order to a strategy.
    pub magic: u64,
    /// Free-form order comment.
    pub comment: String,
    /// Fill policy for the order.
    pub fill_policy: FillPolicy,
}

impl Default for TradeParams {
    fn default() -> Self {
        Self {
            stop_loss: Decimal::ZERO,
            take_profit: Decimal::ZERO,
            deviation: 20,
            magic: 1,
            comment: String::new(),
            fill_policy: FillPolicy::Ioc,
        }
    }
}

impl TradeParams {
    /// Set the stop-loss price.
    pub fn with_stop_loss(mut self, stop_loss: Decimal) -> Self {
        self.stop_loss = stop_loss;
        self
    }

    /// Set the take-profit price.
    pub fn with_take_profit(mut self, take_profit: Decimal) -> Self {
        self.take_profit = take_profit;
        self
    }

    /// Set the allowed slippage in points.
    pub fn with_deviation(mut self, deviation: u32) -> Self {
        self.deviation = deviation;
        self
    }

    /// Set the magic number.
    pub fn with_magic(mut self, magic: u64) -> Self {
        self.magic = magic;
        self
    }

    /// Set the order comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the fill policy.
    pub fn with_fill_policy(mut self, fill_policy: FillPolicy) -> Self {
        self.fill_policy = fill_policy;
        self
    }

    /// Validate risk parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.stop_loss < Decimal::ZERO {
            return Err("stop_loss must not be negative".to_string());
        }
        if self.take_profit < Decimal::ZERO {
            return Err("take_profit must not be negative".to_string());
        }
        Ok(())
    }
}

/// A fully-built trade request ready for submission. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    /// Trade action, always an immediate deal for this bot.
    pub action: TradeAction,
    /// Symbol to trade.
    pub symbol: String,
    /// Volume in lots.
    pub volume: Decimal,
    /// Order side.
    #[serde(rename = "type")]
    pub side: Side,
    /// Execution price derived from the current tick.
    pub price: Decimal,
    /// Stop-loss price, zero when unset.
    pub sl: Decimal,
    /// Take-profit price, zero when unset.
    pub tp: Decimal,
    /// Allowed slippage in points.
    pub deviation: u32,
    /// Magic number.
    pub magic: u64,
    /// Order comment.
    pub comment: String,
    /// Expiration policy.
    pub type_time: TimePolicy,
    /// Fill policy.
    pub type_filling: FillPolicy,
    /// Ticket of the position being closed, if this is a closing order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

impl OrderRequest {
    /// Build a market order for a fresh entry.
    pub fn market(
        symbol: impl Into<String>,
        volume: Decimal,
        side: Side,
        tick: &Tick,
        params: &TradeParams,
    ) -> Self {
        Self {
            action: TradeAction::Deal,
            symbol: symbol.into(),
            volume,
            side,
            price: side.pick_price(tick),
            sl: params.stop_loss,
            tp: params.take_profit,
            deviation: params.deviation,
            magic: params.magic,
            comment: params.comment.clone(),
            type_time: TimePolicy::Gtc,
            type_filling: params.fill_policy,
            position: None,
        }
    }

    /// Validate a request before it touches the gateway.
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.is_empty() {
            return Err("symbol is required".to_string());
        }
        if self.volume <= Decimal::ZERO {
            return Err("volume must be positive".to_string());
        }
        if self.price <= Decimal::ZERO {
            return Err("price must be positive".to_string());
        }
        Ok(())
    }
}

/// Venue return code for a completed request.
pub const RETCODE_DONE: u32 = 10009;

/// Outcome of an order submission, passed through from the trade server.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResult {
    /// Venue return code.
    pub retcode: u32,
    /// Ticket of the resulting order.
    #[serde(default)]
    pub order: u64,
    /// Ticket of the resulting deal.
    #[serde(default)]
    pub deal: u64,
    /// Volume actually dealt.
    #[serde(default)]
    pub volume: Option<Decimal>,
    /// Price actually dealt.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Broker comment.
    #[serde(default)]
    pub comment: String,
    /// Request id echoed by the terminal.
    #[serde(default)]
    pub request_id: u32,
}

impl OrderResult {
    /// Whether the trade server reported the request as completed.
    pub fn is_done(&self) -> bool {
        self.retcode == RETCODE_DONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn tick(bid: Decimal, ask: Decimal) -> Tick {
        Tick {
            bid,
            ask,
            time: Utc::now(),
        }
    }

    #[test]
    fn buy_prices_at_ask_sell_at_bid() {
        let t = tick(dec!(1.0850), dec!(1.0852));
        assert_eq!(Side::Buy.pick_price(&t), dec!(1.0852));
        assert_eq!(Side::Sell.pick_price(&t), dec!(1.0850));
    }

    #[test]
    fn side_inversion_is_involutive() {
        assert_eq!(Side::Buy.invert(), Side::Sell);
        assert_eq!(Side::Sell.invert(), Side::Buy);
        assert_eq!(Side::Buy.invert().invert(), Side::Buy);
    }

    #[test]
    fn side_codes_round_trip() {
        assert_eq!(Side::Buy.code(), 0);
        assert_eq!(Side::Sell.code(), 1);
        assert_eq!(Side::from_code(0), Some(Side::Buy));
        assert_eq!(Side::from_code(1), Some(Side::Sell));
        assert_eq!(Side::from_code(2), None);
    }

    #[test]
    fn side_from_string() {
        use std::str::FromStr;
        assert_eq!(Side::from_str("buy").unwrap(), Side::Buy);
        assert_eq!(Side::from_str("SELL").unwrap(), Side::Sell);
        assert!(Side::from_str("hold").is_err());
    }

    #[test]
    fn market_order_carries_params() {
        let t = tick(dec!(1.0850), dec!(1.0852));
        let params = TradeParams::default()
            .with_stop_loss(dec!(1.0800))
            .with_take_profit(dec!(1.0900))
            .with_deviation(10)
            .with_magic(7)
            .with_comment("entry")
            .with_fill_policy(FillPolicy::Fok);

        let request = OrderRequest::market("EURUSD", dec!(0.1), Side::Buy, &t, &params);

        assert_eq!(request.symbol, "EURUSD");
        assert_eq!(request.volume, dec!(0.1));
        assert_eq!(request.side, Side::Buy);
        assert_eq!(request.price, dec!(1.0852));
        assert_eq!(request.sl, dec!(1.0800));
        assert_eq!(request.tp, dec!(1.0900));
        assert_eq!(request.deviation, 10);
        assert_eq!(request.magic, 7);
        assert_eq!(request.comment, "entry");
        assert_eq!(request.type_time, TimePolicy::Gtc);
        assert_eq!(request.type_filling, FillPolicy::Fok);
        assert_eq!(request.position, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn request_validation_rejects_bad_inputs() {
        let t = tick(dec!(1.0850), dec!(1.0852));
        let params = TradeParams::default();

        let empty_symbol = OrderRequest::market("", dec!(0.1), Side::Buy, &t, &params);
        assert!(empty_symbol.validate().is_err());

        let zero_volume = OrderRequest::market("EURUSD", dec!(0), Side::Buy, &t, &params);
        assert!(zero_volume.validate().is_err());
    }

    #[test]
    fn trade_params_validation() {
        assert!(TradeParams::default().validate().is_ok());
        assert!(TradeParams::default()
            .with_stop_loss(dec!(-1))
            .validate()
            .is_err());
        assert!(TradeParams::default()
            .with_take_profit(dec!(-1))
            .validate()
            .is_err());
    }

    #[test]
    fn order_result_done_check() {
        let done = OrderResult {
            retcode: RETCODE_DONE,
            order: 1,
            deal: 1,
            volume: None,
            price: None,
            comment: String::new(),
            request_id: 0,
        };
        assert!(done.is_done());

        let requote = OrderResult {
            retcode: 10004,
            ..done
        };
        assert!(!requote.is_done());
    }
}
