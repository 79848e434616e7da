//! Open position snapshots.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use strum::{Display, EnumString};

use super::order::Side;

/// Read-only snapshot of an open position at the venue.
///
/// Positions are never mutated locally; closing one is expressed as
/// submitting an opposing order referencing its ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Unique position ticket.
    pub ticket: u64,
    /// Traded symbol.
    pub symbol: String,
    /// Position volume in lots.
    pub volume: Decimal,
    /// Position side.
    pub side: Side,
    /// Price the position was opened at.
    pub price_open: Decimal,
    /// Stop-loss price, zero when unset.
    pub stop_loss: Decimal,
    /// Take-profit price, zero when unset.
    pub take_profit: Decimal,
    /// Current floating profit.
    pub profit: Decimal,
    /// When the position was opened.
    pub opened_at: DateTime<Utc>,
}

/// Direction filter for bulk liquidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Default)]
pub enum SideFilter {
    /// Only buy positions.
    #[strum(serialize = "buy", serialize = "BUY")]
    Buy,
    /// Only sell positions.
    #[strum(serialize = "sell", serialize = "SELL")]
    Sell,
    /// Every open position.
    #[default]
    #[strum(serialize = "all", serialize = "ALL")]
    All,
}

impl SideFilter {
    /// Whether a position of the given side passes this filter.
    pub fn matches(self, side: Side) -> bool {
        match self {
            SideFilter::Buy => side == Side::Buy,
            SideFilter::Sell => side == Side::Sell,
            SideFilter::All => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_sides() {
        assert!(SideFilter::Buy.matches(Side::Buy));
        assert!(!SideFilter::Buy.matches(Side::Sell));
        assert!(SideFilter::Sell.matches(Side::Sell));
        assert!(!SideFilter::Sell.matches(Side::Buy));
        assert!(SideFilter::All.matches(Side::Buy));
        assert!(SideFilter::All.matches(Side::Sell));
    }

    #[test]
    fn filter_from_string() {
        use std::str::FromStr;
        assert_eq!(SideFilter::from_str("buy").unwrap(), SideFilter::Buy);
        assert_eq!(SideFilter::from_str("SELL").unwrap(), SideFilter::Sell);
        assert_eq!(SideFilter::from_str("all").unwrap(), SideFilter::All);
        assert!(SideFilter::from_str("none").is_err());
    }
}
