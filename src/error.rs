//! Unified error types for the terminal bot.

use thiserror::Error;

/// Unified error type for the bot.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Terminal gateway error.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Trading/order error.
    #[error("trading error: {0}")]
    Trading(#[from] TradingError),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Terminal session and transport errors.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Terminal initialization failed.
    #[error("terminal initialization failed: {0}")]
    InitFailed(String),

    /// Login was refused by the terminal or server.
    #[error("login failed for account {account}: {reason}")]
    LoginFailed {
        /// Account number that failed to log in.
        account: u64,
        /// Reason reported by the terminal.
        reason: String,
    },

    /// No tick available for a symbol.
    #[error("tick unavailable for {symbol}: {reason}")]
    TickUnavailable {
        /// The symbol that was queried.
        symbol: String,
        /// Reason for failure.
        reason: String,
    },

    /// Position query failed.
    #[error("position query failed: {0}")]
    QueryFailed(String),

    /// Order was rejected by the trade server.
    #[error("order rejected: retcode={retcode} {comment}")]
    Rejected {
        /// Venue return code.
        retcode: u32,
        /// Broker comment accompanying the rejection.
        comment: String,
    },

    /// HTTP request to the terminal bridge failed.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Terminal response could not be decoded.
    #[error("failed to decode terminal response: {0}")]
    Decode(String),
}

/// Order construction and submission errors.
#[derive(Error, Debug)]
pub enum TradingError {
    /// Invalid order parameters.
    #[error("invalid order parameters: {0}")]
    InvalidParams(String),

    /// Could not fetch the tick needed to price the order.
    #[error("failed to fetch tick for {symbol}: {source}")]
    TickFetch {
        /// Symbol whose tick was requested.
        symbol: String,
        /// Underlying gateway error.
        #[source]
        source: GatewayError,
    },

    /// Order submission failed.
    #[error("order submission failed for {symbol}: {source}")]
    SubmissionFailed {
        /// Symbol of the failed order.
        symbol: String,
        /// Underlying gateway error.
        #[source]
        source: GatewayError,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, BotError>;
