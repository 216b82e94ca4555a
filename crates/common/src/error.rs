//! Unified error type for the pump radar.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("CoinGecko API error (status={status}): {message}")]
    CoinGeckoApi { status: u16, message: String },

    #[error("Rate limited on {0}")]
    RateLimited(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
