//! REST client for the CoinGecko public API.

pub mod rate_limit;
pub mod rest;

pub use rate_limit::RateLimiter;
pub use rest::CoinGeckoClient;
