//! Social signal sources.
//!
//! Two implementations of the same lookup: an HTTP-backed client for the
//! LunarCrush coins endpoint and a fixed in-memory table. Both collapse
//! every failure mode to the zero signal so a missing social feed never
//! blocks a run.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::time::Duration;

use common::SocialSignal;
use serde::Deserialize;
use tracing::{debug, warn};

const LUNARCRUSH_BASE_URL: &str = "https://lunarcrush.com/api4";

fn format_reqwest_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !cause_msg.is_empty() && !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }

    message
}

#[derive(Debug, Deserialize)]
struct CoinStatsResponse {
    #[serde(default)]
    data: CoinStatsData,
}

#[derive(Debug, Default, Deserialize)]
struct CoinStatsData {
    #[serde(default)]
    interactions_24h: u64,
    /// 0-100 share of positive posts.
    #[serde(default)]
    sentiment: f64,
}

/// HTTP-backed social stats lookup.
#[derive(Debug, Clone)]
pub struct HttpSocialClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpSocialClient {
    pub fn new(api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            base_url: LUNARCRUSH_BASE_URL.to_string(),
            api_key: api_key.trim().to_string(),
        }
    }

    /// Fetch mention count and sentiment for a symbol.
    ///
    /// Any failure (transport, auth, unknown symbol, bad payload) returns
    /// the zero signal.
    pub async fn fetch(&self, symbol: &str) -> SocialSignal {
        let url = format!(
            "{}/public/coins/{}/v1",
            self.base_url,
            symbol.to_uppercase()
        );

        let result = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await;

        let resp = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    "social lookup failed for {}: {}",
                    symbol,
                    format_reqwest_error(&e)
                );
                return SocialSignal::default();
            }
        };

        if !resp.status().is_success() {
            debug!(
                "social lookup for {} returned {}",
                symbol,
                resp.status().as_u16()
            );
            return SocialSignal::default();
        }

        match resp.json::<CoinStatsResponse>().await {
            Ok(stats) => SocialSignal {
                mentions: stats.data.interactions_24h,
                sentiment_pct: stats.data.sentiment,
            },
            Err(e) => {
                warn!(
                    "social payload decode failed for {}: {}",
                    symbol,
                    format_reqwest_error(&e)
                );
                SocialSignal::default()
            }
        }
    }
}

/// Fixed-table social stats, keyed by uppercased symbol.
///
/// Default seed covers a few majors so offline runs stay deterministic.
#[derive(Debug, Clone)]
pub struct StaticSocialTable {
    table: HashMap<String, SocialSignal>,
}

impl StaticSocialTable {
    pub fn with_entries(entries: &[(&str, u64, f64)]) -> Self {
        let table = entries
            .iter()
            .map(|(symbol, mentions, sentiment_pct)| {
                (
                    symbol.to_uppercase(),
                    SocialSignal {
                        mentions: *mentions,
                        sentiment_pct: *sentiment_pct,
                    },
                )
            })
            .collect();
        Self { table }
    }

    /// Look up a symbol; unknown symbols get the zero signal.
    pub fn lookup(&self, symbol: &str) -> SocialSignal {
        self.table
            .get(&symbol.to_uppercase())
            .copied()
            .unwrap_or_default()
    }
}

impl Default for StaticSocialTable {
    fn default() -> Self {
        Self::with_entries(&[("BTC", 500, 70.0), ("ETH", 300, 66.0), ("SOL", 150, 62.0)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_table_is_case_insensitive() {
        let table = StaticSocialTable::default();
        let btc = table.lookup("btc");
        assert_eq!(btc.mentions, 500);
        assert_eq!(btc.sentiment_pct, 70.0);
    }

    #[test]
    fn unknown_symbol_yields_zero_signal() {
        let table = StaticSocialTable::default();
        assert_eq!(table.lookup("DOGE"), SocialSignal::default());
    }

    #[test]
    fn coin_stats_payload_decodes_with_missing_fields() {
        let stats: CoinStatsResponse = serde_json::from_str(r#"{"data":{}}"#).unwrap();
        assert_eq!(stats.data.interactions_24h, 0);
        assert_eq!(stats.data.sentiment, 0.0);
    }
}
