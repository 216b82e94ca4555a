//! REST client for the CoinGecko API.
//!
//! Covers: ranked market listings and per-asset historical volume charts.
//! All calls share one rate-limit bucket; the API key (if any) is sent in
//! every header variant CoinGecko has used across key tiers.

use common::{AssetRecord, Error, VolumePoint, VolumeSeries};
use serde::Deserialize;
use std::error::Error as StdError;
use tracing::{debug, info, warn};

use crate::rate_limit::RateLimiter;

const PUBLIC_BASE_URL: &str = "https://api.coingecko.com/api/v3";

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn resolve_base_url() -> String {
    if let Ok(override_url) = std::env::var("COINGECKO_API_BASE") {
        let normalized = normalize_base_url(&override_url);
        if !normalized.is_empty() {
            info!("Using COINGECKO_API_BASE override: {}", normalized);
            return normalized;
        }
        warn!("Ignoring empty COINGECKO_API_BASE override");
    }

    PUBLIC_BASE_URL.to_string()
}

fn format_reqwest_error(err: &reqwest::Error) -> String {
    // Keep chained causes so network failures (DNS/TLS/socket) are visible.
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

/// Raw market chart payload from GET /coins/{id}/market_chart.
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    total_volumes: Vec<Vec<f64>>,
}

fn series_from_chart(chart: MarketChartResponse) -> VolumeSeries {
    let points = chart
        .total_volumes
        .into_iter()
        .filter(|entry| entry.len() >= 2)
        .map(|entry| VolumePoint {
            ts_ms: entry[0] as i64,
            volume: entry[1],
        })
        .collect();
    VolumeSeries::new(points)
}

/// Async REST client for CoinGecko.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    limiter: RateLimiter,
}

impl CoinGeckoClient {
    /// Create a new client. An empty `api_key` means anonymous access.
    pub fn new(api_key: &str) -> Self {
        let base_url = resolve_base_url();

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            base_url,
            api_key: api_key.trim().to_string(),
            limiter: RateLimiter::new(),
        }
    }

    /// URL helper.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_key_headers(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            return req;
        }
        // Demo, pro, and legacy key headers; CoinGecko ignores the ones
        // that do not match the key's tier.
        req.header("x-cg-demo-api-key", &self.api_key)
            .header("x-cg-pro-api-key", &self.api_key)
            .header("x-cg-api-key", &self.api_key)
    }

    /// Fetch one page of assets ranked by 24h volume.
    pub async fn get_markets(
        &self,
        vs_currency: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<AssetRecord>, Error> {
        self.limiter.wait().await;

        let per_page_param = per_page.to_string();
        let page_param = page.to_string();
        let req = self
            .client
            .get(self.url("/coins/markets"))
            .query(&[
                ("vs_currency", vs_currency),
                ("order", "volume_desc"),
                ("per_page", per_page_param.as_str()),
                ("page", page_param.as_str()),
                ("price_change_percentage", "24h"),
            ]);

        let resp = self
            .with_key_headers(req)
            .send()
            .await
            .map_err(|e| Error::Http(format_reqwest_error(&e)))?;

        let status_code = resp.status().as_u16();
        if status_code != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::CoinGeckoApi {
                status: status_code,
                message: body,
            });
        }

        let assets: Vec<AssetRecord> = resp
            .json()
            .await
            .map_err(|e| Error::Http(format_reqwest_error(&e)))?;

        debug!("Fetched {} assets (page {})", assets.len(), page);
        Ok(assets)
    }

    /// Fetch the ~48h hourly volume series for one asset.
    ///
    /// Returns `Ok(None)` when the API rate-limits or rejects the key
    /// (401/403/429) — the caller treats that as "no growth data", not as
    /// a run failure.
    pub async fn get_volume_series(
        &self,
        coin_id: &str,
        vs_currency: &str,
    ) -> Result<Option<VolumeSeries>, Error> {
        self.limiter.wait().await;

        let path = format!("/coins/{}/market_chart", coin_id);
        let req = self.client.get(self.url(&path)).query(&[
            ("vs_currency", vs_currency),
            ("days", "2"),
            ("interval", "hourly"),
        ]);

        let resp = self
            .with_key_headers(req)
            .send()
            .await
            .map_err(|e| Error::Http(format_reqwest_error(&e)))?;

        let status_code = resp.status().as_u16();
        if matches!(status_code, 401 | 403 | 429) {
            warn!(
                "market_chart {} returned {} — treating as no data",
                coin_id, status_code
            );
            return Ok(None);
        }
        if status_code != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::CoinGeckoApi {
                status: status_code,
                message: body,
            });
        }

        let chart: MarketChartResponse = resp
            .json()
            .await
            .map_err(|e| Error::Http(format_reqwest_error(&e)))?;

        Ok(Some(series_from_chart(chart)))
    }
}
