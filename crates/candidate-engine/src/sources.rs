//! Data-source traits the selector depends on.
//!
//! The selector only sees these two lookups; production wiring plugs in
//! the CoinGecko and social HTTP clients, tests plug in fixed tables.

use coingecko_client::CoinGeckoClient;
use common::{SocialSignal, VolumeSeries};
use social_client::{HttpSocialClient, StaticSocialTable};
use tracing::warn;

/// Per-asset historical volume lookup.
///
/// `None` covers every "no data" case: rate limits, transport failures,
/// and malformed payloads. The selector maps it to the unavailable-growth
/// sentinel.
#[allow(async_fn_in_trait)]
pub trait VolumeSource {
    async fn volume_series(&self, asset_id: &str) -> Option<VolumeSeries>;
}

/// Symbol-keyed social stats lookup. Infallible: missing data is the zero
/// signal.
#[allow(async_fn_in_trait)]
pub trait SocialSignalSource {
    async fn social_stats(&self, symbol: &str) -> SocialSignal;
}

impl VolumeSource for CoinGeckoClient {
    async fn volume_series(&self, asset_id: &str) -> Option<VolumeSeries> {
        match self.get_volume_series(asset_id, "usd").await {
            Ok(series) => series,
            Err(e) => {
                warn!("volume series fetch failed for {}: {}", asset_id, e);
                None
            }
        }
    }
}

impl SocialSignalSource for HttpSocialClient {
    async fn social_stats(&self, symbol: &str) -> SocialSignal {
        self.fetch(symbol).await
    }
}

impl SocialSignalSource for StaticSocialTable {
    async fn social_stats(&self, symbol: &str) -> SocialSignal {
        self.lookup(symbol)
    }
}
