//! Domain types shared across the radar.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

// ── CoinGecko market types ────────────────────────────────────────────

/// One ranked asset as returned by GET /api/v3/coins/markets.
///
/// CoinGecko serializes missing caps and volumes as `null`; those collapse
/// to 0.0 so a partially-populated record never aborts a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetRecord {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_to_zero")]
    pub market_cap: f64,
    #[serde(default, deserialize_with = "null_to_zero")]
    pub total_volume: f64,
}

impl AssetRecord {
    /// Uppercased ticker symbol.
    pub fn ticker(&self) -> String {
        self.symbol.to_uppercase()
    }

    /// "Name (SYMBOL)" display label; falls back to the symbol when the
    /// upstream name is blank.
    pub fn display_label(&self) -> String {
        let ticker = self.ticker();
        if self.name.trim().is_empty() {
            format!("{} ({})", ticker, ticker)
        } else {
            format!("{} ({})", self.name, ticker)
        }
    }
}

fn null_to_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// A single (timestamp, volume) sample from a market chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VolumePoint {
    pub ts_ms: i64,
    pub volume: f64,
}

/// Ordered hourly volume samples for one asset, oldest first.
///
/// Spans roughly 48 hours; used only to derive a growth figure and then
/// discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VolumeSeries {
    pub points: Vec<VolumePoint>,
}

impl VolumeSeries {
    pub fn new(points: Vec<VolumePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ── Social signal ─────────────────────────────────────────────────────

/// Mention count and sentiment for one symbol over the last 24h.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SocialSignal {
    pub mentions: u64,
    /// Share of positive posts, 0-100.
    pub sentiment_pct: f64,
}

// ── Verdict ───────────────────────────────────────────────────────────

/// Categorical recommendation attached to a report row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Buy,
    Watch,
    Avoid,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Buy => "BUY",
            Verdict::Watch => "WATCH",
            Verdict::Avoid => "AVOID",
        }
    }
}
