use common::{AssetRecord, SocialSignal, Verdict};
use serde::{Deserialize, Serialize};

/// Numeric/boolean screen parameters, read once at process start and
/// passed into the selector. Selection logic never consults the
/// environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdConfig {
    /// Market-cap upper bound in USD (exclusive).
    pub mcap_max: f64,
    /// 24h volume lower bound in USD (exclusive).
    pub vol_min: f64,
    /// Minimum volume growth % for the primary tier.
    pub vol_growth_min: f64,
    /// Minimum 24h social mention count.
    pub social_min: u64,
    /// Minimum sentiment %, 0-100.
    pub sentiment_min: f64,
    /// Whether the social screen is applied at all.
    pub require_social: bool,
    /// Whether the fallback tier re-applies the cap/volume screen.
    pub strict_filters: bool,
    /// Max candidates in the final list.
    pub top_n: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            mcap_max: 50_000_000.0,
            vol_min: 500_000.0,
            vol_growth_min: 30.0,
            social_min: 100,
            sentiment_min: 65.0,
            require_social: true,
            strict_filters: true,
            top_n: 5,
        }
    }
}

/// A selected pump candidate — one report row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub market_cap: f64,
    /// Last-24h average volume when growth data was available, otherwise
    /// the raw ranked volume.
    pub volume_24h: f64,
    /// `None` means growth could not be measured (short series or rate
    /// limit), which is distinct from a confirmed 0% reading.
    pub growth_pct: Option<f64>,
    pub social: SocialSignal,
    pub utility: String,
    pub red_flags: String,
    pub verdict: Verdict,
}

impl Candidate {
    /// Fallback-tier constructor: raw volume, no growth, no social data.
    pub fn from_volume(asset: &AssetRecord) -> Self {
        Self {
            id: asset.id.clone(),
            symbol: asset.ticker(),
            name: asset.name.clone(),
            market_cap: asset.market_cap,
            volume_24h: asset.total_volume,
            growth_pct: None,
            social: SocialSignal::default(),
            utility: String::new(),
            red_flags: String::new(),
            verdict: Verdict::Watch,
        }
    }

    /// "Name (SYMBOL)" label for the report.
    pub fn label(&self) -> String {
        if self.name.trim().is_empty() {
            format!("{} ({})", self.symbol, self.symbol)
        } else {
            format!("{} ({})", self.name, self.symbol)
        }
    }
}

/// Why an asset was rejected during the primary pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    McapTooHigh,
    VolumeTooLow,
    GrowthUnavailable,
    GrowthBelowMin,
    SocialBelowMin,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::McapTooHigh => "mcap_too_high",
            SkipReason::VolumeTooLow => "volume_too_low",
            SkipReason::GrowthUnavailable => "growth_unavailable",
            SkipReason::GrowthBelowMin => "growth_below_min",
            SkipReason::SocialBelowMin => "social_below_min",
        }
    }
}

/// Per-asset rejection record, kept so a run's skips stay inspectable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetSkip {
    pub id: String,
    pub reason: SkipReason,
}

/// Which pass produced the final list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Primary,
    VolumeFallback,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Primary => "primary",
            Tier::VolumeFallback => "volume_fallback",
        }
    }
}

/// Selector output: the ordered candidates plus skip accounting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Selection {
    pub candidates: Vec<Candidate>,
    pub skips: Vec<AssetSkip>,
    pub tier: Tier,
}
