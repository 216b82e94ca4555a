//! Tiered candidate selection.
//!
//! Tier 1 applies the full screen (cap/volume, measured growth, social).
//! When it produces nothing, the fallback tier rebuilds the list from raw
//! ranked volume so the report always has rows. The fallback deliberately
//! ignores growth and social data entirely; it never recomputes growth.

use std::cmp::Ordering;

use common::{AssetRecord, SocialSignal, Verdict};
use tracing::{debug, info};

use crate::growth::{estimate_growth, GrowthEstimate};
use crate::sources::{SocialSignalSource, VolumeSource};
use crate::types::{AssetSkip, Candidate, Selection, SkipReason, ThresholdConfig, Tier};

/// Composite ordering key: growth first, volume breaks ties. Unmeasured
/// growth sorts as zero.
fn sort_key(candidate: &Candidate) -> (f64, f64) {
    (candidate.growth_pct.unwrap_or(0.0), candidate.volume_24h)
}

pub struct Selector<'a, V, S> {
    volumes: &'a V,
    social: &'a S,
    config: &'a ThresholdConfig,
}

impl<'a, V, S> Selector<'a, V, S>
where
    V: VolumeSource,
    S: SocialSignalSource,
{
    pub fn new(volumes: &'a V, social: &'a S, config: &'a ThresholdConfig) -> Self {
        Self {
            volumes,
            social,
            config,
        }
    }

    /// Run both tiers over the fetched assets, in fetch order.
    ///
    /// The returned list is sorted descending by (growth, volume) and
    /// truncated to `top_n`. Equal keys keep fetch order (stable sort),
    /// so a fixed snapshot always yields the same list.
    pub async fn select(&self, assets: &[AssetRecord]) -> Selection {
        let mut candidates = Vec::new();
        let mut skips = Vec::new();

        for asset in assets {
            match self.screen_primary(asset).await {
                Ok(candidate) => candidates.push(candidate),
                Err(reason) => {
                    debug!("skip {}: {}", asset.id, reason.as_str());
                    skips.push(AssetSkip {
                        id: asset.id.clone(),
                        reason,
                    });
                }
            }
        }

        let tier = if candidates.is_empty() {
            info!("no primary-tier candidates; falling back to top raw volume");
            candidates = self.volume_fallback(assets);
            Tier::VolumeFallback
        } else {
            Tier::Primary
        };

        candidates.sort_by(|a, b| {
            sort_key(b)
                .partial_cmp(&sort_key(a))
                .unwrap_or(Ordering::Equal)
        });
        candidates.truncate(self.config.top_n);

        info!(
            "selected {} candidates ({} tier, {} skipped)",
            candidates.len(),
            tier.as_str(),
            skips.len()
        );

        Selection {
            candidates,
            skips,
            tier,
        }
    }

    /// Full Tier-1 screen for one asset.
    async fn screen_primary(&self, asset: &AssetRecord) -> Result<Candidate, SkipReason> {
        if asset.market_cap >= self.config.mcap_max {
            return Err(SkipReason::McapTooHigh);
        }
        if asset.total_volume <= self.config.vol_min {
            return Err(SkipReason::VolumeTooLow);
        }

        let estimate = match self.volumes.volume_series(&asset.id).await {
            Some(series) => estimate_growth(&series),
            None => GrowthEstimate::unavailable(),
        };
        let growth = estimate.growth_pct.ok_or(SkipReason::GrowthUnavailable)?;
        if growth < self.config.vol_growth_min {
            return Err(SkipReason::GrowthBelowMin);
        }

        let social = self.social.social_stats(&asset.symbol).await;
        if self.config.require_social
            && (social.mentions < self.config.social_min
                || social.sentiment_pct < self.config.sentiment_min)
        {
            return Err(SkipReason::SocialBelowMin);
        }

        Ok(Candidate {
            id: asset.id.clone(),
            symbol: asset.ticker(),
            name: asset.name.clone(),
            market_cap: asset.market_cap,
            volume_24h: estimate.last_avg,
            growth_pct: Some(growth),
            social,
            utility: String::new(),
            red_flags: String::new(),
            verdict: Verdict::Watch,
        })
    }

    /// Fallback tier: top raw-volume assets, growth and social ignored.
    fn volume_fallback(&self, assets: &[AssetRecord]) -> Vec<Candidate> {
        let mut backup: Vec<Candidate> = assets
            .iter()
            .filter(|asset| {
                !self.config.strict_filters
                    || (asset.market_cap < self.config.mcap_max
                        && asset.total_volume > self.config.vol_min)
            })
            .map(Candidate::from_volume)
            .collect();

        backup.sort_by(|a, b| {
            b.volume_24h
                .partial_cmp(&a.volume_24h)
                .unwrap_or(Ordering::Equal)
        });
        backup.truncate(self.config.top_n);
        backup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{VolumePoint, VolumeSeries};
    use social_client::StaticSocialTable;
    use std::collections::HashMap;

    struct FixedVolumes(HashMap<String, VolumeSeries>);

    impl FixedVolumes {
        fn new(entries: &[(&str, &[f64])]) -> Self {
            let map = entries
                .iter()
                .map(|(id, volumes)| (id.to_string(), hourly(volumes)))
                .collect();
            Self(map)
        }

        fn empty() -> Self {
            Self(HashMap::new())
        }
    }

    impl VolumeSource for FixedVolumes {
        async fn volume_series(&self, asset_id: &str) -> Option<VolumeSeries> {
            self.0.get(asset_id).cloned()
        }
    }

    struct NoSocial;

    impl SocialSignalSource for NoSocial {
        async fn social_stats(&self, _symbol: &str) -> SocialSignal {
            SocialSignal::default()
        }
    }

    fn hourly(volumes: &[f64]) -> VolumeSeries {
        VolumeSeries::new(
            volumes
                .iter()
                .enumerate()
                .map(|(i, v)| VolumePoint {
                    ts_ms: i as i64 * 3_600_000,
                    volume: *v,
                })
                .collect(),
        )
    }

    fn asset(id: &str, symbol: &str, market_cap: f64, total_volume: f64) -> AssetRecord {
        AssetRecord {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: format!("{} Coin", symbol.to_uppercase()),
            market_cap,
            total_volume,
        }
    }

    /// Three small caps, healthy volume, strong growth, social majors.
    fn passing_assets() -> Vec<AssetRecord> {
        vec![
            asset("bitcoin", "btc", 10_000_000.0, 2_000_000.0),
            asset("ethereum", "eth", 20_000_000.0, 3_000_000.0),
            asset("solana", "sol", 30_000_000.0, 4_000_000.0),
        ]
    }

    /// Social table where all three majors clear the default minimums.
    /// (The default seed's SOL sentiment sits below the 65% screen.)
    fn passing_social() -> StaticSocialTable {
        StaticSocialTable::with_entries(&[
            ("BTC", 500, 70.0),
            ("ETH", 300, 66.0),
            ("SOL", 150, 68.0),
        ])
    }

    fn growing_volumes() -> FixedVolumes {
        FixedVolumes::new(&[
            ("bitcoin", &[100.0, 100.0, 180.0, 180.0][..]),  // +80%
            ("ethereum", &[100.0, 100.0, 250.0, 250.0][..]), // +150%
            ("solana", &[100.0, 100.0, 200.0, 200.0][..]),   // +100%
        ])
    }

    #[tokio::test]
    async fn all_passing_assets_rank_by_growth_desc() {
        let volumes = growing_volumes();
        let social = passing_social();
        let config = ThresholdConfig::default();
        let selection = Selector::new(&volumes, &social, &config)
            .select(&passing_assets())
            .await;

        assert_eq!(selection.tier, Tier::Primary);
        assert_eq!(selection.candidates.len(), 3);
        let ids: Vec<&str> = selection
            .candidates
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ethereum", "solana", "bitcoin"]);
        assert!(selection.skips.is_empty());
    }

    #[tokio::test]
    async fn absent_social_triggers_volume_fallback() {
        let volumes = growing_volumes();
        let social = NoSocial;
        let config = ThresholdConfig::default();
        let selection = Selector::new(&volumes, &social, &config)
            .select(&passing_assets())
            .await;

        assert_eq!(selection.tier, Tier::VolumeFallback);
        // Fallback sorts by raw volume descending and ignores growth.
        let ids: Vec<&str> = selection
            .candidates
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["solana", "ethereum", "bitcoin"]);
        for candidate in &selection.candidates {
            assert_eq!(candidate.growth_pct, None);
            assert_eq!(candidate.social, SocialSignal::default());
            assert_eq!(candidate.verdict, Verdict::Watch);
        }
        // Every asset was rejected in the primary pass.
        assert_eq!(selection.skips.len(), 3);
        assert!(selection
            .skips
            .iter()
            .all(|s| s.reason == SkipReason::SocialBelowMin));
    }

    #[tokio::test]
    async fn single_sample_series_is_excluded_from_primary_tier() {
        let volumes = FixedVolumes::new(&[("bitcoin", &[5_000.0][..])]);
        let social = StaticSocialTable::default();
        let config = ThresholdConfig::default();
        let assets = vec![asset("bitcoin", "btc", 10_000_000.0, 2_000_000.0)];
        let selection = Selector::new(&volumes, &social, &config)
            .select(&assets)
            .await;

        assert_eq!(selection.tier, Tier::VolumeFallback);
        assert_eq!(
            selection.skips,
            vec![AssetSkip {
                id: "bitcoin".into(),
                reason: SkipReason::GrowthUnavailable,
            }]
        );
    }

    #[tokio::test]
    async fn output_never_exceeds_top_n() {
        let assets: Vec<AssetRecord> = (0..12)
            .map(|i| {
                asset(
                    &format!("coin{}", i),
                    &format!("c{}", i),
                    1_000_000.0,
                    1_000_000.0 + i as f64,
                )
            })
            .collect();
        let volumes = FixedVolumes::empty();
        let social = NoSocial;
        let config = ThresholdConfig {
            top_n: 5,
            ..ThresholdConfig::default()
        };
        let selection = Selector::new(&volumes, &social, &config)
            .select(&assets)
            .await;

        assert_eq!(selection.candidates.len(), 5);
        assert_eq!(selection.tier, Tier::VolumeFallback);
        // Highest raw volume first.
        assert_eq!(selection.candidates[0].id, "coin11");
    }

    #[tokio::test]
    async fn strict_filters_gate_the_fallback_screen() {
        // One asset over the cap, one under the volume floor.
        let assets = vec![
            asset("bigcap", "big", 90_000_000.0, 9_000_000.0),
            asset("thin", "thn", 1_000_000.0, 100.0),
        ];
        let volumes = FixedVolumes::empty();
        let social = NoSocial;

        let strict = ThresholdConfig::default();
        let selection = Selector::new(&volumes, &social, &strict)
            .select(&assets)
            .await;
        assert!(selection.candidates.is_empty());
        assert_eq!(selection.tier, Tier::VolumeFallback);

        let loose = ThresholdConfig {
            strict_filters: false,
            ..ThresholdConfig::default()
        };
        let selection = Selector::new(&volumes, &social, &loose)
            .select(&assets)
            .await;
        assert_eq!(selection.candidates.len(), 2);
        assert_eq!(selection.candidates[0].id, "bigcap");
    }

    #[tokio::test]
    async fn growth_below_threshold_is_skipped_with_reason() {
        let volumes = FixedVolumes::new(&[
            ("bitcoin", &[100.0, 100.0, 110.0, 110.0][..]), // +10%, below 30
        ]);
        let social = StaticSocialTable::default();
        let config = ThresholdConfig::default();
        let assets = vec![asset("bitcoin", "btc", 10_000_000.0, 2_000_000.0)];
        let selection = Selector::new(&volumes, &social, &config)
            .select(&assets)
            .await;

        assert_eq!(selection.skips[0].reason, SkipReason::GrowthBelowMin);
    }

    #[tokio::test]
    async fn primary_candidates_use_last_half_average_volume() {
        let volumes = growing_volumes();
        let social = passing_social();
        let config = ThresholdConfig::default();
        let selection = Selector::new(&volumes, &social, &config)
            .select(&passing_assets())
            .await;

        let btc = selection
            .candidates
            .iter()
            .find(|c| c.id == "bitcoin")
            .unwrap();
        assert_eq!(btc.volume_24h, 180.0);
        assert_eq!(btc.growth_pct, Some(80.0));
    }

    #[tokio::test]
    async fn selection_is_idempotent_for_a_fixed_snapshot() {
        let volumes = growing_volumes();
        let social = passing_social();
        let config = ThresholdConfig::default();
        let assets = passing_assets();
        let selector = Selector::new(&volumes, &social, &config);

        let first = selector.select(&assets).await;
        let second = selector.select(&assets).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn equal_sort_keys_keep_fetch_order() {
        // Identical raw volumes in the fallback: stable sort must keep
        // the original fetch order.
        let assets = vec![
            asset("first", "aaa", 1_000_000.0, 2_000_000.0),
            asset("second", "bbb", 1_000_000.0, 2_000_000.0),
            asset("third", "ccc", 1_000_000.0, 2_000_000.0),
        ];
        let volumes = FixedVolumes::empty();
        let social = NoSocial;
        let config = ThresholdConfig::default();
        let selection = Selector::new(&volumes, &social, &config)
            .select(&assets)
            .await;

        let ids: Vec<&str> = selection
            .candidates
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn zero_assets_yield_zero_candidates() {
        let volumes = FixedVolumes::empty();
        let social = NoSocial;
        let config = ThresholdConfig::default();
        let selection = Selector::new(&volumes, &social, &config).select(&[]).await;

        assert!(selection.candidates.is_empty());
        assert_eq!(selection.tier, Tier::VolumeFallback);
    }
}
