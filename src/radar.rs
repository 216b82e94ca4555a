use anyhow::{bail, Context, Result};
use candidate_engine::{Selection, Selector, SocialSignalSource, Tier};
use coingecko_client::CoinGeckoClient;
use common::{AssetRecord, SocialSignal};
use enrich_client::{placeholder_enrichment, EnrichClient, EnrichmentRequest};
use report_engine::ReportWriter;
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::RadarConfig;
use crate::journal::{now_iso, resolve_journal_dir, RunJournal};

/// Social backend picked at startup: HTTP when a key is configured,
/// otherwise the fixed table.
enum SocialBackend {
    Http(social_client::HttpSocialClient),
    Static(social_client::StaticSocialTable),
}

impl SocialSignalSource for SocialBackend {
    async fn social_stats(&self, symbol: &str) -> SocialSignal {
        match self {
            SocialBackend::Http(client) => client.social_stats(symbol).await,
            SocialBackend::Static(table) => table.social_stats(symbol).await,
        }
    }
}

pub struct Radar {
    config: RadarConfig,
    markets: CoinGeckoClient,
    social: SocialBackend,
    enricher: Option<EnrichClient>,
    journal: RunJournal,
}

impl Radar {
    pub fn new(config: RadarConfig) -> Result<Self> {
        let markets = CoinGeckoClient::new(&config.coingecko_api_key);

        let social = if config.lunarcrush_api_key.is_empty() {
            info!("Social source: static table (no LUNARCRUSH_API_KEY)");
            SocialBackend::Static(social_client::StaticSocialTable::default())
        } else {
            info!("Social source: LunarCrush HTTP");
            SocialBackend::Http(social_client::HttpSocialClient::new(
                &config.lunarcrush_api_key,
            ))
        };

        let enricher = if config.enrich.enabled {
            let api_key = match std::env::var("ANTHROPIC_API_KEY") {
                Ok(key) if !key.trim().is_empty() => key,
                _ => bail!("ENRICH_ENABLED=true requires ANTHROPIC_API_KEY"),
            };
            info!("Enrichment enabled: model {}", config.enrich.model);
            Some(EnrichClient::new(
                api_key,
                config.enrich.model.clone(),
                config.enrich.timeout_ms,
                config.enrich.max_retries,
            ))
        } else {
            None
        };

        let journal_dir = resolve_journal_dir(&config.outdir);
        let journal = RunJournal::open(journal_dir).context("failed to open run journal")?;
        info!("Run journal path: {}", journal.dir().display());

        Ok(Self {
            config,
            markets,
            social,
            enricher,
            journal,
        })
    }

    /// One full run: fetch, select, enrich, render.
    pub async fn run_once(&mut self) -> Result<PathBuf> {
        self.journal.write_event(json!({
            "ts": now_iso(),
            "kind": "run_start",
            "limit_pages": self.config.limit_pages,
            "per_page": self.config.per_page,
            "enrich_enabled": self.enricher.is_some(),
            "thresholds": self.config.thresholds,
        }));

        let assets = self.fetch_assets().await;
        info!("Fetched {} ranked assets", assets.len());

        let selection = Selector::new(&self.markets, &self.social, &self.config.thresholds)
            .select(&assets)
            .await;
        self.journal_selection(&selection);

        let mut candidates = selection.candidates;
        if let Some(enricher) = &self.enricher {
            let mut failures = 0usize;
            for candidate in &mut candidates {
                let request = EnrichmentRequest {
                    request_id: Uuid::new_v4(),
                    coin_id: candidate.id.clone(),
                    symbol: candidate.symbol.clone(),
                    name: candidate.name.clone(),
                    snapshot: json!({
                        "market_cap": candidate.market_cap,
                        "volume_24h": candidate.volume_24h,
                        "growth_pct": candidate.growth_pct,
                        "mentions": candidate.social.mentions,
                        "sentiment_pct": candidate.social.sentiment_pct,
                    }),
                    as_of_ts_ms: chrono::Utc::now().timestamp_millis(),
                };

                match enricher.enrich(request).await {
                    Ok(enrichment) => {
                        candidate.utility = enrichment.utility;
                        candidate.red_flags = enrichment.red_flags;
                        candidate.verdict = enrichment.verdict;
                    }
                    Err(e) => {
                        warn!("Enrichment failed for {}: {}", candidate.id, e);
                        failures += 1;
                        self.journal.write_event(json!({
                            "ts": now_iso(),
                            "kind": "enrichment_failed",
                            "coin_id": candidate.id,
                            "error": e.to_string(),
                        }));
                        let fallback = placeholder_enrichment();
                        candidate.utility = fallback.utility;
                        candidate.red_flags = fallback.red_flags;
                        candidate.verdict = fallback.verdict;
                    }
                }
            }
            if failures > 0 {
                warn!("Enrichment fell back to placeholders for {} rows", failures);
            }
        }

        let writer = ReportWriter::new(self.config.outdir.clone());
        let path = writer
            .write(&candidates)
            .context("failed to write report")?;

        self.journal.write_event(json!({
            "ts": now_iso(),
            "kind": "report_written",
            "path": path.display().to_string(),
            "rows": candidates.len().max(1),
        }));
        self.journal.write_event(json!({
            "ts": now_iso(),
            "kind": "run_summary",
            "assets_fetched": assets.len(),
            "candidates": candidates.len(),
        }));

        Ok(path)
    }

    /// Render an empty-input report and verify the artifact landed.
    pub async fn selftest(&mut self) -> Result<PathBuf> {
        let writer = ReportWriter::new(self.config.outdir.clone());
        let path = writer.write(&[]).context("selftest render failed")?;

        let meta = std::fs::metadata(&path).context("selftest report missing")?;
        if meta.len() == 0 {
            bail!("selftest report is empty: {}", path.display());
        }

        self.journal.write_event(json!({
            "ts": now_iso(),
            "kind": "selftest_ok",
            "path": path.display().to_string(),
        }));
        Ok(path)
    }

    /// Fetch every configured page; a failed page is logged and skipped,
    /// never fatal.
    async fn fetch_assets(&mut self) -> Vec<AssetRecord> {
        let mut assets = Vec::new();
        for page in 1..=self.config.limit_pages {
            match self
                .markets
                .get_markets("usd", self.config.per_page, page)
                .await
            {
                Ok(batch) => assets.extend(batch),
                Err(e) => {
                    warn!("markets page {} failed: {}", page, e);
                    self.journal.write_event(json!({
                        "ts": now_iso(),
                        "kind": "markets_page_failed",
                        "page": page,
                        "error": e.to_string(),
                    }));
                }
            }
        }
        assets
    }

    fn journal_selection(&mut self, selection: &Selection) {
        for skip in &selection.skips {
            self.journal.write_event(json!({
                "ts": now_iso(),
                "kind": "asset_skipped",
                "coin_id": skip.id,
                "reason": skip.reason.as_str(),
            }));
        }
        if selection.tier == Tier::VolumeFallback {
            self.journal.write_event(json!({
                "ts": now_iso(),
                "kind": "fallback_activated",
                "candidates": selection.candidates.len(),
            }));
        }
    }
}
