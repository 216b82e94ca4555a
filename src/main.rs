//! Pump radar: scheduled CoinGecko pump-candidate screen.
//!
//! Single-binary Tokio application that:
//! 1. Fetches assets ranked by 24h volume
//! 2. Estimates volume growth from ~48h hourly charts
//! 3. Screens candidates through tiered thresholds with a volume fallback
//! 4. Optionally enriches rows with AI-written summaries
//! 5. Writes a two-sheet xlsx report

mod config;
mod journal;
mod radar;
mod schedule;

use anyhow::Result;
use clap::Parser;
use config::RadarConfig;
use radar::Radar;
use tracing::info;

/// CoinGecko pump-candidate radar with xlsx reports.
#[derive(Parser)]
#[command(name = "pump-radar", about = "CoinGecko pump-candidate radar")]
struct Cli {
    /// Block until the configured local report time, then run once.
    #[arg(long)]
    at_schedule: bool,

    /// Render an empty-input report and verify it was produced, then exit.
    #[arg(long)]
    selftest: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pump_radar=info,coingecko_client=info,social_client=info,candidate_engine=info,report_engine=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = RadarConfig::from_env();
    let report_time = config.report_time;

    info!(
        "Thresholds: mcap<{:.0}, vol>{:.0}, growth≥{:.1}%, social≥{} @ {:.0}%, top {}",
        config.thresholds.mcap_max,
        config.thresholds.vol_min,
        config.thresholds.vol_growth_min,
        config.thresholds.social_min,
        config.thresholds.sentiment_min,
        config.thresholds.top_n,
    );
    info!(
        "Pages: {} x {} assets, output dir: {}",
        config.limit_pages,
        config.per_page,
        config.outdir.display()
    );

    let mut radar = Radar::new(config)?;

    if cli.selftest {
        let path = radar.selftest().await?;
        info!("Selftest OK: {}", path.display());
        return Ok(());
    }

    if cli.at_schedule {
        schedule::wait_until(report_time).await;
    }

    let path = radar.run_once().await?;
    info!("Report saved: {}", path.display());
    Ok(())
}
