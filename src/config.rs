//! Environment-derived run configuration.
//!
//! Everything is read once at startup into one struct; selection logic
//! only ever sees the resulting `ThresholdConfig`. Empty or unparseable
//! values fall back to the documented defaults rather than failing the
//! run.

use std::path::PathBuf;

use candidate_engine::ThresholdConfig;
use chrono::NaiveTime;

#[derive(Debug, Clone)]
pub struct RadarConfig {
    pub thresholds: ThresholdConfig,
    /// Number of ranked-markets pages to fetch.
    pub limit_pages: u32,
    /// Assets per page.
    pub per_page: u32,
    /// Directory the xlsx artifact is written to.
    pub outdir: PathBuf,
    /// Local time used by `--at-schedule`.
    pub report_time: NaiveTime,
    pub enrich: EnrichConfig,
    pub coingecko_api_key: String,
    pub lunarcrush_api_key: String,
}

#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub enabled: bool,
    pub model: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
}

impl RadarConfig {
    pub fn from_env() -> Self {
        let thresholds = ThresholdConfig {
            mcap_max: env_f64("MCAP_MAX", 50_000_000.0),
            vol_min: env_f64("VOL_MIN", 500_000.0),
            vol_growth_min: env_f64("VOL_GROWTH_MIN", 30.0),
            social_min: env_u64("SOCIAL_MIN", 100),
            sentiment_min: env_f64("SENTIMENT_MIN", 65.0),
            require_social: env_bool("SOCIAL_REQUIRED", true),
            strict_filters: env_bool("STRICT_FILTERS", true),
            top_n: env_u64("TOP_FALLBACK", 5) as usize,
        };

        let enrich = EnrichConfig {
            enabled: env_bool("ENRICH_ENABLED", false),
            model: env_string("ENRICH_MODEL", "claude-3-5-haiku-latest"),
            timeout_ms: env_u64("ENRICH_TIMEOUT_MS", 20_000),
            max_retries: env_u64("ENRICH_MAX_RETRIES", 2) as u32,
        };

        Self {
            thresholds,
            limit_pages: env_u64("LIMIT_PAGES", 1) as u32,
            per_page: env_u64("PER_PAGE", 200) as u32,
            outdir: PathBuf::from(env_string("OUTDIR", ".")),
            report_time: env_time("REPORT_TIME", NaiveTime::from_hms_opt(8, 30, 0).unwrap()),
            enrich,
            coingecko_api_key: env_string("COINGECKO_API_KEY", ""),
            lunarcrush_api_key: env_string("LUNARCRUSH_API_KEY", ""),
        }
    }
}

// ── Parsing helpers ──────────────────────────────────────────────────
// Split from the env lookups so they stay testable without mutating
// process state.

fn parse_f64(raw: Option<&str>, default: f64) -> f64 {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.parse().unwrap_or(default),
        _ => default,
    }
}

fn parse_u64(raw: Option<&str>, default: u64) -> u64 {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value
            .parse::<u64>()
            // Tolerate float-formatted integers ("5.0").
            .or_else(|_| value.parse::<f64>().map(|f| f as u64))
            .unwrap_or(default),
        _ => default,
    }
}

fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        Some(value) => match value.as_str() {
            "1" | "true" | "yes" | "y" | "on" => true,
            "0" | "false" | "no" | "n" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

fn parse_time(raw: Option<&str>, default: NaiveTime) -> NaiveTime {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => {
            NaiveTime::parse_from_str(value, "%H:%M").unwrap_or(default)
        }
        _ => default,
    }
}

fn parse_string(raw: Option<&str>, default: &str) -> String {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    parse_f64(std::env::var(key).ok().as_deref(), default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    parse_u64(std::env::var(key).ok().as_deref(), default)
}

fn env_bool(key: &str, default: bool) -> bool {
    parse_bool(std::env::var(key).ok().as_deref(), default)
}

fn env_time(key: &str, default: NaiveTime) -> NaiveTime {
    parse_time(std::env::var(key).ok().as_deref(), default)
}

fn env_string(key: &str, default: &str) -> String {
    parse_string(std::env::var(key).ok().as_deref(), default)
}
