//! Two-sheet xlsx report rendering.
//!
//! Sheet "Top 5" holds one row per candidate; sheet "Legend" maps each
//! column to a plain-language description. An empty candidate list still
//! produces a report with a single explanatory placeholder row — the
//! artifact never has zero data rows.

use std::path::{Path, PathBuf};

use candidate_engine::Candidate;
use chrono::Local;
use common::{Error, Verdict};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::info;

const DATA_SHEET: &str = "Top 5";
const LEGEND_SHEET: &str = "Legend";
const FILE_SUFFIX: &str = "0830";

/// Report columns in render order, with their legend descriptions.
const COLUMNS: [(&str, &str); 9] = [
    ("Coin", "Name + symbol"),
    ("Market Cap", "Market capitalization (USD)"),
    ("24h Volume", "Trading volume over the last 24h (USD)"),
    (
        "24h Volume Growth %",
        "% volume change vs the previous 24h (hourly averages)",
    ),
    ("Social Mentions 24h", "Social mentions over the last 24h"),
    ("Sentiment %", "Share of positive posts"),
    ("Utility & Catalysts", "Utility plus upcoming catalysts"),
    ("Red Flags", "Warning signs"),
    ("Verdict", "BUY / WATCH / AVOID"),
];

fn xlsx_err(e: XlsxError) -> Error {
    Error::Report(e.to_string())
}

/// Writes the dated report artifact into a fixed output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    outdir: PathBuf,
}

impl ReportWriter {
    pub fn new(outdir: impl Into<PathBuf>) -> Self {
        Self {
            outdir: outdir.into(),
        }
    }

    /// Today's artifact filename, e.g. `Pump_Radar_29-08-2026_0830.xlsx`.
    pub fn file_name(&self) -> String {
        format!(
            "Pump_Radar_{}_{}.xlsx",
            Local::now().format("%d-%m-%Y"),
            FILE_SUFFIX
        )
    }

    /// Render and save the report. Returns the written path.
    pub fn write(&self, candidates: &[Candidate]) -> Result<PathBuf, Error> {
        std::fs::create_dir_all(&self.outdir)?;
        let path = self.outdir.join(self.file_name());

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let data_sheet = workbook.add_worksheet();
        write_data_sheet(data_sheet, &header_format, candidates).map_err(xlsx_err)?;

        let legend_sheet = workbook.add_worksheet();
        write_legend_sheet(legend_sheet, &header_format).map_err(xlsx_err)?;

        workbook.save(&path).map_err(xlsx_err)?;

        info!(
            "Report saved: {} ({} data rows)",
            path.display(),
            candidates.len().max(1)
        );
        Ok(path)
    }

    pub fn outdir(&self) -> &Path {
        &self.outdir
    }
}

fn write_data_sheet(
    sheet: &mut Worksheet,
    header_format: &Format,
    candidates: &[Candidate],
) -> Result<(), XlsxError> {
    sheet.set_name(DATA_SHEET)?;

    for (col, (name, _)) in COLUMNS.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *name, header_format)?;
    }
    sheet.set_column_width(0, 28)?;
    sheet.set_column_width(6, 40)?;
    sheet.set_column_width(7, 30)?;

    if candidates.is_empty() {
        write_placeholder_row(sheet, 1)?;
        return Ok(());
    }

    for (i, candidate) in candidates.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, candidate.label())?;
        sheet.write_number(row, 1, candidate.market_cap)?;
        sheet.write_number(row, 2, candidate.volume_24h)?;
        sheet.write_number(row, 3, candidate.growth_pct.unwrap_or(0.0))?;
        sheet.write_number(row, 4, candidate.social.mentions as f64)?;
        sheet.write_number(row, 5, candidate.social.sentiment_pct)?;
        sheet.write_string(row, 6, &candidate.utility)?;
        sheet.write_string(row, 7, &candidate.red_flags)?;
        sheet.write_string(row, 8, candidate.verdict.label())?;
    }

    Ok(())
}

fn write_placeholder_row(sheet: &mut Worksheet, row: u32) -> Result<(), XlsxError> {
    sheet.write_string(row, 0, "—")?;
    for col in 1..=5u16 {
        sheet.write_number(row, col, 0.0)?;
    }
    sheet.write_string(row, 6, "No candidates (rate limit or filters).")?;
    sheet.write_string(row, 7, "-")?;
    sheet.write_string(row, 8, Verdict::Watch.label())?;
    Ok(())
}

fn write_legend_sheet(sheet: &mut Worksheet, header_format: &Format) -> Result<(), XlsxError> {
    sheet.set_name(LEGEND_SHEET)?;

    sheet.write_with_format(0, 0, "Column", header_format)?;
    sheet.write_with_format(0, 1, "Description", header_format)?;
    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 56)?;

    for (i, (name, description)) in COLUMNS.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, *name)?;
        sheet.write_string(row, 1, *description)?;
    }

    Ok(())
}
