// src/report/export.rs
// =============================================================================
// Saves the report in the format the user picked.
//
// Formats:
// - xlsx: the Excel workbook (see xlsx.rs), the default
// - csv:  the same three columns as comma-separated values
// - txt:  a readable report grouped by seed, with each seed's third-party
//         domains listed under it
//
// Every format creates missing parent directories and replaces an existing
// file at the path.
//
// Rust concepts:
// - Slices of a slice: seed_blocks() hands out &[Row] windows into the
//   report without copying any rows
// =============================================================================

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::Path;
use tracing::debug;

use super::row::{Report, Row, RowKind, COLUMNS, DNS_ERROR_PREFIX};
use super::xlsx::write_xlsx;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
    Txt,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
        }
    }
}

pub fn write_report(report: &Report, path: &Path, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Xlsx => write_xlsx(report, path),
        ExportFormat::Csv => write_csv(report, path),
        ExportFormat::Txt => write_text(report, path),
    }
}

pub(super) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

pub fn write_csv(report: &Report, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(COLUMNS)?;
    for row in report.rows() {
        writer.write_record(row.cells())?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!(rows = report.len(), "wrote {}", path.display());
    Ok(())
}

pub fn write_text(report: &Report, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    std::fs::write(path, render_text(report))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!(rows = report.len(), "wrote {}", path.display());
    Ok(())
}

// Renders the grouped plain-text report
//
// Example:
//   1. a.com
//      IP: 1.1.1.1
//      Third-party domains (1):
//      └─ cdn.net
//         IP: 2.2.2.2
pub fn render_text(report: &Report) -> String {
    let summary = report.summary();
    let mut lines = vec![
        "Website Domain Report".to_string(),
        format!(
            "Seeds: {} | Third-party domains: {} | Timeouts: {} | Fetch errors: {} | DNS failures: {}",
            summary.seeds, summary.discovered, summary.timeouts, summary.errors, summary.dns_failures
        ),
        "=".repeat(50),
    ];

    for (index, block) in seed_blocks(report.rows()).into_iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}. {}", index + 1, block[0].query_domain));

        if let Some(root) = block.iter().find(|row| row.kind() == RowKind::Root) {
            lines.push(format!("   {}", ip_line(root)));
        }

        let discovered: Vec<&Row> = block
            .iter()
            .filter(|row| row.kind() == RowKind::Discovered)
            .collect();
        if !discovered.is_empty() {
            lines.push(format!("   Third-party domains ({}):", discovered.len()));
            for row in discovered {
                lines.push(format!("   └─ {}", row.domain));
                lines.push(format!("      {}", ip_line(row)));
            }
        }

        for row in block
            .iter()
            .filter(|row| matches!(row.kind(), RowKind::Timeout | RowKind::Error))
        {
            lines.push(format!("   {} {}", row.domain, row.ip_address));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

fn ip_line(row: &Row) -> String {
    match row.ip_address.strip_prefix(DNS_ERROR_PREFIX) {
        Some(detail) => format!("IP Error: {}", detail),
        None => format!("IP: {}", row.ip_address),
    }
}

// Splits the rows into one block per seed; each root row starts a block
fn seed_blocks(rows: &[Row]) -> Vec<&[Row]> {
    let mut blocks = Vec::new();
    let mut start = 0;

    for (index, row) in rows.iter().enumerate().skip(1) {
        if row.kind() == RowKind::Root {
            blocks.push(&rows[start..index]);
            start = index;
        }
    }
    if !rows.is_empty() {
        blocks.push(&rows[start..]);
    }

    blocks
}
