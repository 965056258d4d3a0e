// src/report/xlsx.rs
// =============================================================================
// Writes the report to an Excel workbook.
//
// Layout: one worksheet, a bold header row with the three column names,
// then one row per report row in the same order. Any existing file at the
// path is replaced.
// =============================================================================

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::debug;

use super::export::ensure_parent_dir;
use super::row::{Report, COLUMNS};

// Column widths (in characters) so domains and error text are readable
const COLUMN_WIDTHS: [f64; 3] = [32.0, 40.0, 48.0];

pub fn write_xlsx(report: &Report, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header = Format::new().set_bold();

    for (col, (name, width)) in COLUMNS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *name, &header)?;
        worksheet.set_column_width(col, width)?;
    }

    for (index, row) in report.rows().iter().enumerate() {
        let sheet_row = u32::try_from(index + 1).context("Report has too many rows")?;
        for (col, value) in row.cells().into_iter().enumerate() {
            worksheet.write_string(sheet_row, col as u16, value)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write workbook {}", path.display()))?;

    debug!(rows = report.len(), "wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Row;
    use calamine::{open_workbook, Reader, Xlsx};

    fn sample_report() -> Report {
        vec![
            Row::root("a.com", "1.1.1.1".into()),
            Row::discovered("a.com", "cdn.net", "2.2.2.2".into()),
            Row::root("b.com", "Error: lookup failed".into()),
            Row::timeout("b.com"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_writes_xlsx_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");

        write_xlsx(&sample_report(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // .xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_workbook_reads_back_as_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let report = sample_report();

        write_xlsx(&report, &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let sheet = workbook.worksheet_range("Sheet1").unwrap();
        let table: Vec<Vec<String>> = sheet
            .rows()
            .map(|cells| cells.iter().map(|cell| cell.to_string()).collect())
            .collect();

        assert_eq!(table.len(), report.len() + 1);
        assert_eq!(table[0], COLUMNS);

        let expected: Vec<Vec<String>> = report
            .rows()
            .iter()
            .map(|row| row.cells().map(String::from).to_vec())
            .collect();
        assert_eq!(table[1..], expected[..]);
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Downloads").join("web_domain_ips.xlsx");

        write_xlsx(&sample_report(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        std::fs::write(&path, b"old contents").unwrap();

        write_xlsx(&Report::new(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory can't be replaced by a workbook
        let result = write_xlsx(&sample_report(), dir.path());
        assert!(result.is_err());
    }
}
