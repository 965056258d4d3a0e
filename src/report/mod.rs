// src/report/mod.rs
// =============================================================================
// The crawl report: rows, summary counts and the exports.
//
// Submodules:
// - row: Row/Report types and the sentinel values
// - xlsx: Writes a Report to a .xlsx workbook
// - export: Format choice, CSV and grouped text output
// =============================================================================

mod export;
mod row;
mod xlsx;

pub use export::{render_text, write_csv, write_report, write_text, ExportFormat};
pub use row::{Report, ReportSummary, Row, RowKind, COLUMNS};
pub use xlsx::write_xlsx;
