// src/lib.rs
// =============================================================================
// Library root of domain-mapper.
//
// The binary (src/main.rs) is a thin CLI over these modules:
// - config: Seed list, defaults and seed validation
// - extract: Finds third-party domains in HTML
// - net: Page fetching, DNS resolution and redirect checks
// - crawl: Runs the per-seed fetch/extract/resolve cycle
// - report: Report rows and the xlsx/csv/txt exports
// =============================================================================

pub mod config;
pub mod crawl;
pub mod extract;
pub mod net;
pub mod report;
