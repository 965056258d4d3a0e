// src/crawl/mod.rs
// =============================================================================
// This module handles the seed crawl.
//
// Features:
// - One hop only: each seed page is fetched, nothing it links to is
// - Every seed yields a root row plus either its third-party domains or a
//   single timeout/error row
// - Optional concurrency across seeds with a deterministic report order
//
// Rust concepts:
// - Async programming: For network requests and DNS lookups
// - Generic structs: The crawler is generic over its fetcher and resolver
// =============================================================================

mod orchestrator;

// Re-export the crawler
pub use orchestrator::Crawler;
