// src/crawl/orchestrator.rs
// =============================================================================
// This module runs the scan over the seed list.
//
// For every seed:
// 0. A seed that isn't a usable URL gets a root row and an "[Error]" row
//    with the reason, nothing is fetched
// 1. Resolve the seed's own domain and emit the root row
// 2. Fetch the seed page (bounded by the fetcher's timeout)
// 3a. Timeout  -> one "[Timeout]" row, move on
// 3b. Failure  -> one "[Error]" row with the error text, move on
// 3c. Success  -> extract third-party domains, resolve each one,
//                 emit one row per domain
//
// Nothing a single seed does can stop the run: every failure becomes a row.
//
// Seeds share nothing (not even DNS answers), so they can run side by side.
// With concurrency > 1 the per-seed blocks are still joined in seed order,
// giving exactly the same report as a one-at-a-time run.
//
// Rust concepts:
// - Generics: Crawler<F, R> works with any fetcher and resolver
// - Streams: buffered(n) runs n futures at once but yields in input order
// =============================================================================

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::Seed;
use crate::extract::extract_third_party_domains;
use crate::net::{decode_body, ip_cell, DnsResolver, FetchError, PageFetcher};
use crate::report::{Report, Row};

pub struct Crawler<F, R> {
    fetcher: F,
    resolver: R,
    concurrency: usize,
}

impl<F: PageFetcher, R: DnsResolver> Crawler<F, R> {
    /// A sequential crawler (one seed at a time).
    pub fn new(fetcher: F, resolver: R) -> Self {
        Self {
            fetcher,
            resolver,
            concurrency: 1,
        }
    }

    /// Number of seeds processed at the same time (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    // Crawls every seed and returns the rows, seed by seed, in seed order
    pub async fn run(&self, seeds: &[Seed]) -> Report {
        let blocks: Vec<Vec<Row>> = stream::iter(seeds)
            .map(|seed| self.crawl_seed(seed))
            .buffered(self.concurrency)
            .collect()
            .await;

        blocks.into_iter().flatten().collect()
    }

    // Produces the rows for one seed: the root row followed by either the
    // discovered-domain rows or a single sentinel row
    pub async fn crawl_seed(&self, seed: &Seed) -> Vec<Row> {
        let query_domain = seed.query_domain();

        let url = match seed.url() {
            Ok(url) => url,
            Err(reason) => {
                warn!("skipping seed {}: {}", seed, reason);
                return vec![
                    Row::root(query_domain, format!("Error: {}", reason)),
                    Row::error(query_domain, reason.to_string()),
                ];
            }
        };
        info!("crawling {}", seed);

        // DNS failure on the seed doesn't skip the fetch; the page may still
        // load through a proxy or a different resolver path.
        let root_ip = self.lookup(query_domain).await;
        let mut rows = vec![Row::root(query_domain, root_ip)];

        let html = match self.fetcher.fetch(url).await {
            Ok(bytes) => decode_body(&bytes),
            Err(FetchError::Timeout) => {
                warn!("timed out fetching {}", seed);
                rows.push(Row::timeout(query_domain));
                return rows;
            }
            Err(FetchError::Other(detail)) => {
                warn!("failed to fetch {}: {}", seed, detail);
                rows.push(Row::error(query_domain, detail));
                return rows;
            }
        };

        let domains = extract_third_party_domains(&html, query_domain);
        debug!(count = domains.len(), "third-party domains on {}", seed);

        for domain in &domains {
            let ip = self.lookup(domain).await;
            rows.push(Row::discovered(query_domain, domain, ip));
        }

        rows
    }

    async fn lookup(&self, host: &str) -> String {
        let result = self.resolver.resolve(host).await;
        if let Err(e) = &result {
            warn!("could not resolve {}: {}", host, e);
        }
        ip_cell(result)
    }
}
