// src/net/mod.rs
// =============================================================================
// Network collaborators of the crawler.
//
// Submodules:
// - fetch: Downloads seed pages (HTTP)
// - dns: Resolves hostnames to IP addresses
// - redirect: Follows a URL's redirects and resolves where it lands
//
// Both sit behind small traits (PageFetcher, DnsResolver) so the crawler can
// be tested without touching the network.
// =============================================================================

mod dns;
mod fetch;
mod redirect;

pub use dns::{ip_cell, DnsResolver, ResolveError, SystemResolver};
pub use fetch::{decode_body, FetchError, HttpFetcher, PageFetcher};
pub use redirect::{check_redirect, RedirectCheck};
