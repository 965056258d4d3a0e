// src/config.rs
// =============================================================================
// This file holds the fixed settings of a scan and the seed list.
//
// What lives here:
// - The built-in seed URLs (used when the user passes none)
// - Default timeout, user agent and output location
// - The Seed type: a seed URL plus its query domain, or the reason it
//   couldn't be used
// - Loading seeds from a text file (any text: URLs are picked out of it)
//
// Rust concepts:
// - const: Compile-time values (no allocation, no global mutable state)
// - Result stored in a struct: a bad seed is still a Seed, it just carries
//   its error instead of a URL, so the run can report it and move on
// =============================================================================

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::extract::authority_host;

/// Seeds scanned when none are given on the command line.
pub const DEFAULT_SEEDS: &[&str] = &[
    "https://www.ywlgroup.com/",
    "https://www.bd.gov.hk/",
    "https://www.hyd.gov.hk/",
    "https://www.td.gov.hk/",
    "https://www.hko.gov.hk/",
    "https://www.cedd.gov.hk/",
    "https://www.wsd.gov.hk/",
    "https://www.dsd.gov.hk/",
    "https://www.devb.gov.hk/",
    "https://www.ginfo.cedd.gov.hk/GEOOpenData/eng/Default.aspx",
    "https://www.ginfo.cedd.gov.hk/GInfoInt/",
    "https://portal.csdi.gov.hk",
    "https://3d.map.gov.hk",
    "https://www.hkie.org.hk/",
    "https://www.ice.org.uk/",
    "https://www.newcivilengineer.com/",
    "https://www.steelforlifebluebook.co.uk/",
    "https://vsl.com/",
    "http://www.freyssinet.com/",
    "https://freyssinet.co.uk/",
    "https://www.hilti.com.hk/",
    "https://eurocodeapplied.com/",
    "https://academy.midasuser.com/",
    "https://www.seequent.com/getting-started-with-slope-w/",
    "https://structural-analyser.com/",
    "https://www.wolframalpha.com/",
    "https://www.mathway.com/",
    "https://en.wikipedia.org/",
    "https://zh.wikipedia.org/",
    "https://us06web.zoom.us/j/2891720849",
];

/// Seconds a single page fetch may take before it counts as a timeout.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Redirects followed per fetch (curl -L style).
pub const MAX_REDIRECTS: usize = 10;

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; URLExtractor/1.0)";

/// Output file name without extension; the export format adds it.
pub const OUTPUT_FILE_STEM: &str = "web_domain_ips";

// http(s) URLs inside free text: anything up to whitespace, a quote, angle
// brackets or the other characters that can't appear unescaped in a URL
const URL_PATTERN: &str = r#"(?i)https?://[^\s<>"{}|\\^`\[\]]+"#;

// Sentence punctuation that sticks to the end of a URL in prose
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

// One entry of the seed list.
//
// The query domain is the hostname only (scheme, port, path and query
// string are dropped), written as it appears in the seed. A seed that isn't
// an absolute URL with a host keeps its text as the query domain and the
// reason in place of the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    raw: String,
    query_domain: String,
    target: Result<Url, String>,
}

impl Seed {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();

        match validate(&raw) {
            Ok((url, query_domain)) => Self {
                raw,
                query_domain,
                target: Ok(url),
            },
            Err(reason) => Self {
                query_domain: raw.clone(),
                raw,
                target: Err(reason),
            },
        }
    }

    /// The URL to fetch, or why this seed has none.
    pub fn url(&self) -> Result<&Url, &str> {
        self.target.as_ref().map_err(String::as_str)
    }

    pub fn query_domain(&self) -> &str {
        &self.query_domain
    }

    pub fn is_valid(&self) -> bool {
        self.target.is_ok()
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn validate(raw: &str) -> Result<(Url, String), String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid seed URL: {}", e))?;

    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| "seed URL has no host".to_string())?;
    let query_domain = authority_host(raw).unwrap_or(host).to_string();

    Ok((url, query_domain))
}

// Turns raw strings into seeds, keeping their order. Bad entries are kept
// too; the crawler reports them as error rows.
pub fn parse_seeds<S: AsRef<str>>(raw: &[S]) -> Vec<Seed> {
    raw.iter().map(|s| Seed::parse(s.as_ref())).collect()
}

pub fn default_seeds() -> Vec<Seed> {
    parse_seeds(DEFAULT_SEEDS)
}

// Finds the http(s) URLs in a block of free text
//
// - One trailing punctuation mark is trimmed ("see https://a.com." -> "https://a.com")
// - URLs that don't parse are skipped
// - Only the first URL per site (scheme + host) is kept, so a document that
//   links ten pages of one site yields one seed for it
pub fn extract_urls_from_text(text: &str) -> Result<Vec<String>> {
    let pattern = Regex::new(URL_PATTERN).context("Invalid URL pattern")?;

    let mut seen_roots = HashSet::new();
    let mut urls = Vec::new();

    for found in pattern.find_iter(text) {
        let candidate = found.as_str();
        let candidate = match candidate.strip_suffix(TRAILING_PUNCTUATION) {
            Some(trimmed) => trimmed,
            None => candidate,
        };

        let Ok(url) = Url::parse(candidate) else {
            continue;
        };
        let Some(host) = url.host_str() else {
            continue;
        };

        let root = format!("{}://{}", url.scheme(), host);
        if seen_roots.insert(root) {
            urls.push(candidate.to_string());
        }
    }

    Ok(urls)
}

// Pulls seed URLs out of a seeds file. Lines starting with '#' are comments;
// everything else is searched for URLs, so a plain list, a copied e-mail or
// a saved page all work.
pub fn parse_seed_list(text: &str) -> Result<Vec<String>> {
    let content: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect();

    extract_urls_from_text(&content.join("\n"))
}

pub fn load_seed_file(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read seeds file {}", path.display()))?;
    parse_seed_list(&String::from_utf8_lossy(&bytes))
}

/// `~/Downloads/web_domain_ips.<extension>`
pub fn default_output_path(extension: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home
        .join("Downloads")
        .join(format!("{}.{}", OUTPUT_FILE_STEM, extension)))
}
