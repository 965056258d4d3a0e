// src/net/fetch.rs
// =============================================================================
// This module downloads seed pages.
//
// Key functionality:
// - Makes one HTTP GET per seed, following redirects (like `curl -L`)
// - Bounds the whole request, body included, by a single timeout
// - Tells timeouts apart from every other failure, because the report
//   records them with different sentinel rows
//
// The HTTP status code is NOT treated as a failure. A 404 or 500 page is
// still HTML and may still pull in third-party scripts.
//
// Rust concepts:
// - async traits: PageFetcher lets tests swap the network for a fake
// - thiserror: Derives std::error::Error for our FetchError enum
// =============================================================================

use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::{MAX_REDIRECTS, USER_AGENT};

// Why a page fetch failed
//
// Only two outcomes matter to the crawler, so that's all we keep:
// - Timeout: the page didn't arrive in time
// - Other: anything else, with a human-readable detail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

/// Retrieves the raw bytes of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

// Fetches pages over HTTP(S) with reqwest
//
// The client is built once and reused for every seed (connection pooling).
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    // Follows a URL's redirects and returns where it ended up, with the
    // final status code. The body is never read.
    pub async fn final_location(&self, url: &Url) -> Result<(Url, u16), FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(categorize_error)?;

        debug!(status = %response.status(), "{} ended at {}", url, response.url());
        Ok((response.url().clone(), response.status().as_u16()))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(categorize_error)?;

        debug!(status = %response.status(), "fetched {}", url);

        let body = response.bytes().await.map_err(categorize_error)?;
        Ok(body.to_vec())
    }
}

// Decodes a page body as UTF-8
//
// Invalid byte sequences become U+FFFD instead of failing the seed.
pub fn decode_body(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Other(error_chain(&error))
    }
}

// reqwest's top-level message is often just "error sending request", the
// useful part (DNS failure, TLS error, refused connection) is in the sources.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }

    message
}
