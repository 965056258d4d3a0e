// src/net/redirect.rs
// =============================================================================
// Checks where a URL really leads.
//
// A site often answers its advertised address with a redirect to another
// host (a CDN, a regional mirror, a login portal). This module follows the
// redirects and resolves the host the browser actually ends up talking to.
// =============================================================================

use serde::Serialize;
use url::Url;

use super::dns::{ip_cell, DnsResolver, ResolveError};
use super::fetch::{FetchError, HttpFetcher};
use crate::extract::authority_host;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectCheck {
    pub url: String,
    pub final_url: String,
    pub redirected: bool,
    pub status: u16,
    /// IP of the final URL's host, or `Error: <detail>`.
    pub final_ip: String,
}

pub async fn check_redirect<R: DnsResolver>(
    fetcher: &HttpFetcher,
    resolver: &R,
    url: &Url,
) -> Result<RedirectCheck, FetchError> {
    let (final_url, status) = fetcher.final_location(url).await?;

    let final_ip = match authority_host(final_url.as_str()) {
        Some(host) => ip_cell(resolver.resolve(host).await),
        None => ip_cell(Err(ResolveError::NoAddress(final_url.to_string()))),
    };

    Ok(RedirectCheck {
        url: url.to_string(),
        redirected: final_url != *url,
        final_url: final_url.to_string(),
        status,
        final_ip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::net::IpAddr;
    use std::time::Duration;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    // Answers every lookup with the same address and remembers nothing
    struct FixedResolver(IpAddr);

    #[async_trait]
    impl DnsResolver for FixedResolver {
        async fn resolve(&self, _host: &str) -> Result<IpAddr, ResolveError> {
            Ok(self.0)
        }
    }

    fn resolver() -> FixedResolver {
        FixedResolver("10.1.2.3".parse().unwrap())
    }

    #[tokio::test]
    async fn test_reports_final_url_and_ip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("location", format!("{}/new", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/old", server.uri())).unwrap();
        let check = check_redirect(&fetcher, &resolver(), &url).await.unwrap();

        assert!(check.redirected);
        assert_eq!(check.final_url, format!("{}/new", server.uri()));
        assert_eq!(check.status, 200);
        assert_eq!(check.final_ip, "10.1.2.3");
    }

    #[tokio::test]
    async fn test_no_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/here"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/here", server.uri())).unwrap();
        let check = check_redirect(&fetcher, &resolver(), &url).await.unwrap();

        assert!(!check.redirected);
        assert_eq!(check.final_url, url.to_string());
        assert_eq!(check.status, 404);
    }

    #[tokio::test]
    async fn test_slow_target_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_millis(200)).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let result = check_redirect(&fetcher, &resolver(), &url).await;
        assert_eq!(result, Err(FetchError::Timeout));
    }
}
