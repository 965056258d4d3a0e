// src/net/dns.rs
// =============================================================================
// This module resolves hostnames to IP addresses.
//
// We ask the operating system's resolver (through tokio) rather than talking
// DNS ourselves, so /etc/hosts, search domains and the system's timeouts all
// apply exactly as they would for any other program.
// =============================================================================

use async_trait::async_trait;
use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("{0}")]
    Lookup(String),
    #[error("no address found for {0}")]
    NoAddress(String),
}

/// Looks up one address for a hostname.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, host: &str) -> Result<IpAddr, ResolveError>;
}

pub struct SystemResolver;

#[async_trait]
impl DnsResolver for SystemResolver {
    async fn resolve(&self, host: &str) -> Result<IpAddr, ResolveError> {
        let addrs: Vec<IpAddr> = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|e| ResolveError::Lookup(e.to_string()))?
            .map(|addr| addr.ip())
            .collect();

        pick_address(&addrs).ok_or_else(|| ResolveError::NoAddress(host.to_string()))
    }
}

// First IPv4 address if there is one, otherwise the first address of any kind
fn pick_address(addrs: &[IpAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

/// Renders a lookup result for the report's "IP Address" column.
pub fn ip_cell(result: Result<IpAddr, ResolveError>) -> String {
    match result {
        Ok(ip) => ip.to_string(),
        Err(e) => format!("Error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_prefers_ipv4() {
        let v6 = IpAddr::V6(Ipv6Addr::LOCALHOST);
        let v4 = IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34));
        assert_eq!(pick_address(&[v6, v4]), Some(v4));
        assert_eq!(pick_address(&[v6]), Some(v6));
        assert_eq!(pick_address(&[]), None);
    }

    #[test]
    fn test_ip_cell() {
        let ok = ip_cell(Ok(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
        assert_eq!(ok, "10.0.0.1");

        let err = ip_cell(Err(ResolveError::Lookup("failed to lookup address".into())));
        assert_eq!(err, "Error: failed to lookup address");
    }

    #[tokio::test]
    async fn test_resolve_ip_literal() {
        let ip = SystemResolver.resolve("127.0.0.1").await.unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_resolve_invalid_host_fails() {
        // .invalid is reserved and never resolves
        let result = SystemResolver.resolve("badhost.invalid").await;
        assert!(result.is_err());
        assert!(ip_cell(result).starts_with("Error: "));
    }
}
