//! Hostname to IP address resolution.

use std::collections::HashMap;
use std::net::IpAddr;

use anyhow::{Error, Result};
use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;

/// Resolves a domain to its current address.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Returns the first address the domain resolves to.
    async fn resolve_ip(&self, host: &str) -> Result<IpAddr>;
}

#[async_trait]
impl HostResolver for TokioAsyncResolver {
    async fn resolve_ip(&self, host: &str) -> Result<IpAddr> {
        resolve_host_to_ip(host, self).await
    }
}

/// Resolves a hostname to an IP address using DNS.
///
/// # Errors
///
/// Returns an error if DNS resolution fails or no IP addresses are found.
pub async fn resolve_host_to_ip(host: &str, resolver: &TokioAsyncResolver) -> Result<IpAddr> {
    let response = resolver.lookup_ip(host).await.map_err(Error::new)?;
    response
        .iter()
        .next()
        .ok_or_else(|| Error::msg("No IP addresses found"))
}

/// Resolver answering from a fixed table; unknown hosts fail like NXDOMAIN.
///
/// Useful for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, IpAddr>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, host: &str, ip: IpAddr) -> Self {
        self.entries.insert(host.to_ascii_lowercase(), ip);
        self
    }
}

#[async_trait]
impl HostResolver for StaticResolver {
    async fn resolve_ip(&self, host: &str) -> Result<IpAddr> {
        self.entries
            .get(&host.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no address record for {host}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn test_static_resolver_known_and_unknown_hosts() {
        let resolver =
            StaticResolver::new().with("Example.com", IpAddr::V4(Ipv4Addr::new(203, 0, 113, 45)));

        let ip = resolver
            .resolve_ip("example.com")
            .await
            .expect("known host resolves");
        assert_eq!(ip.to_string(), "203.0.113.45");

        let err = resolver
            .resolve_ip("missing.example")
            .await
            .expect_err("unknown host fails");
        assert!(err.to_string().contains("missing.example"));
    }

    #[tokio::test]
    async fn test_resolver_is_object_safe() {
        let resolver: Box<dyn HostResolver> = Box::new(StaticResolver::new());
        assert!(resolver.resolve_ip("example.com").await.is_err());
    }
}
