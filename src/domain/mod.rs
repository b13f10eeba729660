//! Domain extraction and metric derivation.
//!
//! Key functions:
//! - `extract_domain_from_url()` - host of a URL, or the input itself when it is already bare
//! - `is_root_domain()` - bare two-label domain check used to gate enrichment
//! - `apex_domain()` - last two labels of a hostname, `www.` stripped
//! - `calculate_subnet()` - /24 network of an IPv4 address
//! - `calculate_percentage()` - trust flow as a percentage of citation flow

use std::net::Ipv4Addr;

use anyhow::{Context, Result};

use crate::config::UNRESOLVED_IP;

/// Extracts the host from a URL.
///
/// Inputs without a scheme and without a path are returned as they are.
/// Anything else is parsed as a URL (`https://` is assumed when no scheme is
/// present) and its host returned.
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed or has no host.
pub fn extract_domain_from_url(url: &str) -> Result<String> {
    if !url.contains("://") && !url.contains('/') {
        return Ok(url.to_string());
    }

    let candidate = if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    };
    let parsed =
        url::Url::parse(&candidate).with_context(|| format!("Failed to parse URL: {url}"))?;
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("URL '{url}' has no host component"))
}

/// Returns `true` for a bare root domain: no scheme, no path, exactly two
/// non-empty labels (`example.com`, not `www.example.com`).
pub fn is_root_domain(url: &str) -> bool {
    if url.contains("://") || url.contains('/') {
        return false;
    }
    let labels: Vec<&str> = url.split('.').collect();
    labels.len() == 2 && labels.iter().all(|label| !label.is_empty())
}

/// Reduces a hostname to its last two labels, dropping a leading `www.`.
///
/// Returns `None` for single-label hosts.
pub fn apex_domain(host: &str) -> Option<String> {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() < 2 {
        return None;
    }
    Some(labels[labels.len() - 2..].join("."))
}

/// Derives the /24 network of an IPv4 address by zeroing the last octet.
///
/// Unresolved addresses (`"N/A"` or empty) map to an empty string; anything
/// that is not IPv4 is returned unchanged.
pub fn calculate_subnet(ip: &str) -> String {
    if ip.is_empty() || ip == UNRESOLVED_IP {
        return String::new();
    }
    match ip.parse::<Ipv4Addr>() {
        Ok(addr) => {
            let [a, b, c, _] = addr.octets();
            Ipv4Addr::new(a, b, c, 0).to_string()
        }
        Err(_) => ip.to_string(),
    }
}

/// `round(trust_flow / citation_flow * 100)`, or `0` when citation flow is `0`.
pub fn calculate_percentage(trust_flow: i64, citation_flow: i64) -> i64 {
    if citation_flow == 0 {
        return 0;
    }
    (trust_flow as f64 / citation_flow as f64 * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
