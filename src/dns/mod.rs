//! DNS resolution for domain enrichment.
//!
//! Enrichment talks to DNS through the [`HostResolver`] trait so the resolver
//! can be swapped (system resolver in production, fixed tables in tests).

mod resolution;

// Re-export public API
pub use resolution::{resolve_host_to_ip, HostResolver, StaticResolver};
