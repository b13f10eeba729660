//! pulserank_ingest: Majestic ranking data ingestion.
//!
//! Fetches backlink-intelligence reports from the Majestic API as typed
//! records, paces multi-target lookups, and stores normalized per-domain
//! metrics (with resolved IP, subnet and trust percentage) in SQLite.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pulserank_ingest::initialization::init_resolver;
//! use pulserank_ingest::storage::init_db_pool_with_path;
//! use pulserank_ingest::{Freshness, MajesticClient, ProviderConfig, RankIngest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MajesticClient::new(ProviderConfig::from_env())?;
//! let pool = init_db_pool_with_path(std::path::Path::new("metrics.db")).await?;
//! let ingest = RankIngest::new(client, pool, init_resolver());
//!
//! let outcome = ingest
//!     .index_item_info(&["example.com".to_string()], Freshness::Fresh)
//!     .await?;
//! println!(
//!     "{} rows, {} stored, {} failed",
//!     outcome.data.len(),
//!     outcome.persistence.succeeded.len(),
//!     outcome.persistence.failed.len()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod batch;
pub mod cache;
pub mod config;
pub mod dns;
pub mod domain;
pub mod enrichment;
pub mod error_handling;
pub mod initialization;
pub mod pipeline;
pub mod provider;
pub mod storage;

// Re-export public API
pub use batch::{run_in_batches, RateLimitPolicy};
pub use cache::{CacheOptions, CachedMajesticClient};
pub use config::{Config, LogFormat, LogLevel, ProviderConfig};
pub use dns::{HostResolver, StaticResolver};
pub use enrichment::{EnrichmentReport, RefDomainPersistReport};
pub use error_handling::{DatabaseError, EnrichmentError, InitializationError, ProviderError};
pub use pipeline::{IngestOutcome, RankIngest};
pub use provider::{
    BacklinkQuery, Freshness, MajesticClient, MajesticReports, Page, SubscriptionCache,
};
