//! Command-line options.
//!
//! ```bash
//! # Index metrics for two root domains (stored rows are enriched with DNS data)
//! pulserank-ingest index-info example.com example.org
//!
//! # Backlinks for many URLs, paced 10 per second
//! pulserank-ingest batch-backlinks https://a.com/ https://b.com/ --batch-size 10
//!
//! # Stored history for a domain
//! pulserank-ingest history example.com --limit 30
//!
//! # Keep topic reports for an hour, at most 50 hits per entry
//! pulserank-ingest cache-config majestic.topics --ttl-secs 3600 --max-hits 50
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::batch::RateLimitPolicy;
use crate::config::constants::{
    DB_PATH, DEFAULT_ANCHOR_COUNT, DEFAULT_BATCH_PAUSE_MS, DEFAULT_BATCH_SIZE, DEFAULT_PAGE_COUNT,
    DEFAULT_TIMEOUT_SECS,
};
use crate::config::types::{Config, LogFormat, LogLevel, ProviderConfig};
use crate::provider::Freshness;

/// Top-level options shared by every command.
#[derive(Debug, Parser)]
#[command(
    name = "pulserank-ingest",
    about = "Fetches Majestic ranking reports and stores per-domain metrics."
)]
pub struct Opt {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, value_parser, default_value = DB_PATH, global = true)]
    pub db_path: PathBuf,

    /// Index snapshot to query: fresh|historic
    #[arg(long, value_enum, default_value_t = Freshness::Fresh, global = true)]
    pub datasource: Freshness,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_seconds: u64,

    /// Requests issued concurrently per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, global = true)]
    pub batch_size: usize,

    /// Pause between batches in milliseconds
    #[arg(long, default_value_t = DEFAULT_BATCH_PAUSE_MS, global = true)]
    pub batch_pause_ms: u64,

    /// Do not use the response cache at all
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Always call the provider, refreshing cached responses
    #[arg(long, global = true, conflicts_with = "no_cache")]
    pub refresh: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Report and maintenance commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Summary metrics per URL; bare root domains are persisted
    IndexInfo {
        /// URLs or domains to look up
        #[arg(required = true)]
        urls: Vec<String>,
        /// Do not persist enriched domain rows
        #[arg(long)]
        no_enrich: bool,
    },
    /// Backlinks pointing at one URL
    Backlinks {
        url: String,
        #[arg(long, default_value_t = 0)]
        mode: u8,
        /// Only links from this referring domain
        #[arg(long)]
        ref_domain: Option<String>,
        #[arg(long)]
        max_per_ref_domain: Option<u32>,
        #[arg(long, default_value_t = DEFAULT_PAGE_COUNT)]
        count: u32,
        #[arg(long, default_value_t = 0)]
        from: u32,
    },
    /// Backlinks for many URLs, fetched in paced batches
    BatchBacklinks {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Referring domains of one or more targets
    RefDomains {
        #[arg(required = true)]
        domains: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_PAGE_COUNT)]
        count: u32,
        #[arg(long, default_value_t = 0)]
        from: u32,
        /// Do not store the referring domains
        #[arg(long)]
        no_persist: bool,
    },
    /// Anchor text distribution
    AnchorText {
        url: String,
        #[arg(long, default_value_t = DEFAULT_ANCHOR_COUNT)]
        count: u32,
    },
    /// Topical classification of referring pages
    Topics {
        url: String,
        #[arg(long, default_value_t = DEFAULT_PAGE_COUNT)]
        count: u32,
    },
    /// Strongest pages of a site
    TopPages {
        url: String,
        #[arg(long, default_value_t = DEFAULT_PAGE_COUNT)]
        count: u32,
        #[arg(long, default_value_t = 0)]
        from: u32,
    },
    /// Recently gained or lost backlinks
    NewLost {
        url: String,
        #[arg(long, default_value_t = 1)]
        mode: u8,
    },
    /// Domains sharing the target's IP and subnet
    HostedDomains { domain: String },
    /// Remaining provider quota
    Subscription,
    /// Stored metric rows for a domain
    History {
        domain: String,
        #[arg(long, default_value_t = 30)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    /// Cache hit/miss and API call statistics
    CacheStats {
        /// Restrict to one endpoint, e.g. `majestic.backlinkData`
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Drop cached responses whose endpoint contains the pattern
    CacheInvalidate { pattern: String },
    /// Drop expired cached responses
    CacheCleanup,
    /// Show or change per-endpoint cache settings
    CacheConfig {
        /// Endpoint, e.g. `majestic.topics`; lists every configured endpoint when omitted
        endpoint: Option<String>,
        /// Lifetime of cached responses in seconds
        #[arg(long, requires = "endpoint")]
        ttl_secs: Option<u64>,
        /// Evict an entry after this many hits; 0 removes the limit
        #[arg(long, requires = "endpoint")]
        max_hits: Option<i64>,
        /// Enable or disable caching for the endpoint
        #[arg(long, action = clap::ArgAction::Set, requires = "endpoint")]
        active: Option<bool>,
        #[arg(long, requires = "endpoint")]
        priority: Option<i64>,
    },
}

impl From<&Opt> for Config {
    /// Provider credentials come from the environment; everything else from the options.
    fn from(opt: &Opt) -> Self {
        Config {
            provider: ProviderConfig {
                timeout: Duration::from_secs(opt.timeout_seconds),
                ..ProviderConfig::from_env()
            },
            db_path: opt.db_path.clone(),
            rate_limit: RateLimitPolicy::new(
                opt.batch_size,
                Duration::from_millis(opt.batch_pause_ms),
            ),
            log_level: opt.log_level,
            log_format: opt.log_format,
            use_cache: !opt.no_cache,
            force_refresh: opt.refresh,
        }
    }
}
