//! Configuration constants.
//!
//! Provider endpoints, batching defaults, timeouts and cache lifetimes used
//! throughout the crate.

use std::time::Duration;

/// Base URL of the Majestic JSON API. All commands are sent here as GET requests.
pub const MAJESTIC_BASE_URL: &str = "https://api.majestic.com/api/json";

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "MAJESTIC_API_KEY";

/// Environment variable overriding [`MAJESTIC_BASE_URL`] (used for staging and mocks).
pub const BASE_URL_ENV: &str = "MAJESTIC_BASE_URL";

/// Default SQLite database path
pub const DB_PATH: &str = "./pulserank.db";

/// User-Agent sent with provider requests
pub const DEFAULT_USER_AGENT: &str = concat!("pulserank-ingest/", env!("CARGO_PKG_VERSION"));

// Provider request defaults
/// Per-request HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default `Count` for paged reports
pub const DEFAULT_PAGE_COUNT: u32 = 100;
/// Default `Count` for the anchor text report
pub const DEFAULT_ANCHOR_COUNT: u32 = 10;
/// `MaxDomains` sent with the hosted domains report
pub const HOSTED_DOMAINS_MAX: u32 = 100;
/// Total source URL budget shared across a batch backlink request
pub const BATCH_SOURCE_URL_BUDGET: usize = 100;

// Batch coordinator defaults
/// Requests issued concurrently per window
pub const DEFAULT_BATCH_SIZE: usize = 10;
/// Pause between consecutive batches, in milliseconds
pub const DEFAULT_BATCH_PAUSE_MS: u64 = 1000;
pub const DEFAULT_BATCH_PAUSE: Duration = Duration::from_millis(DEFAULT_BATCH_PAUSE_MS);

// DNS
/// DNS query timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// Sentinel stored when a domain's address could not be resolved
pub const UNRESOLVED_IP: &str = "N/A";

// Response cache lifetimes
pub const TTL_SHORT: Duration = Duration::from_secs(6 * 60 * 60);
pub const TTL_DAY: Duration = Duration::from_secs(24 * 60 * 60);
pub const TTL_WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Priority given to endpoints configured without one
pub const DEFAULT_CACHE_PRIORITY: i64 = 5;

/// How long a subscription snapshot is served before it is refetched
pub const SUBSCRIPTION_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Maximum length of an upstream error body kept in error messages
pub const MAX_ERROR_BODY_CHARS: usize = 500;
