//! Configuration types.
//!
//! `ProviderConfig` is the immutable configuration handed to the provider
//! client; `Config` bundles everything the binary needs to run a command.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::batch::RateLimitPolicy;
use crate::config::constants::{
    API_KEY_ENV, BASE_URL_ENV, DB_PATH, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    MAJESTIC_BASE_URL,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable colored lines (default)
    Plain,
    /// One JSON object per line
    Json,
}

/// Immutable provider client configuration.
///
/// Read once when the client is built; the client never mutates it.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key sent as `app_api_key`. May be empty, in which case the provider rejects requests.
    pub api_key: String,
    /// Endpoint all commands are sent to
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl ProviderConfig {
    /// Builds a configuration with the given key and default endpoint settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Reads `MAJESTIC_API_KEY` (and the optional `MAJESTIC_BASE_URL` override).
    ///
    /// A missing key is not an error here: requests go out with an empty key and
    /// the provider's rejection surfaces as a `ProviderError`.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        if api_key.is_empty() {
            log::warn!("{API_KEY_ENV} is not set; provider requests will be rejected");
        }
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| MAJESTIC_BASE_URL.to_string());
        Self {
            api_key,
            base_url,
            ..Default::default()
        }
    }

    /// Returns a copy pointing at another endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: MAJESTIC_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use pulserank_ingest::{Config, ProviderConfig};
/// use std::path::PathBuf;
///
/// let config = Config {
///     provider: ProviderConfig::new("my-key"),
///     db_path: PathBuf::from("metrics.db"),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider client settings
    pub provider: ProviderConfig,

    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Batch coordinator pacing
    pub rate_limit: RateLimitPolicy,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Route reports through the response cache
    pub use_cache: bool,

    /// Call the provider even when a cached response is fresh
    pub force_refresh: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            db_path: PathBuf::from(DB_PATH),
            rate_limit: RateLimitPolicy::default(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            use_cache: true,
            force_refresh: false,
        }
    }
}
