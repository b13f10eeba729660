//! Response cache in front of the provider.
//!
//! [`CachedMajesticClient`] answers a command from `api_cache` while the entry
//! is fresh and otherwise forwards it, storing the checked envelope with the
//! report's TTL. Hits, misses and provider calls are counted per day and
//! endpoint in `cache_stats`. The cache never turns a provider answer into an
//! error: storage failures are logged and the request proceeds uncached.
//!
//! Lifetime and hit limit are resolved per request: [`CacheOptions`] first,
//! then the endpoint's `cache_config` row, then the report default. An
//! endpoint whose row is inactive bypasses the cache entirely.

mod key;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{debug, warn};
use sqlx::SqlitePool;

use crate::error_handling::{DatabaseError, ProviderError};
use crate::provider::{Envelope, MajesticClient, MajesticReports, Params, Report};
use crate::storage::{
    get_cache_config, get_cached_response, now_ms, record_api_call, record_cache_hit,
    record_cache_miss, store_cached_response, EndpointCacheConfig,
};

pub use key::cache_key;

/// Cache behaviour shared by every report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheOptions {
    /// Overrides the configured or per-report lifetime
    pub ttl: Option<Duration>,
    /// Skip the lookup and always call the provider (the response is still stored)
    pub force_refresh: bool,
    /// Evict an entry once it has served this many hits, overriding the configured limit
    pub max_hits: Option<i64>,
}

/// A [`MajesticReports`] implementation that consults the response cache first.
#[derive(Debug, Clone)]
pub struct CachedMajesticClient<C = MajesticClient> {
    inner: C,
    pool: SqlitePool,
    options: CacheOptions,
}

impl<C: MajesticReports> CachedMajesticClient<C> {
    pub fn new(inner: C, pool: SqlitePool) -> Self {
        Self::with_options(inner, pool, CacheOptions::default())
    }

    pub fn with_options(inner: C, pool: SqlitePool, options: CacheOptions) -> Self {
        Self {
            inner,
            pool,
            options,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn options(&self) -> CacheOptions {
        self.options
    }

    async fn endpoint_config(&self, endpoint: &str) -> Option<EndpointCacheConfig> {
        match get_cache_config(&self.pool, endpoint).await {
            Ok(config) => config,
            Err(e) => {
                warn!("Reading cache settings for {endpoint} failed: {e}");
                None
            }
        }
    }

    async fn lookup(&self, key: &str, endpoint: &str, max_hits: Option<i64>) -> Option<Envelope> {
        let cached = match get_cached_response(&self.pool, key, max_hits, now_ms()).await {
            Ok(cached) => cached?,
            Err(e) => {
                warn!("Cache lookup for {endpoint} failed: {e}");
                return None;
            }
        };
        match serde_json::from_value(cached) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                warn!("Ignoring unreadable cache entry {key}: {e}");
                None
            }
        }
    }

    async fn call_provider(
        &self,
        report: Report,
        params: Params,
        today: NaiveDate,
    ) -> Result<Envelope, ProviderError> {
        let started = Instant::now();
        let envelope = self.inner.fetch(report, params).await?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        log_ignored(
            record_api_call(&self.pool, report.endpoint(), elapsed_ms, today).await,
            "record API call",
        );
        Ok(envelope)
    }
}

fn log_ignored(result: Result<(), DatabaseError>, action: &str) {
    if let Err(e) = result {
        warn!("Failed to {action}: {e}");
    }
}

#[async_trait]
impl<C: MajesticReports> MajesticReports for CachedMajesticClient<C> {
    async fn fetch(&self, report: Report, params: Params) -> Result<Envelope, ProviderError> {
        let endpoint = report.endpoint();
        let today = Utc::now().date_naive();
        let config = self.endpoint_config(endpoint).await;

        if config.as_ref().is_some_and(|c| !c.is_active) {
            debug!("Caching disabled for {endpoint}");
            return self.call_provider(report, params, today).await;
        }

        let max_hits = self
            .options
            .max_hits
            .or_else(|| config.as_ref().and_then(|c| c.max_hits));
        let ttl = self
            .options
            .ttl
            .or_else(|| config.as_ref().map(EndpointCacheConfig::ttl))
            .unwrap_or_else(|| report.default_ttl());

        let params_json = params.to_json();
        let key = cache_key(endpoint, &params_json);

        if !self.options.force_refresh {
            if let Some(envelope) = self.lookup(&key, endpoint, max_hits).await {
                debug!("Cache hit for {endpoint}");
                log_ignored(
                    record_cache_hit(&self.pool, endpoint, today).await,
                    "record cache hit",
                );
                return Ok(envelope);
            }
            log_ignored(
                record_cache_miss(&self.pool, endpoint, today).await,
                "record cache miss",
            );
        }

        let envelope = self.call_provider(report, params, today).await?;

        match serde_json::to_value(&envelope) {
            Ok(response) => log_ignored(
                store_cached_response(
                    &self.pool,
                    &key,
                    endpoint,
                    &params_json,
                    &response,
                    ttl,
                    now_ms(),
                )
                .await,
                "store cached response",
            ),
            Err(e) => warn!("Could not encode {endpoint} response for caching: {e}"),
        }

        Ok(envelope)
    }
}
