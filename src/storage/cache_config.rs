//! Per-endpoint cache settings (`cache_config`).
//!
//! A row overrides the built-in lifetime of an endpoint, optionally caps how
//! many hits an entry may serve, and can switch caching off for the endpoint.
//! Endpoints without a row keep the defaults.

use std::time::Duration;

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::config::DEFAULT_CACHE_PRIORITY;
use crate::error_handling::DatabaseError;

/// Cache settings of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointCacheConfig {
    pub endpoint: String,
    pub ttl_secs: i64,
    /// Entries are evicted after serving this many hits
    pub max_hits: Option<i64>,
    /// `false` sends every request of the endpoint to the provider uncached
    pub is_active: bool,
    pub priority: i64,
}

impl EndpointCacheConfig {
    /// The settings an endpoint has while it has no row.
    pub fn default_for(endpoint: &str, default_ttl: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ttl_secs: i64::try_from(default_ttl.as_secs()).unwrap_or(i64::MAX),
            max_hits: None,
            is_active: true,
            priority: DEFAULT_CACHE_PRIORITY,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(u64::try_from(self.ttl_secs).unwrap_or(0))
    }
}

/// Fields to change; `None` keeps the stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheConfigUpdate {
    pub ttl_secs: Option<i64>,
    /// Zero or less removes the hit limit
    pub max_hits: Option<i64>,
    pub is_active: Option<bool>,
    pub priority: Option<i64>,
}

impl CacheConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == CacheConfigUpdate::default()
    }
}

fn config_from_row(row: &SqliteRow) -> EndpointCacheConfig {
    EndpointCacheConfig {
        endpoint: row.get("endpoint"),
        ttl_secs: row.get("ttl_secs"),
        max_hits: row.get("max_hits"),
        is_active: row.get("is_active"),
        priority: row.get("priority"),
    }
}

pub async fn get_cache_config(
    pool: &SqlitePool,
    endpoint: &str,
) -> Result<Option<EndpointCacheConfig>, DatabaseError> {
    let row = sqlx::query(
        "SELECT endpoint, ttl_secs, max_hits, is_active, priority
         FROM cache_config WHERE endpoint = ?",
    )
    .bind(endpoint)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(config_from_row))
}

/// Every configured endpoint, highest priority first.
pub async fn list_cache_configs(
    pool: &SqlitePool,
) -> Result<Vec<EndpointCacheConfig>, DatabaseError> {
    let rows = sqlx::query(
        "SELECT endpoint, ttl_secs, max_hits, is_active, priority
         FROM cache_config ORDER BY priority DESC, endpoint",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(config_from_row).collect())
}

/// Applies `update` to the endpoint's row, creating it from the defaults
/// (`default_ttl`, no hit limit, active) when missing. Returns the stored row.
pub async fn upsert_cache_config(
    pool: &SqlitePool,
    endpoint: &str,
    update: &CacheConfigUpdate,
    default_ttl: Duration,
    now_ms: i64,
) -> Result<EndpointCacheConfig, DatabaseError> {
    let defaults = EndpointCacheConfig::default_for(endpoint, default_ttl);
    let row = sqlx::query(
        "INSERT INTO cache_config (
            endpoint, ttl_secs, max_hits, is_active, priority, created_at_ms, updated_at_ms
        ) VALUES (
            ?1, COALESCE(?2, ?6), CASE WHEN ?3 > 0 THEN ?3 END,
            COALESCE(?4, 1), COALESCE(?5, ?7), ?8, ?8
        )
        ON CONFLICT(endpoint) DO UPDATE SET
            ttl_secs = COALESCE(?2, ttl_secs),
            max_hits = CASE
                WHEN ?3 IS NULL THEN max_hits
                WHEN ?3 > 0 THEN ?3
            END,
            is_active = COALESCE(?4, is_active),
            priority = COALESCE(?5, priority),
            updated_at_ms = ?8
        RETURNING endpoint, ttl_secs, max_hits, is_active, priority",
    )
    .bind(endpoint)
    .bind(update.ttl_secs)
    .bind(update.max_hits)
    .bind(update.is_active)
    .bind(update.priority)
    .bind(defaults.ttl_secs)
    .bind(defaults.priority)
    .bind(now_ms)
    .fetch_one(pool)
    .await?;

    Ok(config_from_row(&row))
}
