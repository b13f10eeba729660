//! Response cache table (`api_cache`).
//!
//! Entries are whole decoded responses stored as JSON text under a key derived
//! from endpoint and parameters. Reads treat expired entries (and entries past an
//! optional hit budget) as absent and delete them on the way out.

use std::time::Duration;

use log::debug;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;

/// Looks up `cache_key`, returning the stored response when it is still valid.
///
/// A hit bumps `hit_count` and `last_accessed_ms`.
pub async fn get_cached_response(
    pool: &SqlitePool,
    cache_key: &str,
    max_hits: Option<i64>,
    now_ms: i64,
) -> Result<Option<Value>, DatabaseError> {
    let row = sqlx::query(
        "SELECT id, response, expires_at_ms, hit_count FROM api_cache WHERE cache_key = ?",
    )
    .bind(cache_key)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let id: i64 = row.get("id");
    let expires_at_ms: i64 = row.get("expires_at_ms");
    let hit_count: i64 = row.get("hit_count");

    let exhausted = max_hits.is_some_and(|max| hit_count >= max);
    if expires_at_ms <= now_ms || exhausted {
        debug!("Dropping stale cache entry {cache_key}");
        sqlx::query("DELETE FROM api_cache WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        return Ok(None);
    }

    let response: String = row.get("response");
    let value = serde_json::from_str(&response)?;

    sqlx::query(
        "UPDATE api_cache SET hit_count = hit_count + 1, last_accessed_ms = ? WHERE id = ?",
    )
    .bind(now_ms)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(Some(value))
}

/// Stores (or replaces) a response valid for `ttl` from `now_ms`.
pub async fn store_cached_response(
    pool: &SqlitePool,
    cache_key: &str,
    endpoint: &str,
    parameters: &Value,
    response: &Value,
    ttl: Duration,
    now_ms: i64,
) -> Result<(), DatabaseError> {
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    let expires_at_ms = now_ms.saturating_add(ttl_ms);

    sqlx::query(
        "INSERT INTO api_cache (
            cache_key, endpoint, parameters, response, expires_at_ms,
            hit_count, last_accessed_ms, created_at_ms
        ) VALUES (?, ?, ?, ?, ?, 0, ?, ?)
        ON CONFLICT(cache_key) DO UPDATE SET
            endpoint = excluded.endpoint,
            parameters = excluded.parameters,
            response = excluded.response,
            expires_at_ms = excluded.expires_at_ms,
            hit_count = 0,
            last_accessed_ms = excluded.last_accessed_ms,
            created_at_ms = excluded.created_at_ms",
    )
    .bind(cache_key)
    .bind(endpoint)
    .bind(serde_json::to_string(parameters)?)
    .bind(serde_json::to_string(response)?)
    .bind(expires_at_ms)
    .bind(now_ms)
    .bind(now_ms)
    .execute(pool)
    .await?;

    Ok(())
}

/// Deletes entries whose endpoint contains `pattern`.
pub async fn invalidate_cache(pool: &SqlitePool, pattern: &str) -> Result<u64, DatabaseError> {
    let result = sqlx::query("DELETE FROM api_cache WHERE instr(endpoint, ?) > 0")
        .bind(pattern)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Deletes every entry expired at `now_ms`.
pub async fn cleanup_expired_cache(pool: &SqlitePool, now_ms: i64) -> Result<u64, DatabaseError> {
    let result = sqlx::query("DELETE FROM api_cache WHERE expires_at_ms <= ?")
        .bind(now_ms)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
