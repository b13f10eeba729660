//! Daily per-endpoint usage counters (`cache_stats`).

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;

/// Aggregated usage counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub total_requests: i64,
    pub cache_hits: i64,
    pub cache_misses: i64,
    pub api_calls: i64,
    /// `cache_hits / total_requests`, 0 when nothing was requested
    pub hit_rate: f64,
    pub average_response_time_ms: f64,
}

fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

pub async fn record_cache_hit(
    pool: &SqlitePool,
    endpoint: &str,
    day: NaiveDate,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO cache_stats (day, endpoint, total_requests, cache_hits)
         VALUES (?, ?, 1, 1)
         ON CONFLICT(day, endpoint) DO UPDATE SET
            total_requests = total_requests + 1,
            cache_hits = cache_hits + 1",
    )
    .bind(day_key(day))
    .bind(endpoint)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn record_cache_miss(
    pool: &SqlitePool,
    endpoint: &str,
    day: NaiveDate,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO cache_stats (day, endpoint, total_requests, cache_misses)
         VALUES (?, ?, 1, 1)
         ON CONFLICT(day, endpoint) DO UPDATE SET
            total_requests = total_requests + 1,
            cache_misses = cache_misses + 1",
    )
    .bind(day_key(day))
    .bind(endpoint)
    .execute(pool)
    .await?;
    Ok(())
}

/// Counts one provider call and folds `response_time_ms` into the running average.
pub async fn record_api_call(
    pool: &SqlitePool,
    endpoint: &str,
    response_time_ms: f64,
    day: NaiveDate,
) -> Result<(), DatabaseError> {
    // Right-hand sides of the UPDATE read the pre-update row
    sqlx::query(
        "INSERT INTO cache_stats (day, endpoint, api_calls, average_response_time_ms)
         VALUES (?, ?, 1, ?)
         ON CONFLICT(day, endpoint) DO UPDATE SET
            average_response_time_ms =
                (average_response_time_ms * api_calls + excluded.average_response_time_ms)
                / (api_calls + 1),
            api_calls = api_calls + 1",
    )
    .bind(day_key(day))
    .bind(endpoint)
    .bind(response_time_ms)
    .execute(pool)
    .await?;
    Ok(())
}

/// Sums counters, optionally restricted to one endpoint and/or one day.
pub async fn cache_stats(
    pool: &SqlitePool,
    endpoint: Option<&str>,
    day: Option<NaiveDate>,
) -> Result<CacheStats, DatabaseError> {
    let row = sqlx::query(
        "SELECT
            COALESCE(SUM(total_requests), 0) AS total_requests,
            COALESCE(SUM(cache_hits), 0) AS cache_hits,
            COALESCE(SUM(cache_misses), 0) AS cache_misses,
            COALESCE(SUM(api_calls), 0) AS api_calls,
            COALESCE(SUM(average_response_time_ms * api_calls), 0.0) AS weighted_time
         FROM cache_stats
         WHERE (?1 IS NULL OR endpoint = ?1)
           AND (?2 IS NULL OR day = ?2)",
    )
    .bind(endpoint)
    .bind(day.map(day_key))
    .fetch_one(pool)
    .await?;

    let total_requests: i64 = row.get("total_requests");
    let cache_hits: i64 = row.get("cache_hits");
    let api_calls: i64 = row.get("api_calls");
    let weighted_time: f64 = row.get("weighted_time");

    Ok(CacheStats {
        total_requests,
        cache_hits,
        cache_misses: row.get("cache_misses"),
        api_calls,
        hit_rate: if total_requests > 0 {
            cache_hits as f64 / total_requests as f64
        } else {
            0.0
        },
        average_response_time_ms: if api_calls > 0 {
            weighted_time / api_calls as f64
        } else {
            0.0
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::create_test_pool;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).expect("valid date")
    }

    #[tokio::test]
    async fn test_counters_accumulate() {
        let pool = create_test_pool().await;
        let endpoint = "majestic.backlinkData";

        record_cache_miss(&pool, endpoint, day(1)).await.expect("miss");
        record_api_call(&pool, endpoint, 100.0, day(1)).await.expect("call");
        record_cache_hit(&pool, endpoint, day(1)).await.expect("hit");
        record_cache_hit(&pool, endpoint, day(1)).await.expect("hit");
        record_cache_miss(&pool, endpoint, day(1)).await.expect("miss");
        record_api_call(&pool, endpoint, 300.0, day(1)).await.expect("call");

        let stats = cache_stats(&pool, Some(endpoint), None).await.expect("stats");
        assert_eq!(stats.total_requests, 4);
        assert_eq!(stats.cache_hits, 2);
        assert_eq!(stats.cache_misses, 2);
        assert_eq!(stats.api_calls, 2);
        assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);
        assert!((stats.average_response_time_ms - 200.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_filters_by_endpoint_and_day() {
        let pool = create_test_pool().await;
        record_cache_hit(&pool, "majestic.topics", day(1)).await.expect("hit");
        record_cache_hit(&pool, "majestic.topics", day(2)).await.expect("hit");
        record_cache_miss(&pool, "majestic.refDomains", day(2))
            .await
            .expect("miss");

        let all = cache_stats(&pool, None, None).await.expect("stats");
        assert_eq!(all.total_requests, 3);

        let topics_day_two = cache_stats(&pool, Some("majestic.topics"), Some(day(2)))
            .await
            .expect("stats");
        assert_eq!(topics_day_two.total_requests, 1);
        assert_eq!(topics_day_two.cache_hits, 1);
    }

    #[tokio::test]
    async fn test_empty_stats() {
        let pool = create_test_pool().await;
        let stats = cache_stats(&pool, None, None).await.expect("stats");
        assert_eq!(stats, CacheStats::default());
    }
}
