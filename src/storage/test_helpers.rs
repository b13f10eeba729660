//! Shared test helpers for storage module tests.

use sqlx::SqlitePool;

use crate::domain::{calculate_percentage, calculate_subnet};
use crate::storage::{init_memory_pool, DomainMetrics};

/// In-memory database with migrations applied.
pub async fn create_test_pool() -> SqlitePool {
    init_memory_pool()
        .await
        .expect("Failed to create test database pool")
}

/// Metrics for `domain` with the given flow scores and derived percentage.
pub fn sample_metrics(domain: &str, trust_flow: i64, citation_flow: i64) -> DomainMetrics {
    let ip = "203.0.113.45".to_string();
    DomainMetrics {
        domain: domain.to_string(),
        ext_backlinks: 1200,
        ref_domains: 85,
        alexa_rank: "12345".to_string(),
        subnet: calculate_subnet(&ip),
        ip,
        trust_flow,
        citation_flow,
        percentage: calculate_percentage(trust_flow, citation_flow),
        topic: "Computers/Internet".to_string(),
        topic_value: 22,
    }
}

/// Number of stored rows for `domain`.
pub async fn count_domain_rows(pool: &SqlitePool, domain: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM domain_index_info WHERE domain = ?")
        .bind(domain)
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
