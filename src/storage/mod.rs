// storage/mod.rs
// Database operations module

pub mod api_cache;
pub mod cache_config;
pub mod domain_index;
pub mod migrations;
pub mod pool;
#[cfg(test)]
pub(crate) mod test_helpers;
pub mod usage;

// Re-export commonly used items
pub use api_cache::{
    cleanup_expired_cache, get_cached_response, invalidate_cache, store_cached_response,
};
pub use cache_config::{
    get_cache_config, list_cache_configs, upsert_cache_config, CacheConfigUpdate,
    EndpointCacheConfig,
};
pub use domain_index::{
    domain_history, find_latest_for_domain, insert_domain_index, insert_many_skip_duplicates,
    update_domain_index, upsert_domain_index, DomainIndexRecord, DomainMetrics, UpsertOutcome,
};
pub use migrations::run_migrations;
pub use pool::{init_db_pool_with_path, init_memory_pool};
pub use usage::{cache_stats, record_api_call, record_cache_hit, record_cache_miss, CacheStats};

/// Current time in milliseconds since the Unix epoch, the unit of every stored timestamp.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
