// Shared test helpers: mock provider responses and database setup.

use serde_json::{json, Value};
use sqlx::SqlitePool;
use wiremock::MockServer;

use pulserank_ingest::storage::init_memory_pool;
use pulserank_ingest::{MajesticClient, ProviderConfig};

pub const TEST_API_KEY: &str = "test-key";

/// Successful envelope with the given `DataTables` object.
pub fn ok_envelope(tables: Value) -> Value {
    json!({
        "Code": "OK",
        "ErrorMessage": "",
        "DataTables": tables,
    })
}

/// Successful envelope with a single table.
pub fn table_envelope(table: &str, rows: Value) -> Value {
    let mut tables = serde_json::Map::new();
    tables.insert(table.to_string(), json!({ "Headers": {}, "Data": rows }));
    ok_envelope(Value::Object(tables))
}

/// Rejected envelope.
#[allow(dead_code)]
pub fn error_envelope(code: &str, message: &str) -> Value {
    json!({
        "Code": code,
        "ErrorMessage": message,
        "DataTables": {},
    })
}

/// Client pointed at the mock server.
pub fn mock_client(server: &MockServer) -> MajesticClient {
    MajesticClient::new(ProviderConfig::new(TEST_API_KEY).with_base_url(server.uri()))
        .expect("Failed to build client")
}

/// In-memory database with migrations applied.
#[allow(dead_code)]
pub async fn create_test_pool() -> SqlitePool {
    init_memory_pool()
        .await
        .expect("Failed to create test database pool")
}

/// Query parameters of every request the mock server received, in order.
#[allow(dead_code)]
pub async fn received_queries(server: &MockServer) -> Vec<Vec<(String, String)>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| {
            request
                .url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .collect()
}

/// Value of `key` in one request's query parameters.
#[allow(dead_code)]
pub fn param<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Number of stored metric rows for `domain`.
#[allow(dead_code)]
pub async fn count_domain_rows(pool: &SqlitePool, domain: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM domain_index_info WHERE domain = ?")
        .bind(domain)
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
