//! End-to-end ingest: mock provider, static DNS, in-memory database.

mod helpers;

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use helpers::{count_domain_rows, create_test_pool, error_envelope, mock_client, table_envelope};
use pulserank_ingest::enrichment::SkipReason;
use pulserank_ingest::storage::{cache_stats, domain_history, find_latest_for_domain};
use pulserank_ingest::{
    CachedMajesticClient, Freshness, HostResolver, Page, ProviderError, RankIngest,
    StaticResolver,
};
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver() -> Arc<dyn HostResolver> {
    Arc::new(
        StaticResolver::new()
            .with("example.com", IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34)))
            .with("example.org", IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7))),
    )
}

fn urls(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn index_rows() -> serde_json::Value {
    json!([
        {"ExtBackLinks": 900, "RefDomains": 80, "ACRank": 3, "TrustFlow": 30, "CitationFlow": 60,
         "TopicalTrustFlow_Topic_0": "Society", "TopicalTrustFlow_Value_0": 12},
        {"ExtBackLinks": 10, "RefDomains": 2, "TrustFlow": 5, "CitationFlow": 9},
        {"ExtBackLinks": 44, "RefDomains": 7, "TrustFlow": 11, "CitationFlow": 0,
         "TopicalTrustFlow_Value_0": ""}
    ])
}

async fn mount_index_info(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(query_param("cmd", "GetIndexItemInfo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(table_envelope("Results", index_rows())),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_index_info_returns_data_and_stores_root_domains() {
    let server = MockServer::start().await;
    mount_index_info(&server, 1).await;
    let pool = create_test_pool().await;
    let ingest = RankIngest::new(mock_client(&server), pool.clone(), resolver());

    let outcome = ingest
        .index_item_info(
            &urls(&["example.com", "https://example.com/about", "example.org"]),
            Freshness::Fresh,
        )
        .await
        .expect("report");

    assert_eq!(outcome.data.len(), 3);
    assert_eq!(outcome.data[1].url, "https://example.com/about");

    let report = &outcome.persistence;
    assert!(report.is_clean());
    let stored: Vec<&str> = report.succeeded.iter().map(|d| d.domain.as_str()).collect();
    assert_eq!(stored, vec!["example.com", "example.org"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::NotRootDomain);

    let example = find_latest_for_domain(&pool, "example.com")
        .await
        .expect("query")
        .expect("row");
    assert_eq!(example.metrics.ip, "93.184.216.34");
    assert_eq!(example.metrics.subnet, "93.184.216.0");
    assert_eq!(example.metrics.percentage, 50);
    assert_eq!(example.metrics.alexa_rank, "3");

    let org = find_latest_for_domain(&pool, "example.org")
        .await
        .expect("query")
        .expect("row");
    assert_eq!(org.metrics.percentage, 0);
    assert_eq!(org.metrics.topic_value, 0);
}

#[tokio::test]
async fn test_repeated_ingest_updates_rows_in_place() {
    let server = MockServer::start().await;
    mount_index_info(&server, 2).await;
    let pool = create_test_pool().await;
    let ingest = RankIngest::new(mock_client(&server), pool.clone(), resolver());
    let targets = urls(&["example.com", "www.example.com", "example.org"]);

    for _ in 0..2 {
        ingest
            .index_item_info(&targets, Freshness::Fresh)
            .await
            .expect("report");
    }

    assert_eq!(count_domain_rows(&pool, "example.com").await, 1);
    assert_eq!(count_domain_rows(&pool, "example.org").await, 1);
    assert_eq!(count_domain_rows(&pool, "www.example.com").await, 0);
    let history = domain_history(&pool, "example.com", 30, 0)
        .await
        .expect("history");
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_dns_failure_does_not_fail_the_report() {
    let server = MockServer::start().await;
    mount_index_info(&server, 1).await;
    let pool = create_test_pool().await;
    let ingest = RankIngest::new(mock_client(&server), pool.clone(), resolver());

    let outcome = ingest
        .index_item_info(
            &urls(&["example.com", "unknown-host.test", "example.org"]),
            Freshness::Fresh,
        )
        .await
        .expect("report still succeeds");

    assert_eq!(outcome.data.len(), 3);
    assert_eq!(outcome.persistence.succeeded.len(), 2);
    assert_eq!(outcome.persistence.failed.len(), 1);
    assert_eq!(outcome.persistence.failed[0].url, "unknown-host.test");
}

#[tokio::test]
async fn test_provider_rejection_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_envelope(
            "InsufficientIndexItemInfoUnits",
            "Out of index item info units",
        )))
        .mount(&server)
        .await;
    let pool = create_test_pool().await;
    let ingest = RankIngest::new(mock_client(&server), pool.clone(), resolver());

    let err = ingest
        .index_item_info(&urls(&["example.com"]), Freshness::Fresh)
        .await
        .expect_err("rejected");
    assert!(matches!(err, ProviderError::Api { .. }));
    assert_eq!(count_domain_rows(&pool, "example.com").await, 0);
}

#[tokio::test]
async fn test_ref_domains_are_stored_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("cmd", "GetRefDomains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(table_envelope(
            "Results",
            json!([
                {"Domain": "referrer.net", "IP": "198.51.100.20", "SubNet": "198.51.100.0",
                 "AlexaRank": 5000, "TrustFlow": 20, "CitationFlow": 40},
                {"Domain": "other.org", "IP": "192.0.2.1", "SubNet": "192.0.2.0",
                 "TrustFlow": 3, "CitationFlow": 0}
            ]),
        )))
        .mount(&server)
        .await;
    let pool = create_test_pool().await;
    let ingest = RankIngest::new(mock_client(&server), pool.clone(), resolver());
    let targets = urls(&["example.com"]);

    let first = ingest
        .ref_domains(&targets, Freshness::Fresh, Page::default())
        .await
        .expect("report");
    let first = first.persistence.expect("persisted");
    assert_eq!(first.inserted, 2);

    let second = ingest
        .ref_domains(&targets, Freshness::Fresh, Page::default())
        .await
        .expect("report");
    let second = second.persistence.expect("persisted");
    assert_eq!(second.inserted, 0);
    assert_eq!(second.skipped_duplicates, 2);

    let referrer = find_latest_for_domain(&pool, "referrer.net")
        .await
        .expect("query")
        .expect("row");
    assert_eq!(referrer.metrics.subnet, "198.51.100.0");
    assert_eq!(referrer.metrics.alexa_rank, "5000");
    assert_eq!(referrer.metrics.percentage, 50);
}

#[tokio::test]
async fn test_cached_client_still_runs_enrichment() {
    let server = MockServer::start().await;
    mount_index_info(&server, 1).await;
    let pool = create_test_pool().await;
    let cached = CachedMajesticClient::new(mock_client(&server), pool.clone());
    let ingest = RankIngest::new(cached, pool.clone(), resolver());
    let targets = urls(&["example.com", "example.net", "example.org"]);

    let first = ingest
        .index_item_info(&targets, Freshness::Fresh)
        .await
        .expect("from provider");
    let second = ingest
        .index_item_info(&targets, Freshness::Fresh)
        .await
        .expect("from cache");

    assert_eq!(first.data, second.data);
    assert_eq!(second.persistence.succeeded.len(), 2);
    assert_eq!(count_domain_rows(&pool, "example.com").await, 1);

    let stats = cache_stats(&pool, Some("majestic.indexItemInfo"), None)
        .await
        .expect("stats");
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.api_calls, 1);
}
