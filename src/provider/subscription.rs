//! Cached subscription snapshot.
//!
//! Quota lookups are cheap but not free, so the latest snapshot is reused for
//! `max_age`. Callers that know the quota changed (e.g. after a large batch)
//! call [`SubscriptionCache::invalidate`].

use std::time::Duration;

use log::info;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::config::SUBSCRIPTION_MAX_AGE;
use crate::error_handling::ProviderError;

use super::reports::MajesticReports;
use super::types::{Freshness, SubscriptionInfo};

#[derive(Debug)]
pub struct SubscriptionCache {
    max_age: Duration,
    latest: RwLock<Option<(SubscriptionInfo, Instant)>>,
}

impl Default for SubscriptionCache {
    fn default() -> Self {
        Self::new(SUBSCRIPTION_MAX_AGE)
    }
}

impl SubscriptionCache {
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            latest: RwLock::new(None),
        }
    }

    /// Returns the cached snapshot while fresh, otherwise fetches a new one.
    ///
    /// When a previous snapshot exists, the credits consumed since then are logged.
    pub async fn current<C>(&self, client: &C) -> Result<Option<SubscriptionInfo>, ProviderError>
    where
        C: MajesticReports + ?Sized,
    {
        {
            let latest = self.latest.read().await;
            if let Some((info, taken_at)) = latest.as_ref() {
                if taken_at.elapsed() < self.max_age {
                    return Ok(Some(info.clone()));
                }
            }
        }

        let Some(fresh) = client.subscription_info(Freshness::Fresh).await? else {
            return Ok(None);
        };

        let mut latest = self.latest.write().await;
        if let Some((previous, _)) = latest.as_ref() {
            let usage = fresh.usage_since(previous);
            if !usage.is_empty() {
                info!(
                    "Credits used since last check: {} index item info, {} retrieval, {} analysis",
                    usage.index_item_info_units, usage.retrieval_units, usage.analysis_units
                );
            }
        }
        *latest = Some((fresh.clone(), Instant::now()));
        Ok(Some(fresh))
    }

    /// Drops the cached snapshot so the next [`current`](Self::current) refetches.
    pub async fn invalidate(&self) {
        *self.latest.write().await = None;
    }

    /// The cached snapshot, regardless of age.
    pub async fn snapshot(&self) -> Option<SubscriptionInfo> {
        self.latest.read().await.as_ref().map(|(info, _)| info.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::provider::MajesticClient;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn subscription_body(retrieval_units: i64) -> serde_json::Value {
        json!({
            "Code": "OK",
            "ErrorMessage": "",
            "DataTables": {"Subscriptions": {"Headers": {}, "Data": [{
                "IndexItemInfoResUnits": 5000,
                "RetrievalResUnits": retrieval_units,
                "AnalysisResUnits": 100
            }]}}
        })
    }

    async fn client_for(server: &MockServer) -> MajesticClient {
        MajesticClient::new(ProviderConfig::new("test-key").with_base_url(server.uri()))
            .expect("client")
    }

    #[tokio::test]
    async fn test_snapshot_is_reused_until_invalidated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("cmd", "GetSubscriptionInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(subscription_body(900)))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let cache = SubscriptionCache::new(Duration::from_secs(3600));

        let first = cache.current(&client).await.expect("fetch").expect("row");
        assert_eq!(first.retrieval_units, 900);
        cache.current(&client).await.expect("cached");

        cache.invalidate().await;
        assert!(cache.snapshot().await.is_none());
        cache.current(&client).await.expect("refetch");
        // MockServer verifies the expected call count on drop
    }

    #[tokio::test]
    async fn test_zero_max_age_always_refetches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(subscription_body(10)))
            .expect(3)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let cache = SubscriptionCache::new(Duration::ZERO);
        for _ in 0..3 {
            cache.current(&client).await.expect("fetch");
        }
        assert_eq!(
            cache.snapshot().await.map(|info| info.retrieval_units),
            Some(10)
        );
    }

    #[tokio::test]
    async fn test_missing_row_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Code": "OK",
                "ErrorMessage": "",
                "DataTables": {"Subscriptions": {"Headers": {}, "Data": []}}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let cache = SubscriptionCache::default();
        assert!(cache.current(&client).await.expect("fetch").is_none());
        assert!(cache.snapshot().await.is_none());
    }
}
