//! Typed report methods.
//!
//! Implementors only provide [`MajesticReports::fetch`]; every report builds its
//! parameters, fetches the checked envelope and maps the tables into typed
//! records the same way whether the envelope came from the network or a cache.

use async_trait::async_trait;

use crate::batch::{run_in_batches, RateLimitPolicy};
use crate::config::{BATCH_SOURCE_URL_BUDGET, HOSTED_DOMAINS_MAX};
use crate::error_handling::ProviderError;

use super::envelope::Envelope;
use super::request::{BacklinkQuery, Params, Report};
use super::types::{
    AnchorTextHeaders, AnchorTextItem, AnchorTextReport, BacklinkDataItem, Freshness,
    HostedDomainItem, HostedDomains, HostedDomainsHeaders, IndexItemInfo, NewLostBacklinkItem,
    Page, RefDomainItem, SubscriptionInfo, TopPageItem, TopicItem,
};

/// `OrderBy1` column for referring domains: matched links for a single target,
/// trust flow when comparing several.
const ORDER_BY_MATCHED_LINKS: u8 = 2;
const ORDER_BY_TRUST_FLOW: u8 = 11;

#[async_trait]
pub trait MajesticReports: Send + Sync {
    /// Issues one command and returns its envelope once the `Code` is `OK`.
    async fn fetch(&self, report: Report, params: Params) -> Result<Envelope, ProviderError>;

    /// Summary metrics for each URL, tagged with the URL requested at the same index.
    ///
    /// An empty input returns an empty result without calling the provider.
    async fn index_item_info(
        &self,
        urls: &[String],
        freshness: Freshness,
    ) -> Result<Vec<IndexItemInfo>, ProviderError> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let params = Params::new(freshness)
            .with("items", urls.len())
            .with("AddAllTopics", 1)
            .with_items(urls);
        let mut envelope = self.fetch(Report::IndexItemInfo, params).await?;
        let mut rows: Vec<IndexItemInfo> = envelope.take_rows("Results")?;

        for (row, url) in rows.iter_mut().zip(urls) {
            row.url = url.clone();
        }
        Ok(rows)
    }

    /// Backlinks pointing at one URL.
    async fn backlink_data(
        &self,
        query: &BacklinkQuery,
    ) -> Result<Vec<BacklinkDataItem>, ProviderError> {
        let mut envelope = self.fetch(Report::BacklinkData, query.params()).await?;
        envelope.take_rows("BackLinks")
    }

    /// Backlinks for several URLs, paced by `policy`.
    ///
    /// The source URL budget is split evenly so each target gets at most
    /// `floor(100 / urls.len())` links per referring domain.
    async fn batch_backlink_data(
        &self,
        urls: &[String],
        freshness: Freshness,
        policy: &RateLimitPolicy,
    ) -> Result<Vec<BacklinkDataItem>, ProviderError> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let per_domain = u32::try_from(BATCH_SOURCE_URL_BUDGET / urls.len()).unwrap_or(0);
        run_in_batches(urls, policy, |url| {
            let query = BacklinkQuery {
                max_source_urls_per_ref_domain: Some(per_domain),
                ..BacklinkQuery::new(url.clone()).freshness(freshness)
            };
            async move { self.backlink_data(&query).await }
        })
        .await
    }

    /// Referring domains of one or more domains.
    async fn ref_domains(
        &self,
        domains: &[String],
        freshness: Freshness,
        page: Page,
    ) -> Result<Vec<RefDomainItem>, ProviderError> {
        let order_by = if domains.len() == 1 {
            ORDER_BY_MATCHED_LINKS
        } else {
            ORDER_BY_TRUST_FLOW
        };
        let params = Params::new(freshness)
            .with_page(page)
            .with("OrderBy1", order_by)
            .with_items(domains);
        let mut envelope = self.fetch(Report::RefDomains, params).await?;
        envelope.take_rows("Results")
    }

    async fn anchor_text(
        &self,
        url: &str,
        freshness: Freshness,
        count: u32,
    ) -> Result<AnchorTextReport, ProviderError> {
        let params = Params::new(freshness).with("item", url).with("Count", count);
        let mut envelope = self.fetch(Report::AnchorText, params).await?;
        let headers: AnchorTextHeaders = envelope.headers("AnchorText")?;
        let anchors: Vec<AnchorTextItem> = envelope.take_rows("AnchorText")?;
        Ok(AnchorTextReport {
            total_backlinks: headers.total_backlinks,
            total_ref_domains: headers.total_ref_domains,
            anchors,
        })
    }

    async fn topics(
        &self,
        url: &str,
        freshness: Freshness,
        count: u32,
    ) -> Result<Vec<TopicItem>, ProviderError> {
        let params = Params::new(freshness).with("item", url).with("Count", count);
        let mut envelope = self.fetch(Report::Topics, params).await?;
        envelope.take_rows("Topics")
    }

    async fn top_pages(
        &self,
        url: &str,
        freshness: Freshness,
        page: Page,
    ) -> Result<Vec<TopPageItem>, ProviderError> {
        let params = Params::new(freshness).with("Query", url).with_page(page);
        let mut envelope = self.fetch(Report::TopPages, params).await?;
        envelope.take_rows("Matches")
    }

    /// Recently gained (and, with `mode` 1, lost) backlinks.
    async fn new_lost_backlinks(
        &self,
        url: &str,
        freshness: Freshness,
        mode: u8,
    ) -> Result<Vec<NewLostBacklinkItem>, ProviderError> {
        let params = Params::new(freshness).with("item", url).with("Mode", mode);
        let mut envelope = self.fetch(Report::NewLostBacklinks, params).await?;
        envelope.take_rows("BackLinks")
    }

    async fn hosted_domains(
        &self,
        domain: &str,
        freshness: Freshness,
    ) -> Result<HostedDomains, ProviderError> {
        let params = Params::new(freshness)
            .with("Domain", domain)
            .with("MaxDomains", HOSTED_DOMAINS_MAX);
        let mut envelope = self.fetch(Report::HostedDomains, params).await?;

        let headers: HostedDomainsHeaders = envelope.headers("DomainsOnIP")?;
        let recommended_ip = envelope.field_str("RecommendedIP");
        let domains_on_ip: Vec<HostedDomainItem> = envelope.take_rows("DomainsOnIP")?;
        let domains_on_subnet: Vec<HostedDomainItem> = envelope.take_rows("DomainsOnSubnet")?;

        Ok(HostedDomains {
            domains_on_ip,
            domains_on_subnet,
            recommended_ip,
            current_ip: headers.ip,
        })
    }

    /// Remaining account quota, `None` when the provider returns no subscription row.
    async fn subscription_info(
        &self,
        freshness: Freshness,
    ) -> Result<Option<SubscriptionInfo>, ProviderError> {
        let mut envelope = self
            .fetch(Report::SubscriptionInfo, Params::new(freshness))
            .await?;
        let rows: Vec<SubscriptionInfo> = envelope.take_rows("Subscriptions")?;
        Ok(rows.into_iter().next())
    }
}
