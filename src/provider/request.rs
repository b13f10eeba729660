//! Report commands and query parameter building.

use std::time::Duration;

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::config::{TTL_DAY, TTL_SHORT, TTL_WEEK};

use super::types::{Freshness, Page};

/// Provider commands exposed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Report {
    IndexItemInfo,
    BacklinkData,
    RefDomains,
    AnchorText,
    Topics,
    TopPages,
    NewLostBacklinks,
    HostedDomains,
    SubscriptionInfo,
}

impl Report {
    /// Value of the `cmd` query parameter.
    pub fn command(&self) -> &'static str {
        match self {
            Report::IndexItemInfo => "GetIndexItemInfo",
            Report::BacklinkData => "GetBackLinkData",
            Report::RefDomains => "GetRefDomains",
            Report::AnchorText => "GetAnchorText",
            Report::Topics => "GetTopics",
            Report::TopPages => "GetTopPages",
            Report::NewLostBacklinks => "GetNewLostBackLinks",
            Report::HostedDomains => "GetHostedDomains",
            Report::SubscriptionInfo => "GetSubscriptionInfo",
        }
    }

    /// Name used for cache keys and usage statistics.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Report::IndexItemInfo => "majestic.indexItemInfo",
            Report::BacklinkData => "majestic.backlinkData",
            Report::RefDomains => "majestic.refDomains",
            Report::AnchorText => "majestic.anchorText",
            Report::Topics => "majestic.topics",
            Report::TopPages => "majestic.topPages",
            Report::NewLostBacklinks => "majestic.newLostBacklinks",
            Report::HostedDomains => "majestic.hostedDomains",
            Report::SubscriptionInfo => "majestic.subscriptionInfo",
        }
    }

    /// The report whose [`Report::endpoint`] is `endpoint`.
    pub fn from_endpoint(endpoint: &str) -> Option<Report> {
        Report::iter().find(|report| report.endpoint() == endpoint)
    }

    /// How long a cached response for this report stays valid.
    pub fn default_ttl(&self) -> Duration {
        match self {
            Report::IndexItemInfo | Report::AnchorText | Report::Topics => TTL_WEEK,
            Report::NewLostBacklinks => TTL_SHORT,
            _ => TTL_DAY,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command())
    }
}

/// Ordered query parameters for one command, excluding `cmd` and `app_api_key`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new(freshness: Freshness) -> Self {
        Params(vec![("datasource".to_string(), freshness.as_str().to_string())])
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn with_page(self, page: Page) -> Self {
        self.with("Count", page.count).with("From", page.from)
    }

    /// `item0..itemN` for multi-target commands.
    pub fn with_items(mut self, items: &[String]) -> Self {
        for (index, item) in items.iter().enumerate() {
            self.0.push((format!("item{index}"), item.clone()));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }

    /// Parameters as a JSON object, used to key cached responses.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}

/// Parameters of a single-URL backlink request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklinkQuery {
    pub url: String,
    pub freshness: Freshness,
    /// `Mode` 0 returns all links, 1 removes deleted ones
    pub mode: u8,
    /// Only return links from this referring domain
    pub ref_domain: Option<String>,
    pub max_source_urls_per_ref_domain: Option<u32>,
    pub page: Page,
}

impl BacklinkQuery {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            freshness: Freshness::Fresh,
            mode: 0,
            ref_domain: None,
            max_source_urls_per_ref_domain: None,
            page: Page::default(),
        }
    }

    pub fn freshness(mut self, freshness: Freshness) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn params(&self) -> Params {
        Params::new(self.freshness)
            .with("item", &self.url)
            .with("Mode", self.mode)
            .with_page(self.page)
            .with_opt("RefDomain", self.ref_domain.as_ref())
            .with_opt(
                "MaxSourceURLsPerRefDomain",
                self.max_source_urls_per_ref_domain.filter(|max| *max > 0),
            )
    }
}
