//! Typed report records.
//!
//! Each record decodes from the provider's column names and serializes with
//! stable snake_case names.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use super::decode::{lenient_bool, lenient_i64, lenient_string};

/// Index snapshot a report is computed from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    /// Recently re-crawled index
    #[default]
    Fresh,
    /// Long-term historic index
    Historic,
}

impl Freshness {
    /// Value of the `datasource` request parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Fresh => "fresh",
            Freshness::Historic => "historic",
        }
    }
}

impl std::fmt::Display for Freshness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Count` / `From` paging parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub count: u32,
    pub from: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            count: crate::config::DEFAULT_PAGE_COUNT,
            from: 0,
        }
    }
}

/// One topical trust flow classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicalTrustFlow {
    pub topic: String,
    pub value: i64,
}

/// Summary metrics for one requested URL or domain (`GetIndexItemInfo`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexItemInfo {
    /// The item as requested (the provider echoes a normalized form in `Item`)
    #[serde(skip_deserializing)]
    pub url: String,
    #[serde(rename(deserialize = "Title"), deserialize_with = "lenient_string")]
    pub title: String,
    /// Authority rank. Kept as text: the provider emits sentinels such as `-1`.
    #[serde(rename(deserialize = "ACRank"), deserialize_with = "lenient_string")]
    pub ac_rank: String,
    #[serde(rename(deserialize = "RefDomains"), deserialize_with = "lenient_i64")]
    pub ref_domains: i64,
    #[serde(rename(deserialize = "RefIPs"), deserialize_with = "lenient_i64")]
    pub ref_ips: i64,
    #[serde(rename(deserialize = "RefSubNets"), deserialize_with = "lenient_i64")]
    pub ref_subnets: i64,
    #[serde(rename(deserialize = "ExtBackLinks"), deserialize_with = "lenient_i64")]
    pub ext_backlinks: i64,
    #[serde(rename(deserialize = "RefDomainsEDU"), deserialize_with = "lenient_i64")]
    pub ref_domains_edu: i64,
    #[serde(rename(deserialize = "RefDomainsGOV"), deserialize_with = "lenient_i64")]
    pub ref_domains_gov: i64,
    #[serde(rename(deserialize = "IndexedURLs"), deserialize_with = "lenient_i64")]
    pub indexed_urls: i64,
    #[serde(rename(deserialize = "TrustFlow"), deserialize_with = "lenient_i64")]
    pub trust_flow: i64,
    #[serde(rename(deserialize = "CitationFlow"), deserialize_with = "lenient_i64")]
    pub citation_flow: i64,
    #[serde(
        rename(deserialize = "TopicalTrustFlow_Topic_0"),
        deserialize_with = "lenient_string"
    )]
    pub topical_trust_flow_topic_0: String,
    #[serde(
        rename(deserialize = "TopicalTrustFlow_Value_0"),
        deserialize_with = "lenient_i64"
    )]
    pub topical_trust_flow_value_0: i64,
    #[serde(
        rename(deserialize = "TopicalTrustFlow_Topic_1"),
        deserialize_with = "lenient_string"
    )]
    pub topical_trust_flow_topic_1: String,
    #[serde(
        rename(deserialize = "TopicalTrustFlow_Value_1"),
        deserialize_with = "lenient_i64"
    )]
    pub topical_trust_flow_value_1: i64,
    #[serde(
        rename(deserialize = "TopicalTrustFlow_Topic_2"),
        deserialize_with = "lenient_string"
    )]
    pub topical_trust_flow_topic_2: String,
    #[serde(
        rename(deserialize = "TopicalTrustFlow_Value_2"),
        deserialize_with = "lenient_i64"
    )]
    pub topical_trust_flow_value_2: i64,
    #[serde(rename(deserialize = "TrustCategories"))]
    pub trust_categories: Option<String>,
    #[serde(rename(deserialize = "Status"), deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(
        rename(deserialize = "LastCrawlResult"),
        deserialize_with = "lenient_string"
    )]
    pub last_crawl_result: String,
    #[serde(rename(deserialize = "LastCrawlDate"), deserialize_with = "lenient_string")]
    pub last_crawl_date: String,
    #[serde(rename(deserialize = "LastSeen"), deserialize_with = "lenient_string")]
    pub last_seen: String,
}

impl IndexItemInfo {
    /// Up to three topical trust flow pairs, strongest first, empty topics dropped.
    pub fn topics(&self) -> Vec<TopicalTrustFlow> {
        [
            (&self.topical_trust_flow_topic_0, self.topical_trust_flow_value_0),
            (&self.topical_trust_flow_topic_1, self.topical_trust_flow_value_1),
            (&self.topical_trust_flow_topic_2, self.topical_trust_flow_value_2),
        ]
        .into_iter()
        .filter(|(topic, _)| !topic.is_empty())
        .map(|(topic, value)| TopicalTrustFlow {
            topic: topic.clone(),
            value,
        })
        .collect()
    }
}

/// Link attributes of a backlink, in the provider's column order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacklinkFlags {
    #[serde(rename(deserialize = "FlagRedirect"), deserialize_with = "lenient_bool")]
    pub redirect: bool,
    #[serde(rename(deserialize = "FlagFrame"), deserialize_with = "lenient_bool")]
    pub frame: bool,
    #[serde(rename(deserialize = "FlagNoFollow"), deserialize_with = "lenient_bool")]
    pub no_follow: bool,
    #[serde(rename(deserialize = "FlagImages"), deserialize_with = "lenient_bool")]
    pub images: bool,
    #[serde(rename(deserialize = "FlagDeleted"), deserialize_with = "lenient_bool")]
    pub deleted: bool,
    #[serde(rename(deserialize = "FlagAltText"), deserialize_with = "lenient_bool")]
    pub alt_text: bool,
    #[serde(rename(deserialize = "FlagMention"), deserialize_with = "lenient_bool")]
    pub mention: bool,
}

impl BacklinkFlags {
    pub fn do_follow(&self) -> bool {
        !self.no_follow
    }

    /// Flags as a fixed array: redirect, frame, nofollow, images, deleted, alt text, mention.
    pub fn as_array(&self) -> [bool; 7] {
        [
            self.redirect,
            self.frame,
            self.no_follow,
            self.images,
            self.deleted,
            self.alt_text,
            self.mention,
        ]
    }
}

/// One hyperlink pointing at the queried URL (`GetBackLinkData`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacklinkDataItem {
    #[serde(rename(deserialize = "SourceURL"), deserialize_with = "lenient_string")]
    pub source_url: String,
    #[serde(rename(deserialize = "TargetURL"), deserialize_with = "lenient_string")]
    pub target_url: String,
    #[serde(rename(deserialize = "AnchorText"), deserialize_with = "lenient_string")]
    pub anchor_text: String,
    #[serde(rename(deserialize = "Date"), deserialize_with = "lenient_string")]
    pub discovered_date: String,
    #[serde(
        rename(deserialize = "FirstIndexedDate"),
        deserialize_with = "lenient_string"
    )]
    pub first_indexed_date: String,
    #[serde(rename(deserialize = "LastSeenDate"), deserialize_with = "lenient_string")]
    pub last_seen_date: String,
    #[serde(flatten)]
    pub flags: BacklinkFlags,
    #[serde(
        rename(deserialize = "SourceCitationFlow"),
        deserialize_with = "lenient_i64"
    )]
    pub source_citation_flow: i64,
    #[serde(rename(deserialize = "SourceTrustFlow"), deserialize_with = "lenient_i64")]
    pub source_trust_flow: i64,
    #[serde(
        rename(deserialize = "SourceTopicalTrustFlow_Topic_0"),
        deserialize_with = "lenient_string"
    )]
    pub source_topical_trust_flow_topic_0: String,
    #[serde(
        rename(deserialize = "SourceTopicalTrustFlow_Value_0"),
        deserialize_with = "lenient_i64"
    )]
    pub source_topical_trust_flow_value_0: i64,
}

/// One referring domain aggregate (`GetRefDomains`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefDomainItem {
    #[serde(rename(deserialize = "Position"), deserialize_with = "lenient_i64")]
    pub position: i64,
    #[serde(rename(deserialize = "Domain"), deserialize_with = "lenient_string")]
    pub domain: String,
    #[serde(rename(deserialize = "MatchedLinks"), deserialize_with = "lenient_i64")]
    pub matched_links: i64,
    #[serde(rename(deserialize = "RefDomains"), deserialize_with = "lenient_i64")]
    pub ref_domains: i64,
    #[serde(rename(deserialize = "ExtBackLinks"), deserialize_with = "lenient_i64")]
    pub ext_backlinks: i64,
    #[serde(rename(deserialize = "AlexaRank"), deserialize_with = "lenient_string")]
    pub alexa_rank: String,
    #[serde(rename(deserialize = "Matches"), deserialize_with = "lenient_i64")]
    pub matches: i64,
    #[serde(rename(deserialize = "IP"), deserialize_with = "lenient_string")]
    pub ip: String,
    #[serde(rename(deserialize = "SubNet"), deserialize_with = "lenient_string")]
    pub subnet: String,
    #[serde(rename(deserialize = "CountryCode"), deserialize_with = "lenient_string")]
    pub country_code: String,
    #[serde(rename(deserialize = "TrustFlow"), deserialize_with = "lenient_i64")]
    pub trust_flow: i64,
    #[serde(rename(deserialize = "CitationFlow"), deserialize_with = "lenient_i64")]
    pub citation_flow: i64,
    #[serde(
        rename(deserialize = "TopicalTrustFlow_Topic_0"),
        deserialize_with = "lenient_string"
    )]
    pub topical_trust_flow_topic_0: String,
    #[serde(
        rename(deserialize = "TopicalTrustFlow_Value_0"),
        deserialize_with = "lenient_i64"
    )]
    pub topical_trust_flow_value_0: i64,
    #[serde(
        rename(deserialize = "LastSuccessfulCrawl"),
        deserialize_with = "lenient_string"
    )]
    pub last_successful_crawl: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorTextItem {
    #[serde(rename(deserialize = "AnchorText"), deserialize_with = "lenient_string")]
    pub anchor_text: String,
    #[serde(rename(deserialize = "RefDomains"), deserialize_with = "lenient_i64")]
    pub ref_domains: i64,
    #[serde(rename(deserialize = "TotalLinks"), deserialize_with = "lenient_i64")]
    pub total_links: i64,
    #[serde(rename(deserialize = "NoFollowLinks"), deserialize_with = "lenient_i64")]
    pub no_follow_links: i64,
}

/// `GetAnchorText` table headers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AnchorTextHeaders {
    #[serde(rename = "TotalBackLinks", deserialize_with = "lenient_i64")]
    pub total_backlinks: i64,
    #[serde(rename = "TotalRefDomains", deserialize_with = "lenient_i64")]
    pub total_ref_domains: i64,
}

/// Anchor text distribution with its totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorTextReport {
    pub total_backlinks: i64,
    pub total_ref_domains: i64,
    pub anchors: Vec<AnchorTextItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicItem {
    #[serde(rename(deserialize = "Topic"), deserialize_with = "lenient_string")]
    pub topic: String,
    #[serde(rename(deserialize = "RefDomains"), deserialize_with = "lenient_i64")]
    pub ref_domains: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopPageItem {
    #[serde(rename(deserialize = "URL"), deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(rename(deserialize = "TrustFlow"), deserialize_with = "lenient_i64")]
    pub trust_flow: i64,
    #[serde(rename(deserialize = "CitationFlow"), deserialize_with = "lenient_i64")]
    pub citation_flow: i64,
    #[serde(rename(deserialize = "RefDomains"), deserialize_with = "lenient_i64")]
    pub ref_domains: i64,
    #[serde(rename(deserialize = "RefIPs"), deserialize_with = "lenient_i64")]
    pub ref_ips: i64,
    #[serde(
        rename(deserialize = "TopicalTrustFlow_Topic_0"),
        deserialize_with = "lenient_string"
    )]
    pub topical_trust_flow_topic_0: String,
    #[serde(rename(deserialize = "Keywords"), deserialize_with = "lenient_i64")]
    pub keywords: i64,
    #[serde(
        rename(deserialize = "LastCrawlResult"),
        deserialize_with = "lenient_string"
    )]
    pub last_crawl_result: String,
    #[serde(rename(deserialize = "Date"), deserialize_with = "lenient_string")]
    pub date: String,
}

/// A backlink gained or lost recently (`GetNewLostBackLinks`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewLostBacklinkItem {
    #[serde(rename(deserialize = "SourceURL"), deserialize_with = "lenient_string")]
    pub source_url: String,
    #[serde(rename(deserialize = "TargetURL"), deserialize_with = "lenient_string")]
    pub target_url: String,
    #[serde(rename(deserialize = "AnchorText"), deserialize_with = "lenient_string")]
    pub anchor_text: String,
    #[serde(rename(deserialize = "Date"), deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(flatten)]
    pub flags: BacklinkFlags,
    #[serde(rename(deserialize = "LastSeenDate"), deserialize_with = "lenient_string")]
    pub last_seen_date: String,
    #[serde(rename(deserialize = "DateLost"), deserialize_with = "lenient_string")]
    pub date_lost: String,
    #[serde(rename(deserialize = "ReasonLost"), deserialize_with = "lenient_string")]
    pub reason_lost: String,
    #[serde(rename(deserialize = "SourceTrustFlow"), deserialize_with = "lenient_i64")]
    pub source_trust_flow: i64,
    #[serde(
        rename(deserialize = "SourceCitationFlow"),
        deserialize_with = "lenient_i64"
    )]
    pub source_citation_flow: i64,
}

impl NewLostBacklinkItem {
    /// A lost link carries a non-empty `DateLost`.
    pub fn is_lost(&self) -> bool {
        !self.date_lost.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedDomainItem {
    #[serde(rename(deserialize = "Domain"), deserialize_with = "lenient_string")]
    pub domain: String,
    #[serde(rename(deserialize = "IPAddress"), deserialize_with = "lenient_string")]
    pub ip_address: String,
    #[serde(rename(deserialize = "RefDomains"), deserialize_with = "lenient_i64")]
    pub ref_domains: i64,
    #[serde(rename(deserialize = "ExtBackLinks"), deserialize_with = "lenient_i64")]
    pub ext_backlinks: i64,
    #[serde(rename(deserialize = "CitationFlow"), deserialize_with = "lenient_i64")]
    pub citation_flow: i64,
    #[serde(rename(deserialize = "TrustFlow"), deserialize_with = "lenient_i64")]
    pub trust_flow: i64,
    #[serde(
        rename(deserialize = "TopicalTrustFlow_Topic_0"),
        deserialize_with = "lenient_string"
    )]
    pub topical_trust_flow_topic_0: String,
    #[serde(
        rename(deserialize = "TopicalTrustFlow_Value_0"),
        deserialize_with = "lenient_i64"
    )]
    pub topical_trust_flow_value_0: i64,
}

/// `DomainsOnIP` table headers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct HostedDomainsHeaders {
    #[serde(rename = "IP", deserialize_with = "lenient_string")]
    pub ip: String,
}

/// Domains hosted next to the queried domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedDomains {
    pub domains_on_ip: Vec<HostedDomainItem>,
    pub domains_on_subnet: Vec<HostedDomainItem>,
    pub recommended_ip: String,
    pub current_ip: String,
}

/// Snapshot of the provider account's remaining quota.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionInfo {
    #[serde(rename(deserialize = "Starts"), deserialize_with = "lenient_string")]
    pub starts: String,
    #[serde(rename(deserialize = "Expires"), deserialize_with = "lenient_string")]
    pub expires: String,
    #[serde(
        rename(deserialize = "IndexItemInfoResUnits"),
        deserialize_with = "lenient_i64"
    )]
    pub index_item_info_units: i64,
    #[serde(rename(deserialize = "RetrievalResUnits"), deserialize_with = "lenient_i64")]
    pub retrieval_units: i64,
    #[serde(rename(deserialize = "AnalysisResUnits"), deserialize_with = "lenient_i64")]
    pub analysis_units: i64,
    #[serde(
        rename(deserialize = "AdvancedReportsRemaining"),
        deserialize_with = "lenient_i64"
    )]
    pub advanced_reports_remaining: i64,
    #[serde(
        rename(deserialize = "StandardReportsRemaining"),
        deserialize_with = "lenient_i64"
    )]
    pub standard_reports_remaining: i64,
    #[serde(
        rename(deserialize = "StandardReportBacklinksShown"),
        deserialize_with = "lenient_i64"
    )]
    pub standard_report_backlinks_shown: i64,
    #[serde(
        rename(deserialize = "DetailedReportsPerPeriodRemaining"),
        deserialize_with = "lenient_i64"
    )]
    pub detailed_reports_per_period_remaining: i64,
}

/// Credits consumed between two subscription snapshots (positive = spent).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CreditUsage {
    pub index_item_info_units: i64,
    pub retrieval_units: i64,
    pub analysis_units: i64,
    pub advanced_reports: i64,
    pub standard_reports: i64,
    pub detailed_reports: i64,
}

impl CreditUsage {
    pub fn is_empty(&self) -> bool {
        *self == CreditUsage::default()
    }
}

impl SubscriptionInfo {
    /// Credits spent since `earlier` was taken.
    pub fn usage_since(&self, earlier: &SubscriptionInfo) -> CreditUsage {
        CreditUsage {
            index_item_info_units: earlier
                .index_item_info_units
                .saturating_sub(self.index_item_info_units),
            retrieval_units: earlier.retrieval_units.saturating_sub(self.retrieval_units),
            analysis_units: earlier.analysis_units.saturating_sub(self.analysis_units),
            advanced_reports: earlier
                .advanced_reports_remaining
                .saturating_sub(self.advanced_reports_remaining),
            standard_reports: earlier
                .standard_reports_remaining
                .saturating_sub(self.standard_reports_remaining),
            detailed_reports: earlier
                .detailed_reports_per_period_remaining
                .saturating_sub(self.detailed_reports_per_period_remaining),
        }
    }
}
