//! Majestic backlink-intelligence API client.
//!
//! [`MajesticClient`] sends commands over HTTP; the [`MajesticReports`] trait maps
//! the provider's tabular JSON responses into the typed records in [`types`].
//! Multi-target backlink lookups go through the batch coordinator; quota
//! snapshots can be reused with [`SubscriptionCache`].

mod client;
pub(crate) mod decode;
mod envelope;
mod reports;
mod request;
mod subscription;
pub mod types;

pub use client::MajesticClient;
pub use envelope::{DataTable, Envelope, CODE_OK};
pub use reports::MajesticReports;
pub use request::{BacklinkQuery, Params, Report};
pub use subscription::SubscriptionCache;
pub use types::{
    AnchorTextItem, AnchorTextReport, BacklinkDataItem, BacklinkFlags, CreditUsage, Freshness,
    HostedDomainItem, HostedDomains, IndexItemInfo, NewLostBacklinkItem, Page, RefDomainItem,
    SubscriptionInfo, TopPageItem, TopicItem, TopicalTrustFlow,
};
