//! Two-stage ingest: fetch & map, then persist.
//!
//! [`RankIngest`] runs a report through any [`MajesticReports`] implementation
//! and, for the reports that feed the domain metrics table, runs the
//! persistence stage afterwards. The persistence outcome travels next to the
//! data; it never turns a successful report into an error.

use std::sync::Arc;

use log::warn;
use sqlx::SqlitePool;

use crate::dns::HostResolver;
use crate::enrichment::{
    enrich_index_items, persist_ref_domains, EnrichmentReport, RefDomainPersistReport,
};
use crate::error_handling::{EnrichmentError, ProviderError};
use crate::provider::{Freshness, IndexItemInfo, MajesticReports, Page, RefDomainItem};

/// Report data together with what the persistence stage did with it.
#[derive(Debug)]
pub struct IngestOutcome<T, P> {
    pub data: T,
    pub persistence: P,
}

pub struct RankIngest<C> {
    client: C,
    pool: SqlitePool,
    resolver: Arc<dyn HostResolver>,
}

impl<C: MajesticReports> RankIngest<C> {
    pub fn new(client: C, pool: SqlitePool, resolver: Arc<dyn HostResolver>) -> Self {
        Self {
            client,
            pool,
            resolver,
        }
    }

    /// The report client, for reports that have no persistence stage.
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Fetches index info for `urls` and stores the rows of bare root domains.
    pub async fn index_item_info(
        &self,
        urls: &[String],
        freshness: Freshness,
    ) -> Result<IngestOutcome<Vec<IndexItemInfo>, EnrichmentReport>, ProviderError> {
        let data = self.client.index_item_info(urls, freshness).await?;
        let persistence = enrich_index_items(&self.pool, self.resolver.as_ref(), urls, &data).await;
        Ok(IngestOutcome { data, persistence })
    }

    /// Fetches referring domains and stores the ones not stored yet.
    pub async fn ref_domains(
        &self,
        domains: &[String],
        freshness: Freshness,
        page: Page,
    ) -> Result<
        IngestOutcome<Vec<RefDomainItem>, Result<RefDomainPersistReport, EnrichmentError>>,
        ProviderError,
    > {
        let data = self.client.ref_domains(domains, freshness, page).await?;
        let persistence = persist_ref_domains(&self.pool, &data).await;
        if let Err(ref e) = persistence {
            warn!("Storing referring domains failed: {e}");
        }
        Ok(IngestOutcome { data, persistence })
    }
}
