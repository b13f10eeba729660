//! Domain enrichment and persistence.
//!
//! Turns provider index rows into stored per-domain metric rows. Each
//! `(url, result)` pair is handled independently and concurrently; the outcome
//! of every pair lands in an [`EnrichmentReport`] instead of being logged and
//! dropped, so one bad domain never hides the others.

mod report;

use futures::future::join_all;
use log::debug;
use sqlx::SqlitePool;

use crate::dns::HostResolver;
use crate::domain::{
    calculate_percentage, calculate_subnet, extract_domain_from_url, is_root_domain,
};
use crate::error_handling::EnrichmentError;
use crate::provider::{IndexItemInfo, RefDomainItem};
use crate::storage::{self, now_ms, DomainMetrics};

pub use report::{
    EnrichedDomain, EnrichmentFailure, EnrichmentReport, EnrichmentSummary, FailureSummary,
    RefDomainPersistReport, SkipReason, Skipped,
};

enum Outcome {
    Stored(EnrichedDomain),
    Failed(EnrichmentError),
    Skipped(SkipReason),
}

/// Enriches and stores the index rows of `urls`.
///
/// `results[i]` is the provider row for `urls[i]`; missing trailing rows count
/// as "no result".
pub async fn enrich_index_items<R>(
    pool: &SqlitePool,
    resolver: &R,
    urls: &[String],
    results: &[IndexItemInfo],
) -> EnrichmentReport
where
    R: HostResolver + ?Sized,
{
    let tasks = urls
        .iter()
        .enumerate()
        .map(|(index, url)| enrich_one(pool, resolver, url, results.get(index)));
    let outcomes = join_all(tasks).await;

    let mut report = EnrichmentReport::default();
    for (url, outcome) in urls.iter().zip(outcomes) {
        match outcome {
            Outcome::Stored(enriched) => report.succeeded.push(enriched),
            Outcome::Failed(error) => report.failed.push(EnrichmentFailure {
                url: url.clone(),
                error,
            }),
            Outcome::Skipped(reason) => report.skipped.push(Skipped {
                url: url.clone(),
                reason,
            }),
        }
    }
    report.log_summary();
    report
}

async fn enrich_one<R>(
    pool: &SqlitePool,
    resolver: &R,
    url: &str,
    result: Option<&IndexItemInfo>,
) -> Outcome
where
    R: HostResolver + ?Sized,
{
    let Some(result) = result else {
        return Outcome::Skipped(SkipReason::NoResult);
    };

    // Hostnames are case-insensitive; rows are keyed by the lowercase form
    let domain = match extract_domain_from_url(url) {
        Ok(domain) => domain.to_ascii_lowercase(),
        Err(_) => {
            return Outcome::Failed(EnrichmentError::InvalidUrl {
                url: url.to_string(),
            })
        }
    };

    if !is_root_domain(url) {
        debug!("Skipping {url}: not a root domain");
        return Outcome::Skipped(SkipReason::NotRootDomain);
    }

    match store_domain(pool, resolver, url, domain, result).await {
        Ok(enriched) => Outcome::Stored(enriched),
        Err(error) => Outcome::Failed(error),
    }
}

async fn store_domain<R>(
    pool: &SqlitePool,
    resolver: &R,
    url: &str,
    domain: String,
    result: &IndexItemInfo,
) -> Result<EnrichedDomain, EnrichmentError>
where
    R: HostResolver + ?Sized,
{
    let ip = resolver
        .resolve_ip(&domain)
        .await
        .map_err(|e| EnrichmentError::DnsLookup {
            domain: domain.clone(),
            message: e.to_string(),
        })?
        .to_string();

    let subnet = calculate_subnet(&ip);
    let percentage = calculate_percentage(result.trust_flow, result.citation_flow);
    let metrics = DomainMetrics {
        domain: domain.clone(),
        ext_backlinks: result.ext_backlinks,
        ref_domains: result.ref_domains,
        alexa_rank: result.ac_rank.clone(),
        ip: ip.clone(),
        subnet: subnet.clone(),
        trust_flow: result.trust_flow,
        citation_flow: result.citation_flow,
        percentage,
        topic: result.topical_trust_flow_topic_0.clone(),
        topic_value: result.topical_trust_flow_value_0,
    };

    let outcome = storage::upsert_domain_index(pool, &metrics, now_ms()).await?;
    debug!("Stored {domain} ({outcome:?})");

    Ok(EnrichedDomain {
        url: url.to_string(),
        domain,
        ip,
        subnet,
        percentage,
        outcome,
    })
}

/// Stores referring domains that are not stored yet, using the provider's own
/// IP and subnet. Existing rows are left untouched.
pub async fn persist_ref_domains(
    pool: &SqlitePool,
    items: &[RefDomainItem],
) -> Result<RefDomainPersistReport, EnrichmentError> {
    let rows: Vec<DomainMetrics> = items
        .iter()
        .filter(|item| !item.domain.is_empty())
        .map(|item| DomainMetrics {
            domain: item.domain.to_ascii_lowercase(),
            ext_backlinks: item.ext_backlinks,
            ref_domains: item.ref_domains,
            alexa_rank: item.alexa_rank.clone(),
            ip: item.ip.clone(),
            subnet: item.subnet.clone(),
            trust_flow: item.trust_flow,
            citation_flow: item.citation_flow,
            percentage: calculate_percentage(item.trust_flow, item.citation_flow),
            topic: item.topical_trust_flow_topic_0.clone(),
            topic_value: item.topical_trust_flow_value_0,
        })
        .collect();

    let inserted = storage::insert_many_skip_duplicates(pool, &rows, now_ms()).await?;
    let report = RefDomainPersistReport {
        inserted,
        skipped_duplicates: rows.len() as u64 - inserted,
    };
    debug!(
        "Referring domains: {} inserted, {} already stored",
        report.inserted, report.skipped_duplicates
    );
    Ok(report)
}
