//! Outcome of an enrichment pass.

use std::collections::HashMap;

use log::{info, warn};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::error_handling::{EnrichmentError, EnrichmentErrorKind};
use crate::storage::UpsertOutcome;

/// A domain whose metrics row was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedDomain {
    /// URL as requested
    pub url: String,
    pub domain: String,
    pub ip: String,
    pub subnet: String,
    pub percentage: i64,
    pub outcome: UpsertOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// The provider returned no row for this URL
    NoResult,
    /// Subdomains, paths and URLs with a scheme are never stored
    NotRootDomain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub url: String,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub struct EnrichmentFailure {
    pub url: String,
    pub error: EnrichmentError,
}

/// Per-domain results of one enrichment pass, in input order within each list.
#[derive(Debug, Default)]
pub struct EnrichmentReport {
    pub succeeded: Vec<EnrichedDomain>,
    pub failed: Vec<EnrichmentFailure>,
    pub skipped: Vec<Skipped>,
}

impl EnrichmentReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.skipped.len()
    }

    /// Number of failures per error kind, every kind present.
    pub fn failure_counts(&self) -> HashMap<EnrichmentErrorKind, usize> {
        let mut counts: HashMap<EnrichmentErrorKind, usize> =
            EnrichmentErrorKind::iter().map(|kind| (kind, 0)).collect();
        for failure in &self.failed {
            *counts.entry(failure.error.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub(crate) fn log_summary(&self) {
        info!(
            "Enrichment: {} stored, {} failed, {} skipped",
            self.succeeded.len(),
            self.failed.len(),
            self.skipped.len()
        );
        for failure in &self.failed {
            warn!("Enrichment of {} failed: {}", failure.url, failure.error);
        }
    }
}

/// Result of storing referring domains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefDomainPersistReport {
    pub inserted: u64,
    /// Rows whose domain was already stored
    pub skipped_duplicates: u64,
}

/// JSON view of a report, for printing.
#[derive(Debug, Serialize)]
pub struct EnrichmentSummary<'a> {
    pub succeeded: &'a [EnrichedDomain],
    pub failed: Vec<FailureSummary<'a>>,
    pub skipped: &'a [Skipped],
}

#[derive(Debug, Serialize)]
pub struct FailureSummary<'a> {
    pub url: &'a str,
    pub kind: String,
    pub error: String,
}

impl EnrichmentReport {
    pub fn summary(&self) -> EnrichmentSummary<'_> {
        EnrichmentSummary {
            succeeded: &self.succeeded,
            failed: self
                .failed
                .iter()
                .map(|failure| FailureSummary {
                    url: &failure.url,
                    kind: failure.error.kind().to_string(),
                    error: failure.error.to_string(),
                })
                .collect(),
            skipped: &self.skipped,
        }
    }
}
