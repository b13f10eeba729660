//! Error type definitions.
//!
//! Provider errors are the only errors a report caller must handle.
//! Enrichment errors are collected per domain into an `EnrichmentReport`.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A stored JSON column could not be encoded or decoded.
    #[error("Stored JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Failure of a single provider report call.
///
/// Every variant carries the upstream message so the caller can show it as is.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network failure, timeout, or a body that could not be read.
    #[error("Majestic API error: {0}")]
    Transport(#[from] ReqwestError),

    /// The provider answered with a non-success HTTP status.
    #[error("Majestic API error: HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        message: String,
    },

    /// The provider answered but the envelope `Code` was not `OK`.
    #[error("Majestic API error: {code}: {message}")]
    Api {
        /// Envelope `Code`
        code: String,
        /// Envelope `ErrorMessage`
        message: String,
    },

    /// The response body or one of its tables did not have the expected shape.
    #[error("Majestic API error: malformed {context}: {source}")]
    Decode {
        /// Which part of the response failed to decode
        context: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// A data table the report needs was missing from `DataTables`.
    #[error("Majestic API error: response has no `{0}` table")]
    MissingTable(String),
}

impl ProviderError {
    /// Returns `true` when the provider itself rejected the request (as opposed
    /// to a network failure or malformed response).
    pub fn is_rejection(&self) -> bool {
        matches!(self, ProviderError::Api { .. } | ProviderError::Http { .. })
    }
}

/// Failure to enrich and persist one domain.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    /// No domain could be extracted from the requested URL.
    #[error("could not extract a domain from `{url}`")]
    InvalidUrl {
        /// Requested URL
        url: String,
    },

    /// DNS resolution failed for the domain.
    #[error("DNS lookup failed for {domain}: {message}")]
    DnsLookup {
        /// Domain that was being resolved
        domain: String,
        /// Resolver message
        message: String,
    },

    /// Reading or writing the metrics row failed.
    #[error("storing metrics failed: {0}")]
    Database(#[from] DatabaseError),
}

/// Coarse category of an [`EnrichmentError`], used for counting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum EnrichmentErrorKind {
    InvalidUrl,
    DnsLookup,
    Database,
}

impl EnrichmentError {
    pub fn kind(&self) -> EnrichmentErrorKind {
        match self {
            EnrichmentError::InvalidUrl { .. } => EnrichmentErrorKind::InvalidUrl,
            EnrichmentError::DnsLookup { .. } => EnrichmentErrorKind::DnsLookup,
            EnrichmentError::Database(_) => EnrichmentErrorKind::Database,
        }
    }
}

impl EnrichmentErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentErrorKind::InvalidUrl => "invalid URL",
            EnrichmentErrorKind::DnsLookup => "DNS lookup",
            EnrichmentErrorKind::Database => "database",
        }
    }
}

impl std::fmt::Display for EnrichmentErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
