//! HTTP transport for the Majestic API.
//!
//! The client is stateless apart from its HTTP connection pool and an immutable
//! [`ProviderConfig`]. Every command is a single GET to the configured endpoint;
//! transport failures, non-2xx statuses and non-`OK` envelopes all come back as
//! [`ProviderError`]. Nothing is retried and nothing is persisted here.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use crate::config::{ProviderConfig, MAX_ERROR_BODY_CHARS};
use crate::error_handling::{InitializationError, ProviderError};

use super::envelope::Envelope;
use super::reports::MajesticReports;
use super::request::{Params, Report};

/// Client for the Majestic JSON API. Report methods come from [`MajesticReports`].
#[derive(Debug, Clone)]
pub struct MajesticClient {
    http: reqwest::Client,
    config: Arc<ProviderConfig>,
}

impl MajesticClient {
    /// Builds the HTTP client (timeout and user agent from `config`).
    pub fn new(config: ProviderConfig) -> Result<Self, InitializationError> {
        let http = crate::initialization::init_client(&config)?;
        Ok(Self::with_http_client(http, config))
    }

    /// Uses an already configured `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, config: ProviderConfig) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl MajesticReports for MajesticClient {
    async fn fetch(&self, report: Report, params: Params) -> Result<Envelope, ProviderError> {
        debug!("{report} request with {} parameters", params.len());

        let mut query = params.into_pairs();
        query.push(("cmd".to_string(), report.command().to_string()));
        query.push(("app_api_key".to_string(), self.config.api_key.clone()));

        let response = self
            .http
            .get(&self.config.base_url)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("{report} failed with HTTP {status}");
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let envelope = Envelope::parse(&body)?.check();
        if let Err(ref e) = envelope {
            warn!("{report} rejected: {e}");
        }
        envelope
    }
}
