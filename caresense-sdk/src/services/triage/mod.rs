//! Triage client implementation
//!
//! This module provides the client for the AI triage endpoint. A submission
//! is a single POST with no retry; whatever shape the reply takes is
//! normalized into a [`TriageResult`].

mod models;
mod normalize;
pub use models::*;
pub use normalize::{normalize_triage_payload, ADVICE_ALIASES, CAUSES_ALIASES, URGENCY_ALIASES};

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::config::{ApiConfig, DEFAULT_PROVIDER};
use crate::core::{RequestExecutor, ServiceClient, TriageService};
use crate::error::Result;
use crate::services::common::HttpExecutor;
use crate::util::preview_for_logging;

/// Triage service client
#[derive(Debug, Clone)]
pub struct TriageClient {
    /// HTTP executor bound to the triage service
    executor: HttpExecutor,
}

impl TriageClient {
    /// Create a triage client from `CARESENSE_*` environment configuration
    pub fn from_env() -> Result<Self> {
        let config = ApiConfig::from_provider(&**DEFAULT_PROVIDER)?;
        Self::new_with_config(config)
    }

    /// Create a triage client with custom configuration
    pub fn new_with_config(config: ApiConfig) -> Result<Self> {
        Ok(Self {
            executor: HttpExecutor::new("triage", config)?,
        })
    }

    /// Create a builder for the triage client
    pub fn builder() -> TriageClientBuilder {
        TriageClientBuilder::default()
    }

    /// Backend configuration in use
    pub fn config(&self) -> &ApiConfig {
        self.executor.config()
    }
}

impl ServiceClient for TriageClient {
    fn name(&self) -> &str {
        self.executor.service()
    }

    fn base_url(&self) -> &str {
        &self.executor.config().base_url
    }
}

#[async_trait]
impl TriageService for TriageClient {
    async fn submit_symptoms(&self, report: &SymptomReport) -> Result<TriageResult> {
        info!(
            "Submitting symptoms for triage ({} chars): \"{}\"",
            report.text().chars().count(),
            preview_for_logging(report.text())
        );

        let request = TriageRequest::from(report);
        let endpoint = self.config().triage_endpoint.clone();

        let payload = self.executor.post_json(&endpoint, &request).await.map_err(|e| {
            warn!("Triage submission failed: {}", e);
            e
        })?;

        if !payload.is_object() {
            debug!("Triage reply is not a JSON object ({}), using defaults", payload);
        }

        let result = normalize_triage_payload(&payload);
        info!(
            "Triage completed: level=\"{}\", {} possible cause(s)",
            result.urgency_label,
            result.possible_causes.len()
        );

        Ok(result)
    }
}

/// Builder for the triage client
#[derive(Debug, Default)]
pub struct TriageClientBuilder {
    /// Base URL for the API
    base_url: Option<String>,

    /// Request timeout in milliseconds
    timeout_ms: Option<u64>,

    /// Endpoint path override
    endpoint: Option<String>,
}

impl TriageClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the timeout in seconds
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_ms = Some(seconds.saturating_mul(1000));
        self
    }

    /// Set the triage endpoint path
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Build the triage client
    pub fn build(self) -> Result<TriageClient> {
        // Start from the environment, then override with explicit values
        let mut config = ApiConfig::from_provider(&**DEFAULT_PROVIDER).unwrap_or_default();

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }

        if let Some(endpoint) = self.endpoint {
            config.triage_endpoint = endpoint;
        }

        crate::config::ServiceConfig::validate(&config)?;

        TriageClient::new_with_config(config)
    }
}
