//! Doctor directory client implementation
//!
//! Fetches the directory records from the backend. Filtering parameters are
//! passed through, but the backend may ignore them; the search engine in
//! [`crate::search`] filters the returned records itself.

mod models;
pub use models::*;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::config::{ApiConfig, DEFAULT_PROVIDER};
use crate::core::{DirectoryService, RequestExecutor, ServiceClient};
use crate::error::Result;
use crate::services::common::HttpExecutor;

/// Doctor directory client
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    /// HTTP executor bound to the directory service
    executor: HttpExecutor,
}

impl DirectoryClient {
    /// Create a directory client from `CARESENSE_*` environment configuration
    pub fn from_env() -> Result<Self> {
        let config = ApiConfig::from_provider(&**DEFAULT_PROVIDER)?;
        Self::new_with_config(config)
    }

    /// Create a directory client with custom configuration
    pub fn new_with_config(config: ApiConfig) -> Result<Self> {
        Ok(Self {
            executor: HttpExecutor::new("directory", config)?,
        })
    }

    /// Create a builder for the directory client
    pub fn builder() -> DirectoryClientBuilder {
        DirectoryClientBuilder::default()
    }

    /// Backend configuration in use
    pub fn config(&self) -> &ApiConfig {
        self.executor.config()
    }
}

impl ServiceClient for DirectoryClient {
    fn name(&self) -> &str {
        self.executor.service()
    }

    fn base_url(&self) -> &str {
        &self.executor.config().base_url
    }
}

#[async_trait]
impl DirectoryService for DirectoryClient {
    async fn fetch_doctors(&self, query: &DoctorQuery) -> Result<Vec<DirectoryRecord>> {
        let params = query.to_query_params();
        debug!("Fetching doctors with {} filter parameter(s)", params.len());

        let endpoint = self.config().doctors_endpoint.clone();
        let query_params = if params.is_empty() { None } else { Some(params) };

        let payload = self
            .executor
            .get_json(&endpoint, query_params)
            .await
            .map_err(|e| {
                warn!("Doctor directory fetch failed: {}", e);
                e
            })?;

        let records = decode_directory_payload(payload).map_err(|e| {
            warn!("Doctor directory response could not be decoded: {}", e);
            e
        })?;

        info!("Fetched {} doctor record(s)", records.len());
        Ok(records)
    }
}

/// Builder for the directory client
#[derive(Debug, Default)]
pub struct DirectoryClientBuilder {
    /// Base URL for the API
    base_url: Option<String>,

    /// Request timeout in milliseconds
    timeout_ms: Option<u64>,

    /// Endpoint path override
    endpoint: Option<String>,
}

impl DirectoryClientBuilder {
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

    /// Set the doctors endpoint path
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Build the directory client
    pub fn build(self) -> Result<DirectoryClient> {
        let mut config = ApiConfig::from_provider(&**DEFAULT_PROVIDER).unwrap_or_default();

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }

        if let Some(endpoint) = self.endpoint {
            config.doctors_endpoint = endpoint;
        }

        crate::config::ServiceConfig::validate(&config)?;

        DirectoryClient::new_with_config(config)
    }
}
