//! Common utilities for backend clients
//!
//! This module provides the HTTP plumbing shared by the triage and
//! directory clients.

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::core::{ClientBuilder, RequestExecutor};
use crate::error::{ErrorContext, Result, ServiceError};
use crate::util::generate_request_id;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// UserAgent structure for identifying the client to the backend
#[derive(Debug, Clone)]
pub struct UserAgent {
    /// Application name
    pub app_name: String,

    /// Version string
    pub version: String,

    /// Optional extra info
    pub extra: Option<String>,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self {
            app_name: "CareSense".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            extra: Some("caresense-sdk".to_string()),
        }
    }
}

impl UserAgent {
    /// User agent for a named client component
    pub fn for_component(component: impl Into<String>) -> Self {
        Self {
            extra: Some(component.into()),
            ..Self::default()
        }
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_name, self.version)?;

        if let Some(ref extra) = self.extra {
            write!(f, " ({})", extra)?;
        }

        Ok(())
    }
}

/// Create error context for HTTP requests
pub fn create_error_context(
    service_name: &str,
    endpoint: &str,
    request_id: &str,
    status: Option<reqwest::StatusCode>,
) -> ErrorContext {
    let mut context = ErrorContext::for_service(service_name)
        .endpoint(endpoint)
        .request_id(request_id);

    if let Some(status_code) = status {
        context = context.status_code(status_code.as_u16());
    }

    context
}

/// Parse error response from HTTP response
pub async fn parse_error_response(mut context: ErrorContext, response: Response) -> ServiceError {
    let status = response.status();

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => format!("Failed to read error response: {}", e),
    };

    let error = crate::error::mapping::map_http_error(status, &body, &mut context);
    error.with_context(context)
}

/// Decode a success body as JSON. An empty body decodes as `null`.
pub fn decode_body(body: &str) -> std::result::Result<Value, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body)
}

/// JSON-over-HTTP executor bound to one backend service
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    /// Service name used in logs and error context
    service: String,

    /// HTTP client
    http_client: Client,

    /// Backend configuration
    config: ApiConfig,
}

impl HttpExecutor {
    /// Create an executor for a service, building the HTTP client from the config
    pub fn new(service: impl Into<String>, config: ApiConfig) -> Result<Self> {
        let service = service.into();
        let http_client = ClientBuilder::new()
            .timeout(config.timeout())
            .user_agent(UserAgent::for_component(format!("{}-client", service)).to_string())
            .build_http_client()?;

        Ok(Self::with_client(service, config, http_client))
    }

    /// Create an executor around an existing HTTP client
    pub fn with_client(service: impl Into<String>, config: ApiConfig, http_client: Client) -> Self {
        Self {
            service: service.into(),
            http_client,
            config,
        }
    }

    /// Service name
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Backend configuration
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Send a prepared request and decode its JSON body
    async fn send(&self, endpoint: &str, request_id: String, builder: RequestBuilder) -> Result<Value> {
        let start_time = Instant::now();

        let response = builder
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .send()
            .await
            .map_err(|e| {
                let context = create_error_context(&self.service, endpoint, &request_id, None);
                let error = ServiceError::from(e);
                warn!("{} request {} failed before a response: {}", self.service, request_id, error);
                error.with_context(context)
            })?;

        let status = response.status();
        let context = create_error_context(&self.service, endpoint, &request_id, Some(status));

        if !status.is_success() {
            let error = parse_error_response(context, response).await;
            warn!(
                "{} request {} returned {} after {:?}: {}",
                self.service,
                request_id,
                status.as_u16(),
                start_time.elapsed(),
                error
            );
            return Err(error);
        }

        let body = response.text().await.map_err(|e| {
            ServiceError::request_failed(format!("Failed to read response body: {}", e))
                .with_context(context.clone())
        })?;

        debug!(
            "{} request {} completed with {} in {:?} ({} bytes)",
            self.service,
            request_id,
            status.as_u16(),
            start_time.elapsed(),
            body.len()
        );

        decode_body(&body).map_err(|e| {
            ServiceError::request_failed(format!("Failed to parse response: {}", e))
                .with_context(context)
        })
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn get_json(&self, endpoint: &str, query_params: Option<HashMap<String, String>>) -> Result<Value> {
        let url = self.config.endpoint_url(endpoint);
        let request_id = generate_request_id();
        debug!("Sending request to {}: GET {} [{}]", self.service, url, request_id);

        let mut builder = self.http_client.get(&url);

        if let Some(params) = query_params {
            builder = builder.query(&params);
        }

        self.send(endpoint, request_id, builder).await
    }

    async fn post_json<T>(&self, endpoint: &str, body: &T) -> Result<Value>
    where
        T: Serialize + Send + Sync,
    {
        let url = self.config.endpoint_url(endpoint);
        let request_id = generate_request_id();
        debug!("Sending request to {}: POST {} [{}]", self.service, url, request_id);

        let builder = self.http_client.post(&url).json(body);

        self.send(endpoint, request_id, builder).await
    }
}
