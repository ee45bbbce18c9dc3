//! Core abstractions for the CareSense SDK
//!
//! This module provides the fundamental trait interfaces that the backend
//! clients implement or use:
//!
//! - `ServiceClient`: identity of a backend client (name, base URL)
//! - `RequestExecutor`: executes JSON requests over HTTP
//! - `TriageService`: the symptom triage seam consumed by the intake flow
//! - `DirectoryService`: the doctor directory seam consumed by the search engine
//! - `ClientBuilder`: builder pattern for the underlying HTTP client

pub mod builder;
pub use builder::ClientBuilder;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::services::directory::{DirectoryRecord, DoctorQuery};
use crate::services::triage::{SymptomReport, TriageResult};

/// Base trait for all backend clients
pub trait ServiceClient: Send + Sync {
    /// The client name/identifier
    fn name(&self) -> &str;

    /// The base URL for the service
    fn base_url(&self) -> &str;

    /// Service API version
    fn version(&self) -> &str {
        "v1"
    }
}

/// Trait responsible for executing JSON requests.
///
/// Bodies are returned as untyped JSON: the backends do not keep a stable
/// schema, so typing happens in the per-service normalization layer.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Execute a GET request
    async fn get_json(&self, endpoint: &str, query_params: Option<HashMap<String, String>>) -> Result<Value>;

    /// Execute a POST request with a JSON body
    async fn post_json<T>(&self, endpoint: &str, body: &T) -> Result<Value>
    where
        T: Serialize + Send + Sync;
}

/// Symptom triage backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TriageService: Send + Sync {
    /// Submit a validated symptom report and return the canonical result
    async fn submit_symptoms(&self, report: &SymptomReport) -> Result<TriageResult>;
}

/// Doctor directory backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Fetch the directory records, in the order the backend returns them
    async fn fetch_doctors(&self, query: &DoctorQuery) -> Result<Vec<DirectoryRecord>>;
}
