//! # CareSense SDK
//!
//! Client-side core of the CareSense AI symptom-triage assistant.
//!
//! This crate provides:
//!
//! - A triage client that submits free-text symptoms and normalizes the
//!   backend's inconsistent reply shapes into one canonical result
//! - A doctor directory client and an in-memory search engine (category
//!   taxonomy, free-text filter, preview/full list policy, selection)
//! - The intake flow and user-facing notifications built on top of them
//! - Error handling and configuration management utilities
//!
//! ## Architecture
//!
//! The SDK is designed around the following key abstractions:
//!
//! - `TriageService` / `DirectoryService`: the backend seams, implemented by
//!   `TriageClient` and `DirectoryClient` and mocked in tests
//! - `RequestExecutor`: JSON-over-HTTP transport shared by both clients
//! - `DirectorySearchEngine`: filtered, size-limited views over fetched records
//! - `IntakeController`: validate, submit and keep the latest triage result
//! - `ServiceError`: error taxonomy (validation, offline, failure status, other)

// Re-export core modules
pub mod core;
pub use core::{ClientBuilder, DirectoryService, RequestExecutor, ServiceClient, TriageService};

// Re-export service-specific modules
pub mod services;
pub use services::{directory, triage};
pub use services::directory::{DirectoryClient, DirectoryRecord, DoctorQuery, RecordId};
pub use services::triage::{SymptomReport, TriageClient, TriageResult};

// Directory search engine
pub mod search;
pub use search::{CategoryTag, DirectorySearchEngine, DirectoryView, EngineStatus, RefreshOutcome, Taxonomy, ViewMode};

pub mod intake;
pub use intake::IntakeController;

pub mod notification;
pub use notification::{Notification, NotificationLevel};

pub mod identity;
pub use identity::{CurrentUser, IdentityProvider, LocalIdentityProvider, Session};

// Re-export error handling
pub mod error;
pub use error::{ErrorContext, ErrorKind, Result, ServiceError};

// Re-export configuration management
pub mod config;
pub use config::{ApiConfig, ConfigProvider, ServiceConfig};

// Utility module for common functionality
mod util;

#[cfg(test)]
mod tests;

/// Create a new default client builder
pub fn client() -> core::ClientBuilder {
    core::ClientBuilder::new()
}

/// Create a triage client from environment configuration
pub fn triage_client() -> Result<TriageClient> {
    TriageClient::from_env()
}

/// Create a directory client from environment configuration
pub fn directory_client() -> Result<DirectoryClient> {
    DirectoryClient::from_env()
}
