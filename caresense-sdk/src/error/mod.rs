//! Error handling for the CareSense SDK
//!
//! This module provides the error taxonomy shared by the triage and
//! directory clients:
//! - Categorizes failures the way the UI needs to report them
//!   (validation, backend offline, backend failure status, anything else)
//! - Adds rich context to errors for better debugging
//! - Maps HTTP error responses to normalized formats
//! - Provides convenient Result type alias

use std::fmt;
use std::collections::HashMap;
use thiserror::Error;

pub mod mapping;

/// Result type for CareSense SDK operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Main error type for the CareSense SDK
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Caller input rejected before any request was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// A submission was refused because another is still outstanding
    #[error("In progress: {0}")]
    InProgress(String),

    /// The backend could not be reached at all
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The backend answered with a non-success status
    #[error("Service error ({status}): {message}")]
    Service {
        status: u16,
        message: String,
    },

    /// Any other transport or parsing failure
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Errors with additional context
    #[error("{inner}")]
    WithContext {
        inner: Box<ServiceError>,
        context: ErrorContext,
    },
}

/// Coarse classification of a [`ServiceError`], independent of context wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    InProgress,
    ServiceUnavailable,
    Service,
    RequestFailed,
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::InProgress => "in_progress",
            ErrorKind::ServiceUnavailable => "service_unavailable",
            ErrorKind::Service => "service",
            ErrorKind::RequestFailed => "request_failed",
            ErrorKind::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    /// Create an error for a request refused while another is in flight
    pub fn in_progress(message: impl Into<String>) -> Self {
        ServiceError::InProgress(message.into())
    }

    /// Create a service unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        ServiceError::ServiceUnavailable(message.into())
    }

    /// Create an error for a non-success HTTP status
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        ServiceError::Service {
            status,
            message: message.into(),
        }
    }

    /// Create a generic request failure
    pub fn request_failed(message: impl Into<String>) -> Self {
        ServiceError::RequestFailed(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        ServiceError::Configuration(message.into())
    }

    /// Add context to an existing error
    pub fn with_context(self, context: ErrorContext) -> Self {
        ServiceError::WithContext {
            inner: Box::new(self),
            context,
        }
    }

    /// Add a single context key/value to an existing error
    pub fn with_context_value(self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        let mut context = ErrorContext::new();
        context.add(key, value);
        self.with_context(context)
    }

    /// The error with all context layers removed
    pub fn root(&self) -> &ServiceError {
        match self {
            ServiceError::WithContext { inner, .. } => inner.root(),
            other => other,
        }
    }

    /// Classification of the underlying error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::InProgress(_) => ErrorKind::InProgress,
            ServiceError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            ServiceError::Service { .. } => ErrorKind::Service,
            ServiceError::RequestFailed(_) => ErrorKind::RequestFailed,
            ServiceError::Configuration(_) => ErrorKind::Configuration,
            ServiceError::WithContext { inner, .. } => inner.kind(),
        }
    }

    /// Get the service name if available
    pub fn service_name(&self) -> Option<&str> {
        match self {
            ServiceError::WithContext { context, .. } => Some(&context.service),
            _ => None,
        }
    }

    /// Get the request ID if available
    pub fn request_id(&self) -> Option<&str> {
        match self {
            ServiceError::WithContext { inner, context } => {
                context.request_id.as_deref().or_else(|| inner.request_id())
            }
            _ => None,
        }
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ServiceError::Service { status, .. } => Some(*status),
            ServiceError::WithContext { inner, context } => {
                inner.status_code().or(context.status_code)
            }
            _ => None,
        }
    }

    /// Message of the underlying error without the category prefix
    pub fn detail(&self) -> &str {
        match self {
            ServiceError::Validation(message)
            | ServiceError::InProgress(message)
            | ServiceError::ServiceUnavailable(message)
            | ServiceError::RequestFailed(message)
            | ServiceError::Configuration(message) => message.as_str(),
            ServiceError::Service { message, .. } => message.as_str(),
            ServiceError::WithContext { inner, .. } => inner.detail(),
        }
    }

    /// Check if the backend was unreachable
    pub fn is_unavailable(&self) -> bool {
        self.kind() == ErrorKind::ServiceUnavailable
    }
}

/// Error context information
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Service that generated the error
    pub service: String,

    /// Request timestamp
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,

    /// HTTP status code if applicable
    pub status_code: Option<u16>,

    /// Request ID for tracing
    pub request_id: Option<String>,

    /// Endpoint that was called
    pub endpoint: Option<String>,

    /// Additional context data
    pub data: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            service: "unknown".to_string(),
            timestamp: Some(chrono::Utc::now()),
            status_code: None,
            request_id: None,
            endpoint: None,
            data: HashMap::new(),
        }
    }
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new error context for a specific service
    pub fn for_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            ..Self::default()
        }
    }

    /// Add an HTTP status code
    pub fn status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Add a request ID
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Add an endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Add a context value
    pub fn add<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: fmt::Display,
    {
        self.data.insert(key.into(), value.to_string());
    }

    /// Add a context value and return self (builder pattern)
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: fmt::Display,
    {
        self.add(key, value);
        self
    }
}

/// Convert reqwest errors to ServiceError
impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        let context = ErrorContext::for_service("http_client");

        let service_error = if err.is_connect() {
            ServiceError::unavailable(format!("Connection error: {}", err))
        } else if let Some(status) = err.status() {
            ServiceError::service(status.as_u16(), err.to_string())
        } else if err.is_timeout() {
            ServiceError::request_failed(format!("Request timed out: {}", err))
        } else if err.is_decode() {
            ServiceError::request_failed(format!("Response decode error: {}", err))
        } else {
            ServiceError::request_failed(format!("HTTP client error: {}", err))
        };

        // Add status code if available
        if let Some(status) = err.status() {
            service_error.with_context(context.status_code(status.as_u16()))
        } else {
            service_error.with_context(context)
        }
    }
}

/// Convert serde_json errors to ServiceError
impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::request_failed(format!("JSON error: {}", err))
            .with_context(ErrorContext::for_service("json"))
    }
}
