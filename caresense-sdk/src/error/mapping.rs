//! Error mapping for backend HTTP responses
//!
//! This module provides mapping functions to convert error responses from
//! the triage and directory backends to our normalized ServiceError type.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, ServiceError};
use crate::util::truncate_string;

/// Longest body excerpt carried into an error message
const MAX_BODY_EXCERPT: usize = 100;

/// Extract a human-readable message from a JSON error body.
///
/// Django REST framework answers with `{"detail": ...}`; other layers use
/// `message` or `error`, sometimes nested as `{"error": {"message": ...}}`.
pub fn extract_error_message(json: &Value) -> Option<String> {
    for key in ["detail", "message", "error"] {
        match json.get(key) {
            Some(Value::String(message)) if !message.trim().is_empty() => {
                return Some(message.clone());
            }
            Some(nested @ Value::Object(_)) => {
                if let Some(message) = extract_error_message(nested) {
                    return Some(message);
                }
            }
            _ => {}
        }
    }

    None
}

/// Map an HTTP error response to a ServiceError
pub fn map_http_error(
    status: StatusCode,
    body: &str,
    context: &mut ErrorContext,
) -> ServiceError {
    context.status_code = Some(status.as_u16());
    context.add("category", classify_http_error(status));

    // Try to parse as JSON first
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(message) = extract_error_message(&json) {
            return ServiceError::service(status.as_u16(), message);
        }
    }

    // Fallback to status-based message
    let message = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, truncate_string(body.trim(), MAX_BODY_EXCERPT))
    };

    ServiceError::service(status.as_u16(), message)
}

/// Helper function to classify HTTP errors by category
pub fn classify_http_error(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "validation",
        401 => "authentication",
        403 => "authorization",
        404 => "not_found",
        408 => "timeout",
        429 => "rate_limit",
        500..=599 => "server",
        _ => "unknown",
    }
}
