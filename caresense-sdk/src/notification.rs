//! User-facing notifications
//!
//! Every network failure is converted into a [`Notification`] at the
//! component boundary; callers show it and carry on.

use std::fmt;

use serde::Serialize;

use crate::error::{ErrorKind, ServiceError};
use crate::search::{DirectoryView, EngineStatus};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Info => "info",
            NotificationLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// A toast-style message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: Option<String>,
}

pub const TRIAGE_SUCCESS_TITLE: &str = "Analysis complete";
pub const TRIAGE_SUCCESS_DESCRIPTION: &str =
    "CareSense AI has generated a structured triage suggestion based on your description.";
pub const EMPTY_SYMPTOMS_TITLE: &str = "Please describe your symptoms";
pub const IN_PROGRESS_TITLE: &str = "Analysis already in progress";
pub const IN_PROGRESS_DESCRIPTION: &str = "Please wait for the current analysis to finish.";
pub const OFFLINE_TITLE: &str = "Server offline";
pub const OFFLINE_DESCRIPTION: &str =
    "The CareSense AI backend is not reachable. Please make sure your backend server is running.";
pub const FAILURE_TITLE: &str = "Something went wrong";
pub const DIRECTORY_FAILURE_TITLE: &str = "Unable to load doctors. Please check your backend and try again.";
pub const NO_DOCTORS_TITLE: &str = "No doctors found for this search.";

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Successful triage submission
    pub fn triage_complete() -> Self {
        Self::new(NotificationLevel::Success, TRIAGE_SUCCESS_TITLE)
            .with_description(TRIAGE_SUCCESS_DESCRIPTION)
    }

    /// Failed triage submission
    pub fn from_triage_error(error: &ServiceError) -> Self {
        match error.kind() {
            ErrorKind::Validation => Self::new(NotificationLevel::Error, EMPTY_SYMPTOMS_TITLE),
            ErrorKind::InProgress => {
                Self::new(NotificationLevel::Info, IN_PROGRESS_TITLE).with_description(IN_PROGRESS_DESCRIPTION)
            }
            ErrorKind::ServiceUnavailable => {
                Self::new(NotificationLevel::Error, OFFLINE_TITLE).with_description(OFFLINE_DESCRIPTION)
            }
            _ => Self::new(NotificationLevel::Error, FAILURE_TITLE).with_description(failure_detail(error)),
        }
    }

    /// Failed directory fetch
    pub fn directory_failed() -> Self {
        Self::new(NotificationLevel::Error, DIRECTORY_FAILURE_TITLE)
    }

    /// Notification for the current directory state, if one applies
    pub fn for_directory(status: &EngineStatus, view: &DirectoryView) -> Option<Self> {
        match status {
            EngineStatus::Errored { .. } => Some(Self::directory_failed()),
            EngineStatus::Ready if view.is_empty() => Some(Self::new(NotificationLevel::Info, NO_DOCTORS_TITLE)),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.title)?;
        if let Some(ref description) = self.description {
            write!(f, ": {}", description)?;
        }
        Ok(())
    }
}

fn failure_detail(error: &ServiceError) -> String {
    match (error.kind(), error.status_code()) {
        (ErrorKind::Service, Some(status)) => format!("Backend returned {}: {}", status, error.detail()),
        _ => error.detail().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ViewMode;

    #[test]
    fn test_triage_error_notifications() {
        let n = Notification::from_triage_error(&ServiceError::validation("empty"));
        assert_eq!(n.title, EMPTY_SYMPTOMS_TITLE);

        let n = Notification::from_triage_error(&ServiceError::in_progress("busy"));
        assert_eq!(n.level, NotificationLevel::Info);
        assert_eq!(n.title, IN_PROGRESS_TITLE);

        let n = Notification::from_triage_error(&ServiceError::unavailable("connection refused"));
        assert_eq!(n.title, OFFLINE_TITLE);
        assert_eq!(n.description.as_deref(), Some(OFFLINE_DESCRIPTION));

        let n = Notification::from_triage_error(&ServiceError::service(500, "Internal Server Error"));
        assert_eq!(n.title, FAILURE_TITLE);
        assert_eq!(n.description.as_deref(), Some("Backend returned 500: Internal Server Error"));

        let n = Notification::from_triage_error(&ServiceError::request_failed("Failed to parse response"));
        assert_eq!(n.description.as_deref(), Some("Failed to parse response"));
        assert!(n.is_error());
    }

    #[test]
    fn test_directory_notifications() {
        let empty = DirectoryView {
            records: Vec::new(),
            total_matches: 0,
            truncated: false,
            mode: ViewMode::Preview,
        };

        let n = Notification::for_directory(&EngineStatus::Ready, &empty).unwrap();
        assert_eq!(n.level, NotificationLevel::Info);
        assert_eq!(n.title, NO_DOCTORS_TITLE);

        let errored = EngineStatus::Errored {
            kind: ErrorKind::ServiceUnavailable,
            message: "connection refused".to_string(),
        };
        assert_eq!(Notification::for_directory(&errored, &empty), Some(Notification::directory_failed()));
        assert_eq!(Notification::for_directory(&EngineStatus::Loading, &empty), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Notification::triage_complete().to_string(),
            format!("[success] {}: {}", TRIAGE_SUCCESS_TITLE, TRIAGE_SUCCESS_DESCRIPTION)
        );
    }
}
