//! Symptom intake flow
//!
//! Validates the text, marks a submission as pending, submits it and keeps
//! the latest result. A failed submission keeps the previous result.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use crate::core::TriageService;
use crate::error::{Result, ServiceError};
use crate::notification::Notification;
use crate::services::triage::{SymptomReport, TriageResult};

#[derive(Debug, Default)]
struct IntakeState {
    pending: bool,
    latest: Option<TriageResult>,
}

/// Drives symptom submissions against a [`TriageService`]
pub struct IntakeController<T> {
    service: T,
    state: Mutex<IntakeState>,
}

/// Clears the pending flag when the submission ends, including when its
/// future is dropped mid-flight.
struct PendingGuard<'a> {
    state: &'a Mutex<IntakeState>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).pending = false;
    }
}

impl<T: TriageService> IntakeController<T> {
    pub fn new(service: T) -> Self {
        Self {
            service,
            state: Mutex::new(IntakeState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, IntakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a submission is outstanding
    pub fn is_pending(&self) -> bool {
        self.lock_state().pending
    }

    /// Latest successful result
    pub fn latest_result(&self) -> Option<TriageResult> {
        self.lock_state().latest.clone()
    }

    /// Validate and submit symptom text.
    ///
    /// Blank text fails with a validation error before anything is sent.
    /// A second submission while one is outstanding is rejected.
    pub async fn submit(&self, text: &str) -> Result<TriageResult> {
        let report = SymptomReport::new(text)?;

        let _guard = {
            let mut state = self.lock_state();
            if state.pending {
                debug!("Rejecting triage submission while another is outstanding");
                return Err(ServiceError::in_progress("A triage request is already in progress"));
            }
            state.pending = true;
            PendingGuard { state: &self.state }
        };

        match self.service.submit_symptoms(&report).await {
            Ok(result) => {
                self.lock_state().latest = Some(result.clone());
                Ok(result)
            }
            Err(error) => {
                warn!("Triage intake failed: {}", error);
                Err(error)
            }
        }
    }

    /// Submit and report the outcome as a notification
    pub async fn submit_and_notify(&self, text: &str) -> (Option<TriageResult>, Notification) {
        match self.submit(text).await {
            Ok(result) => (Some(result), Notification::triage_complete()),
            Err(error) => (None, Notification::from_triage_error(&error)),
        }
    }
}
