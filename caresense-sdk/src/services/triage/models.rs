//! Triage data models
//!
//! This module contains type definitions for triage requests and the
//! canonical triage result.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// Urgency label used when the backend does not provide one
pub const DEFAULT_URGENCY_LABEL: &str = "AI analysis";

/// Shown in place of empty advice
pub const ADVICE_PLACEHOLDER: &str =
    "No detailed advice was generated. Please describe your symptoms again with more detail if needed.";

/// Free-text symptom description, guaranteed to contain non-whitespace text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomReport {
    text: String,
}

impl SymptomReport {
    /// Validate and wrap a symptom description. The stored text is trimmed.
    pub fn new(text: impl AsRef<str>) -> Result<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ServiceError::validation("Please describe your symptoms"));
        }

        Ok(Self {
            text: trimmed.to_string(),
        })
    }

    /// Trimmed symptom text
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for SymptomReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Body of a triage submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriageRequest {
    /// Trimmed symptom text
    pub symptoms: String,
}

impl From<&SymptomReport> for TriageRequest {
    fn from(report: &SymptomReport) -> Self {
        Self {
            symptoms: report.text().to_string(),
        }
    }
}

/// Canonical, fully-defaulted triage result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TriageResult {
    /// Priority category, e.g. "Low", "Moderate", "Critical"
    pub urgency_label: String,

    /// Human-readable guidance, possibly empty
    pub narrative_advice: String,

    /// Probable causes in backend order
    pub possible_causes: Vec<String>,
}

impl Default for TriageResult {
    fn default() -> Self {
        Self {
            urgency_label: DEFAULT_URGENCY_LABEL.to_string(),
            narrative_advice: String::new(),
            possible_causes: Vec::new(),
        }
    }
}

impl TriageResult {
    /// Whether the urgency label reads as an emergency or urgent case
    pub fn is_emergency(&self) -> bool {
        let label = self.urgency_label.to_lowercase();
        label.contains("emergency") || label.contains("urgent")
    }

    /// Priority band shown next to the urgency label
    pub fn priority_band(&self) -> &'static str {
        if self.is_emergency() {
            "Higher-priority concern"
        } else {
            "Lower-priority concern"
        }
    }

    /// Urgency label for display; blank labels show the default
    pub fn urgency_or_placeholder(&self) -> &str {
        if self.urgency_label.trim().is_empty() {
            DEFAULT_URGENCY_LABEL
        } else {
            &self.urgency_label
        }
    }

    /// Advice text, or a placeholder asking for more detail when empty
    pub fn advice_or_placeholder(&self) -> &str {
        if self.narrative_advice.trim().is_empty() {
            ADVICE_PLACEHOLDER
        } else {
            &self.narrative_advice
        }
    }

    /// Emergency numbers to surface alongside an urgent result
    pub fn emergency_contacts(&self) -> &'static [EmergencyContact] {
        if self.is_emergency() {
            EMERGENCY_CONTACTS
        } else {
            &[]
        }
    }
}

/// A phone line shown in the emergency guidance block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmergencyContact {
    pub number: &'static str,
    pub label: &'static str,
}

/// Emergency lines for India
pub const EMERGENCY_CONTACTS: &[EmergencyContact] = &[
    EmergencyContact { number: "112", label: "All-in-One Emergency Helpline" },
    EmergencyContact { number: "108", label: "Ambulance (National)" },
    EmergencyContact { number: "102", label: "Medical Emergency" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symptom_report_rejects_blank_text() {
        assert!(SymptomReport::new("").is_err());
        assert!(SymptomReport::new(" \n\t ").is_err());

        let report = SymptomReport::new("  mild headache \n").unwrap();
        assert_eq!(report.text(), "mild headache");
    }

    #[test]
    fn test_emergency_detection() {
        let result = TriageResult {
            urgency_label: "Urgent care recommended".to_string(),
            ..TriageResult::default()
        };
        assert!(result.is_emergency());
        assert_eq!(result.emergency_contacts().len(), 3);

        let result = TriageResult {
            urgency_label: "Low".to_string(),
            ..TriageResult::default()
        };
        assert!(!result.is_emergency());
        assert!(result.emergency_contacts().is_empty());
        assert_eq!(result.priority_band(), "Lower-priority concern");
    }

    #[test]
    fn test_advice_placeholder() {
        let result = TriageResult::default();
        assert_eq!(result.advice_or_placeholder(), ADVICE_PLACEHOLDER);

        let result = TriageResult {
            narrative_advice: "Rest and hydrate".to_string(),
            ..TriageResult::default()
        };
        assert_eq!(result.advice_or_placeholder(), "Rest and hydrate");
    }

    #[test]
    fn test_urgency_placeholder() {
        let result = TriageResult {
            urgency_label: "  ".to_string(),
            ..TriageResult::default()
        };
        assert_eq!(result.urgency_or_placeholder(), DEFAULT_URGENCY_LABEL);

        let result = TriageResult {
            urgency_label: "Critical".to_string(),
            ..TriageResult::default()
        };
        assert_eq!(result.urgency_or_placeholder(), "Critical");
    }

    #[test]
    fn test_canonical_serialization_is_camel_case() {
        let value = serde_json::to_value(TriageResult::default()).unwrap();
        assert!(value.get("urgencyLabel").is_some());
        assert!(value.get("narrativeAdvice").is_some());
        assert!(value.get("possibleCauses").is_some());
    }
}
