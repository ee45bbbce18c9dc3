//! Translation of triage payloads into [`TriageResult`]
//!
//! The triage backend has shipped several response shapes (snake_case and
//! camelCase field names, different words for the same field). Every shape
//! goes through [`normalize_triage_payload`]; nothing else reads raw fields.

use serde_json::{Map, Value};

use super::models::{TriageResult, DEFAULT_URGENCY_LABEL};

/// Accepted names for the urgency label, canonical name first
pub const URGENCY_ALIASES: &[&str] = &[
    "urgencyLabel",
    "triageLevel",
    "triage_level",
    "urgency_label",
    "urgency",
    "priority",
    "level",
];

/// Accepted names for the advice text, canonical name first
pub const ADVICE_ALIASES: &[&str] = &[
    "narrativeAdvice",
    "advice",
    "narrative_advice",
    "summary",
    "recommendation",
];

/// Accepted names for the list of causes, canonical name first
pub const CAUSES_ALIASES: &[&str] = &[
    "possibleCauses",
    "commonCauses",
    "common_causes",
    "possible_causes",
    "causes",
];

/// Normalize any triage payload into the canonical result.
///
/// Never fails: a non-object payload, a missing field or a field of the
/// wrong type falls back to the field's default.
pub fn normalize_triage_payload(payload: &Value) -> TriageResult {
    let Some(object) = payload.as_object() else {
        return TriageResult::default();
    };

    TriageResult {
        urgency_label: first_string(object, URGENCY_ALIASES)
            .unwrap_or_else(|| DEFAULT_URGENCY_LABEL.to_string()),
        narrative_advice: first_string(object, ADVICE_ALIASES).unwrap_or_default(),
        possible_causes: first_list(object, CAUSES_ALIASES).unwrap_or_default(),
    }
}

/// First alias holding a string value
fn first_string(object: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|alias| object.get(*alias).and_then(Value::as_str))
        .map(str::to_string)
}

/// First alias holding a list; non-string entries are dropped
fn first_list(object: &Map<String, Value>, aliases: &[&str]) -> Option<Vec<String>> {
    aliases
        .iter()
        .find_map(|alias| object.get(*alias).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_snake_case_payload() {
        let payload = json!({
            "triage_level": "Critical",
            "advice": "Seek immediate care",
            "common_causes": ["cardiac event", "pulmonary embolism"]
        });

        let result = normalize_triage_payload(&payload);
        assert_eq!(result.urgency_label, "Critical");
        assert_eq!(result.narrative_advice, "Seek immediate care");
        assert_eq!(result.possible_causes, vec!["cardiac event", "pulmonary embolism"]);
    }

    #[test]
    fn test_camel_case_payload() {
        let payload = json!({
            "triageLevel": "Moderate",
            "advice": "Book a GP visit this week",
            "commonCauses": ["tension headache"]
        });

        let result = normalize_triage_payload(&payload);
        assert_eq!(result.urgency_label, "Moderate");
        assert_eq!(result.possible_causes, vec!["tension headache"]);
    }

    #[test]
    fn test_every_missing_subset_gets_defaults() {
        let full = json!({
            "triage_level": "Low",
            "advice": "Rest",
            "common_causes": ["viral infection"]
        });
        let fields = ["triage_level", "advice", "common_causes"];

        for mask in 0u8..8 {
            let mut payload = full.clone();
            let object = payload.as_object_mut().unwrap();
            for (bit, field) in fields.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    object.remove(*field);
                }
            }

            let result = normalize_triage_payload(&payload);
            let expected_label = if mask & 1 != 0 { DEFAULT_URGENCY_LABEL } else { "Low" };
            let expected_advice = if mask & 2 != 0 { "" } else { "Rest" };
            let expected_causes: Vec<String> = if mask & 4 != 0 {
                Vec::new()
            } else {
                vec!["viral infection".to_string()]
            };

            assert_eq!(result.urgency_label, expected_label, "mask {mask}");
            assert_eq!(result.narrative_advice, expected_advice, "mask {mask}");
            assert_eq!(result.possible_causes, expected_causes, "mask {mask}");
        }
    }

    #[test]
    fn test_non_object_payloads() {
        for payload in [json!(null), json!([]), json!("Critical"), json!(42), json!({})] {
            assert_eq!(normalize_triage_payload(&payload), TriageResult::default());
        }
    }

    #[test]
    fn test_causes_not_a_list() {
        let payload = json!({"common_causes": "migraine"});
        assert!(normalize_triage_payload(&payload).possible_causes.is_empty());

        let payload = json!({"common_causes": ["migraine", 3, null, "dehydration"]});
        assert_eq!(
            normalize_triage_payload(&payload).possible_causes,
            vec!["migraine", "dehydration"]
        );
    }

    #[test]
    fn test_null_or_wrong_type_label_falls_through() {
        let payload = json!({"triageLevel": null, "triage_level": "High"});
        assert_eq!(normalize_triage_payload(&payload).urgency_label, "High");

        let payload = json!({"triage_level": 5});
        assert_eq!(normalize_triage_payload(&payload).urgency_label, DEFAULT_URGENCY_LABEL);
    }

    #[test]
    fn test_normalization_is_idempotent_on_canonical_form() {
        let result = TriageResult {
            urgency_label: "Critical".to_string(),
            narrative_advice: "Seek immediate care".to_string(),
            possible_causes: vec!["cardiac event".to_string()],
        };
        let canonical = serde_json::to_value(&result).unwrap();

        let once = normalize_triage_payload(&canonical);
        assert_eq!(once, result);

        let twice = normalize_triage_payload(&serde_json::to_value(&once).unwrap());
        assert_eq!(twice, once);
    }
}
