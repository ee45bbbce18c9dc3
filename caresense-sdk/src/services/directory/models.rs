//! Doctor directory data models
//!
//! This module contains the wire shapes of the directory endpoint and the
//! canonical [`DirectoryRecord`] they are resolved into.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ServiceError};

/// Rating shown when a record has none
pub const DEFAULT_RATING: f64 = 4.6;

/// Location shown when a record has neither location nor city
pub const DEFAULT_LOCATION_LABEL: &str = "India";

/// Shown when years of experience are unknown
pub const UNKNOWN_EXPERIENCE_LABEL: &str = "N/A";

/// Shown when the consultation fee is unknown
pub const UNKNOWN_FEE_LABEL: &str = "Varies";

/// Directory record identifier. Numeric and string ids are both accepted
/// on the wire and kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Optional filter parameters passed through to the directory service.
///
/// The service may or may not honour them; client-side filtering in
/// [`crate::search`] is authoritative either way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
}

impl DoctorQuery {
    /// Convert parameters to query parameters, skipping blank values
    pub fn to_query_params(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();

        for (key, value) in [
            ("search", &self.search),
            ("specialty", &self.specialty),
            ("availability", &self.availability),
        ] {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.insert(key.to_string(), value.to_string());
            }
        }

        params
    }
}

/// Canonical doctor entry, with every fallback already resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRecord {
    pub id: RecordId,
    pub display_name: String,
    pub specialty_label: String,

    /// `location`, else `city`; `None` when the backend sent neither
    pub location: Option<String>,

    pub rating_score: Option<f64>,
    pub availability_label: Option<String>,
    pub phone: Option<String>,
    pub affiliated_facility: Option<String>,
    pub website_url: Option<String>,
    pub spoken_languages: Option<String>,
    pub years_experience: Option<u32>,
    pub consultation_fee: Option<String>,
}

impl DirectoryRecord {
    /// Minimal record; optional attributes start empty
    pub fn new(id: impl Into<RecordId>, display_name: impl Into<String>, specialty_label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            specialty_label: specialty_label.into(),
            location: None,
            rating_score: None,
            availability_label: None,
            phone: None,
            affiliated_facility: None,
            website_url: None,
            spoken_languages: None,
            years_experience: None,
            consultation_fee: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into()).filter(|l| !l.is_empty());
        self
    }

    /// Set the rating
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating_score = Some(rating);
        self
    }

    /// Location for display, with the directory-wide placeholder
    pub fn location_label(&self) -> &str {
        self.location.as_deref().unwrap_or(DEFAULT_LOCATION_LABEL)
    }

    /// Text the search filter matches against; empty when no location is known
    pub fn location_text(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }

    /// Rating for display
    pub fn rating_or_default(&self) -> f64 {
        self.rating_score.unwrap_or(DEFAULT_RATING)
    }

    /// Experience for display, e.g. "12+ yrs"
    pub fn experience_label(&self) -> String {
        match self.years_experience {
            Some(years) if years > 0 => format!("{}+ yrs", years),
            _ => UNKNOWN_EXPERIENCE_LABEL.to_string(),
        }
    }

    /// Consultation fee for display
    pub fn fee_label(&self) -> &str {
        self.consultation_fee.as_deref().unwrap_or(UNKNOWN_FEE_LABEL)
    }
}

/// Accepted names for each directory attribute, preferred name first
const NAME_ALIASES: &[&str] = &["name", "displayName", "display_name", "full_name"];
const SPECIALTY_ALIASES: &[&str] = &["specialty", "specialtyLabel", "speciality", "specialization"];
const LOCATION_ALIASES: &[&str] = &["location", "city"];
const RATING_ALIASES: &[&str] = &["rating", "ratingScore"];
const AVAILABILITY_ALIASES: &[&str] = &["availability", "availabilityLabel"];
const PHONE_ALIASES: &[&str] = &["phone"];
const FACILITY_ALIASES: &[&str] = &["hospital", "affiliatedFacility"];
const WEBSITE_ALIASES: &[&str] = &["website", "websiteUrl"];
const LANGUAGES_ALIASES: &[&str] = &["languages", "spokenLanguages"];
const EXPERIENCE_ALIASES: &[&str] = &["years_experience", "yearsExperience"];
const FEE_ALIASES: &[&str] = &["fees", "consultation_fee", "consultationFee"];

/// A JSON scalar as display text; empty strings count as absent
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A JSON scalar as a number; numeric strings are accepted
fn scalar_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A list of scalars joined for display
fn list_text(value: &Value) -> Option<String> {
    let items: Vec<String> = value.as_array()?.iter().filter_map(scalar_text).collect();
    if items.is_empty() {
        None
    } else {
        Some(items.join(", "))
    }
}

/// Reads one directory entry, resolving each attribute from the first alias
/// that holds a usable value. Values of an unexpected type are dropped.
struct RecordReader<'a> {
    object: &'a Map<String, Value>,
    index: usize,
}

impl<'a> RecordReader<'a> {
    fn first<T>(&self, aliases: &[&str], convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
        let mut result = None;

        for alias in aliases {
            let Some(value) = self.object.get(*alias) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            match convert(value) {
                Some(converted) => {
                    result = Some(converted);
                    break;
                }
                None => debug!(
                    "Ignoring directory field \"{}\" at index {}: unusable {}",
                    alias,
                    self.index,
                    json_type_name(value)
                ),
            }
        }

        result
    }

    fn text(&self, aliases: &[&str]) -> Option<String> {
        self.first(aliases, scalar_text)
    }

    fn text_or_list(&self, aliases: &[&str]) -> Option<String> {
        self.first(aliases, |value| scalar_text(value).or_else(|| list_text(value)))
    }

    fn number(&self, aliases: &[&str]) -> Option<f64> {
        self.first(aliases, scalar_number)
    }
}

/// Decode one directory entry. Only a missing or unusable `id` fails it.
fn decode_record(index: usize, item: &Value) -> Result<DirectoryRecord> {
    let Some(object) = item.as_object() else {
        return Err(ServiceError::request_failed(format!(
            "Invalid directory record at index {}: expected an object, got {}",
            index,
            json_type_name(item)
        )));
    };

    let id = match object.get("id") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        other => {
            return Err(ServiceError::request_failed(format!(
                "Invalid directory record at index {}: id is {}",
                index,
                other.map_or("missing", json_type_name)
            )))
        }
    };

    let reader = RecordReader { object, index };

    Ok(DirectoryRecord {
        id: RecordId(id),
        display_name: reader.text(NAME_ALIASES).unwrap_or_default(),
        specialty_label: reader.text(SPECIALTY_ALIASES).unwrap_or_default(),
        location: reader.text(LOCATION_ALIASES),
        rating_score: reader.number(RATING_ALIASES),
        availability_label: reader.text(AVAILABILITY_ALIASES),
        phone: reader.text(PHONE_ALIASES),
        affiliated_facility: reader.text(FACILITY_ALIASES),
        website_url: reader.text(WEBSITE_ALIASES),
        spoken_languages: reader.text_or_list(LANGUAGES_ALIASES),
        years_experience: reader
            .number(EXPERIENCE_ALIASES)
            .filter(|years| *years >= 0.0)
            .map(|years| years as u32),
        consultation_fee: reader.text(FEE_ALIASES),
    })
}

/// Decode a directory payload: either a bare list or a paginated
/// `{"results": [...]}` envelope.
pub fn decode_directory_payload(payload: Value) -> Result<Vec<DirectoryRecord>> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ServiceError::request_failed(
                    "Directory response object has no \"results\" list",
                ))
            }
        },
        other => {
            return Err(ServiceError::request_failed(format!(
                "Unexpected directory response: expected a list, got {}",
                json_type_name(&other)
            )))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| decode_record(index, item))
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_falls_back_to_city() {
        let records = decode_directory_payload(json!([
            {"id": 1, "name": "Dr. Asha Rao", "specialty": "Cardiology", "location": "Mumbai"},
            {"id": 2, "name": "Dr. Vikram Shah", "specialty": "Dermatology", "city": "Pune"},
            {"id": 3, "name": "Dr. Meera Iyer", "specialty": "Pediatrics", "location": "", "city": "Chennai"},
            {"id": 4, "name": "Dr. Arjun Nair", "specialty": "Psychiatry"}
        ]))
        .unwrap();

        assert_eq!(records[0].location_label(), "Mumbai");
        assert_eq!(records[1].location_label(), "Pune");
        assert_eq!(records[2].location_label(), "Chennai");
        assert_eq!(records[3].location, None);
        assert_eq!(records[3].location_label(), DEFAULT_LOCATION_LABEL);
        assert_eq!(records[3].location_text(), "");
    }

    #[test]
    fn test_optional_attributes() {
        let records = decode_directory_payload(json!([{
            "id": "doc-7",
            "name": "Dr. Kavya Menon",
            "specialty": "Gynecology",
            "rating": "4.8",
            "availability": "Mon-Fri",
            "phone": "+91 98200 00000",
            "hospital": "Lilavati Hospital",
            "website": "https://example.org/kavya",
            "languages": "English, Hindi, Malayalam",
            "years_experience": 14,
            "fees": 800
        }]))
        .unwrap();

        let record = &records[0];
        assert_eq!(record.id, RecordId::new("doc-7"));
        assert_eq!(record.rating_or_default(), 4.8);
        assert_eq!(record.affiliated_facility.as_deref(), Some("Lilavati Hospital"));
        assert_eq!(record.experience_label(), "14+ yrs");
        assert_eq!(record.fee_label(), "800");
    }

    #[test]
    fn test_display_defaults() {
        let record = DirectoryRecord::new(1u64, "Dr. Test", "General Physician");
        assert_eq!(record.rating_or_default(), DEFAULT_RATING);
        assert_eq!(record.experience_label(), UNKNOWN_EXPERIENCE_LABEL);
        assert_eq!(record.fee_label(), UNKNOWN_FEE_LABEL);

        let record = DirectoryRecord::new(2u64, "Dr. Zero", "General Physician").with_rating(0.0);
        assert_eq!(record.rating_or_default(), 0.0);
    }

    #[test]
    fn test_paginated_envelope() {
        let records = decode_directory_payload(json!({
            "count": 1,
            "next": null,
            "results": [{"id": 9, "name": "Dr. Paged", "specialty": "Endocrinology"}]
        }))
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, RecordId::from(9u64));
    }

    #[test]
    fn test_rejects_unexpected_shapes() {
        assert!(decode_directory_payload(json!(null)).is_err());
        assert!(decode_directory_payload(json!({"detail": "ok"})).is_err());
        assert!(decode_directory_payload(json!([{"name": "no id"}])).is_err());
    }

    #[test]
    fn test_odd_optional_fields_do_not_fail_the_fetch() {
        let records = decode_directory_payload(json!([
            {"id": 1, "name": "Dr. Asha Rao", "specialty": "Cardiology"},
            {
                "id": 2,
                "name": "Dr. Vikram Shah",
                "specialty": "Dermatology",
                "languages": ["English", "Hindi"],
                "phone": 9820000000u64,
                "availability": {"mon": "9-5"},
                "website": ["https://example.org"],
                "rating": "not rated"
            }
        ]))
        .unwrap();

        assert_eq!(records.len(), 2);
        let record = &records[1];
        assert_eq!(record.spoken_languages.as_deref(), Some("English, Hindi"));
        assert_eq!(record.phone.as_deref(), Some("9820000000"));
        assert_eq!(record.availability_label, None);
        assert_eq!(record.website_url, None);
        assert_eq!(record.rating_or_default(), DEFAULT_RATING);
    }

    #[test]
    fn test_duplicate_aliases_prefer_first_present() {
        let records = decode_directory_payload(json!([
            {"id": 3, "name": "Dr. Meera Iyer", "display_name": "Meera Iyer", "specialty": null, "speciality": "Pediatrics"},
            {"id": 4, "name": 42, "displayName": "Dr. Arjun Nair", "specialty": "Psychiatry"}
        ]))
        .unwrap();

        assert_eq!(records[0].display_name, "Dr. Meera Iyer");
        assert_eq!(records[0].specialty_label, "Pediatrics");
        assert_eq!(records[1].display_name, "42");
    }

    #[test]
    fn test_values_are_kept_as_sent() {
        let records = decode_directory_payload(json!([
            {"id": 5, "name": "Dr. Kiran Das", "specialty": "Endocrinology", "location": " Kochi ", "phone": " 0484 "}
        ]))
        .unwrap();

        assert_eq!(records[0].location.as_deref(), Some(" Kochi "));
        assert_eq!(records[0].phone.as_deref(), Some(" 0484 "));
    }

    #[test]
    fn test_query_params_skip_blank_values() {
        let query = DoctorQuery {
            search: Some("  asha ".to_string()),
            specialty: Some("   ".to_string()),
            availability: None,
        };

        let params = query.to_query_params();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("search").map(String::as_str), Some("asha"));
    }
}
