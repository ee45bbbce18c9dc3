//! Visible-list computation for the doctor directory
//!
//! The pipeline is fixed: fetch order, then category, then free text, then
//! the list-size policy. Records are never re-sorted.

use serde::{Deserialize, Serialize};

use crate::services::directory::DirectoryRecord;

use super::catalog::CategoryTag;

/// Number of records shown in preview mode
pub const PREVIEW_LIMIT: usize = 6;

/// List-size policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// At most [`PREVIEW_LIMIT`] records
    #[default]
    Preview,

    /// Every match
    Full,
}

impl ViewMode {
    /// Maximum number of records shown, if any
    pub fn limit(self) -> Option<usize> {
        match self {
            ViewMode::Preview => Some(PREVIEW_LIMIT),
            ViewMode::Full => None,
        }
    }
}

/// Result of a visible-list computation
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryView {
    /// Visible records in fetch order
    pub records: Vec<DirectoryRecord>,

    /// Matches before the list-size policy was applied
    pub total_matches: usize,

    /// Whether the list-size policy dropped matches
    pub truncated: bool,

    /// Policy the view was computed with
    pub mode: ViewMode,
}

impl DirectoryView {
    /// No record matched; a normal empty state, not an error
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a "view all" affordance applies
    pub fn shows_view_all(&self) -> bool {
        self.mode == ViewMode::Preview && self.total_matches > 0
    }
}

/// Lowercased, trimmed query; `None` when nothing is left to match
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Category step: specialty contains one of the category's match strings
pub fn matches_category(record: &DirectoryRecord, category: &CategoryTag) -> bool {
    category.matches_specialty(&record.specialty_label)
}

/// Text step: `needle` (already normalized) occurs in name, specialty or location
pub fn matches_query(record: &DirectoryRecord, needle: &str) -> bool {
    [
        record.display_name.as_str(),
        record.specialty_label.as_str(),
        record.location_text(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Run the full pipeline over `records`
pub fn compute_view(
    records: &[DirectoryRecord],
    category: &CategoryTag,
    query: &str,
    mode: ViewMode,
) -> DirectoryView {
    let needle = normalize_query(query);

    let matches: Vec<&DirectoryRecord> = records
        .iter()
        .filter(|record| matches_category(record, category))
        .filter(|record| needle.as_deref().map_or(true, |n| matches_query(record, n)))
        .collect();

    let total_matches = matches.len();
    let shown = mode.limit().map_or(total_matches, |limit| limit.min(total_matches));

    DirectoryView {
        records: matches.into_iter().take(shown).cloned().collect(),
        total_matches,
        truncated: shown < total_matches,
        mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::catalog::Taxonomy;

    fn sample_records() -> Vec<DirectoryRecord> {
        vec![
            DirectoryRecord::new(1u64, "Dr. Asha Rao", "Cardiology").with_location("Mumbai"),
            DirectoryRecord::new(2u64, "Dr. Vikram Shah", "Dermatology").with_location("Pune"),
            DirectoryRecord::new(3u64, "Dr. Meera Iyer", "Pediatric Cardiology").with_location("Chennai"),
            DirectoryRecord::new(4u64, "Dr. Arjun Nair", "Psychiatry"),
        ]
    }

    #[test]
    fn test_all_with_empty_query_keeps_fetch_order() {
        let records = sample_records();
        let taxonomy = Taxonomy::standard();

        let view = compute_view(&records, taxonomy.all_category(), "   ", ViewMode::Full);
        assert_eq!(view.records, records);
        assert!(!view.truncated);
    }

    #[test]
    fn test_category_substring_match() {
        let records = sample_records();
        let taxonomy = Taxonomy::standard();
        let heart = taxonomy.get("heart-lungs").unwrap();

        let view = compute_view(&records, heart, "", ViewMode::Full);
        let names: Vec<&str> = view.records.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["Dr. Asha Rao", "Dr. Meera Iyer"]);
    }

    #[test]
    fn test_query_matches_location_case_insensitively() {
        let records = sample_records();
        let taxonomy = Taxonomy::standard();

        let view = compute_view(&records, taxonomy.all_category(), "  PUNE ", ViewMode::Full);
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.records[0].display_name, "Dr. Vikram Shah");

        // the display placeholder is not searchable
        let view = compute_view(&records, taxonomy.all_category(), "india", ViewMode::Full);
        assert!(view.is_empty());
        assert!(!view.shows_view_all());
    }

    #[test]
    fn test_preview_limit() {
        let records: Vec<DirectoryRecord> = (0..9)
            .map(|i| DirectoryRecord::new(i as u64, format!("Dr. {}", i), "General Physician"))
            .collect();
        let taxonomy = Taxonomy::standard();

        let preview = compute_view(&records, taxonomy.all_category(), "", ViewMode::Preview);
        assert_eq!(preview.records.len(), PREVIEW_LIMIT);
        assert_eq!(preview.total_matches, 9);
        assert!(preview.truncated);
        assert!(preview.shows_view_all());

        let full = compute_view(&records, taxonomy.all_category(), "", ViewMode::Full);
        assert_eq!(&full.records[..PREVIEW_LIMIT], &preview.records[..]);
        assert!(!full.shows_view_all());
    }

    #[test]
    fn test_empty_record_set() {
        let taxonomy = Taxonomy::standard();
        let view = compute_view(&[], taxonomy.all_category(), "asha", ViewMode::Preview);
        assert!(view.is_empty());
        assert_eq!(view.total_matches, 0);
    }
}
