//! Specialty category taxonomy
//!
//! The directory is browsed by broad categories, each mapping to a set of
//! specialty strings. Matching is a case-insensitive substring test, so
//! "Cardiology" also covers "Pediatric Cardiology".

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// Identifier of the catch-all category
pub const ALL_CATEGORY_ID: &str = "all";

/// One entry of the category taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTag {
    pub id: String,
    pub label: String,
    pub specialty_matches: Vec<String>,
}

impl CategoryTag {
    pub fn new<I, S>(id: impl Into<String>, label: impl Into<String>, specialty_matches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            label: label.into(),
            specialty_matches: specialty_matches.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this is the catch-all category
    pub fn is_all(&self) -> bool {
        self.id == ALL_CATEGORY_ID
    }

    /// Whether a specialty belongs to this category.
    ///
    /// The catch-all category matches everything; any other category with
    /// an empty match list matches nothing.
    pub fn matches_specialty(&self, specialty: &str) -> bool {
        if self.is_all() {
            return true;
        }

        let specialty = specialty.to_lowercase();
        self.specialty_matches
            .iter()
            .any(|m| specialty.contains(&m.to_lowercase()))
    }
}

/// Ordered set of categories, always containing the catch-all entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    categories: Vec<CategoryTag>,
}

impl Taxonomy {
    /// Build a taxonomy. Ids must be unique and include `"all"`.
    pub fn new(categories: Vec<CategoryTag>) -> Result<Self> {
        for (index, category) in categories.iter().enumerate() {
            if category.id.trim().is_empty() {
                return Err(ServiceError::validation(format!("Category at position {} has an empty id", index)));
            }
            if categories[..index].iter().any(|c| c.id == category.id) {
                return Err(ServiceError::validation(format!("Duplicate category id: {}", category.id)));
            }
        }

        if !categories.iter().any(CategoryTag::is_all) {
            return Err(ServiceError::validation(format!(
                "Taxonomy must contain the \"{}\" category",
                ALL_CATEGORY_ID
            )));
        }

        Ok(Self { categories })
    }

    /// The built-in specialty taxonomy
    pub fn standard() -> Self {
        STANDARD_TAXONOMY.clone()
    }

    /// Look up a category by id
    pub fn get(&self, id: &str) -> Option<&CategoryTag> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look up a category by id, failing for unknown ids
    pub fn require(&self, id: &str) -> Result<&CategoryTag> {
        self.get(id)
            .ok_or_else(|| ServiceError::validation(format!("Unknown category: {}", id)))
    }

    /// The catch-all category
    pub fn all_category(&self) -> &CategoryTag {
        // presence is checked in `new`
        self.categories
            .iter()
            .find(|c| c.is_all())
            .unwrap_or(&ALL_FALLBACK)
    }

    /// Categories in display order
    pub fn iter(&self) -> impl Iterator<Item = &CategoryTag> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

static ALL_FALLBACK: Lazy<CategoryTag> =
    Lazy::new(|| CategoryTag::new(ALL_CATEGORY_ID, "All", Vec::<String>::new()));

static STANDARD_TAXONOMY: Lazy<Taxonomy> = Lazy::new(|| Taxonomy {
    categories: vec![
        CategoryTag::new(ALL_CATEGORY_ID, "All", Vec::<String>::new()),
        CategoryTag::new(
            "general",
            "General & Family",
            ["General Physician", "Internal Medicine", "Family Medicine"],
        ),
        CategoryTag::new("heart-lungs", "Heart & Lungs", ["Cardiology", "Pulmonology"]),
        CategoryTag::new("women", "Women\u{2019}s Health", ["Gynecology", "Obstetrics"]),
        CategoryTag::new("kids", "Children", ["Pediatrics"]),
        CategoryTag::new("mind", "Mind & Mood", ["Psychiatry"]),
        CategoryTag::new(
            "digestive",
            "Digestive & Hormones",
            ["Gastroenterology", "Endocrinology"],
        ),
        CategoryTag::new("eyes-skin", "Eyes & Skin", ["Ophthalmology", "Dermatology"]),
    ],
});
