//! Mapping store: curated (field category, raw value) → resolution.
//!
//! The store is external persisted state. It is created or loaded at the
//! start of a mapping-builder run, mutated only by the builder, written
//! back atomically at the end of the run, and consumed read-only by the
//! renderer. A curator edits the persisted form between runs; curated
//! resolutions are never overwritten programmatically.
//!
//! The persisted form is a JSON array with one object per entry and
//! round-trips losslessly: loading then saving without modification
//! reproduces byte-identical content.

use crate::fsio::write_atomic;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The fixed set of mappable field categories.
///
/// Free-text columns are not dispatched by name at runtime; each mappable
/// column corresponds to one of these variants, with capability flags as
/// methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldCategory {
    Institution,
    Photographer,
    Event,
    Person,
    #[serde(rename = "place-country")]
    Country,
    #[serde(rename = "place-region")]
    Region,
    #[serde(rename = "place-city")]
    Place,
    EthnicGroup,
    MotifKeyword,
    SearchKeyword,
}

impl FieldCategory {
    /// All categories, in scan order.
    pub const ALL: [FieldCategory; 10] = [
        Self::Institution,
        Self::Photographer,
        Self::Event,
        Self::Person,
        Self::Country,
        Self::Region,
        Self::Place,
        Self::EthnicGroup,
        Self::MotifKeyword,
        Self::SearchKeyword,
    ];

    /// Whether every observed raw value of this category must have a
    /// resolution before the owning record can publish. Only the country
    /// level is required: region and place degrade gracefully, which is
    /// what makes the depicted-place fallback chain reachable.
    pub fn requires_full_mapping(self) -> bool {
        matches!(self, Self::Country)
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Institution => "institution",
            Self::Photographer => "photographer",
            Self::Event => "event",
            Self::Person => "person",
            Self::Country => "place-country",
            Self::Region => "place-region",
            Self::Place => "place-city",
            Self::EthnicGroup => "ethnic-group",
            Self::MotifKeyword => "motif-keyword",
            Self::SearchKeyword => "search-keyword",
        };
        f.write_str(label)
    }
}

/// Lifecycle state of one mapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingStatus {
    /// Newly seen, needs curation.
    Unmapped,
    /// Has at least one of resolved id / resolved category.
    Mapped,
    /// Previously curated, not observed in the latest scan. Retained,
    /// never auto-deleted; reversible when the value reappears.
    Stale,
}

/// One curated mapping: (category, raw value) → resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntry {
    pub field_category: FieldCategory,
    /// The exact raw string as stored. Keys are case-sensitive; the
    /// builder trims surrounding whitespace before storing, and lookups
    /// apply the same normalization.
    pub raw_value: String,
    /// Knowledge-base identifier, e.g. a Wikidata Q-id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_id: Option<String>,
    /// Display/category name on the target repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_category: Option<String>,
    pub status: MappingStatus,
}

impl MappingEntry {
    /// A fresh, uncurated entry for a newly observed value.
    pub fn unmapped(field_category: FieldCategory, raw_value: impl Into<String>) -> Self {
        Self {
            field_category,
            raw_value: raw_value.into(),
            resolved_id: None,
            resolved_category: None,
            status: MappingStatus::Unmapped,
        }
    }

    /// Whether curation has produced at least one resolution field.
    pub fn is_resolved(&self) -> bool {
        self.resolved_id.is_some() || self.resolved_category.is_some()
    }
}

/// Normalization applied to raw values before they are stored or looked
/// up. Deliberately minimal: trim only, case is preserved.
pub fn normalize_raw_value(raw: &str) -> &str {
    raw.trim()
}

/// The full set of mapping entries, in stable order.
///
/// Ordering within a category is first-observed order for new entries
/// and unchanged relative order for carried-over entries, so repeated
/// runs with unchanged input produce identical files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingStore {
    pub entries: Vec<MappingEntry>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for a raw value, applying key normalization.
    pub fn get(&self, category: FieldCategory, raw_value: &str) -> Option<&MappingEntry> {
        let key = normalize_raw_value(raw_value);
        self.entries
            .iter()
            .find(|e| e.field_category == category && e.raw_value == key)
    }

    /// Look up a resolution, i.e. an entry a curator has filled in.
    /// Uncurated and absent entries both yield `None`.
    pub fn resolution(&self, category: FieldCategory, raw_value: &str) -> Option<&MappingEntry> {
        self.get(category, raw_value).filter(|e| e.is_resolved())
    }

    /// Serialize to the stable persisted form.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&self.entries)?;
        json.push('\n');
        Ok(json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self {
            entries: serde_json::from_str(json)?,
        })
    }

    /// Load a persisted store; a missing file is an empty store (first
    /// run against a new dataset).
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no prior mapping store, starting empty");
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path)?;
        let store = Self::from_json(&contents)
            .map_err(|e| Error::Config(format!("bad mapping store {}: {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), entries = store.len(), "loaded mapping store");
        Ok(store)
    }

    /// Persist atomically: the previous file is fully replaced or left
    /// untouched, never half-written.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_json()?)?;
        tracing::info!(path = %path.display(), entries = self.len(), "saved mapping store");
        Ok(())
    }
}
