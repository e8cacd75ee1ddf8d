//! Record model for photograph and archive-card metadata.
//!
//! Pure data containers plus field accessors. The only behavior here is
//! construction validation (join keys must be present) and the mapping
//! between records and the mappable field categories, which both the
//! mapping builder and the renderer read through [`category_values`] so
//! that value extraction is defined in exactly one place.

use crate::mappings::FieldCategory;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source museum codes. A small fixed set; the code drives which
/// downstream link template is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Institution {
    /// Etnografiska museet
    Em,
    /// Medelhavsmuseet
    Mm,
    /// Östasiatiska museet
    Om,
    /// Världskulturmuseet
    Vkm,
}

impl Institution {
    /// Parse a museum code as it appears in the source data.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "EM" => Ok(Self::Em),
            "MM" => Ok(Self::Mm),
            "OM" => Ok(Self::Om),
            "VKM" => Ok(Self::Vkm),
            other => Err(Error::InvalidInput(format!(
                "unknown institution code: {other}"
            ))),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Em => "EM",
            Self::Mm => "MM",
            Self::Om => "OM",
            Self::Vkm => "VKM",
        }
    }
}

impl fmt::Display for Institution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Default for Institution {
    fn default() -> Self {
        Self::Em
    }
}

/// One row of the primary dataset: a single photograph.
///
/// Scalar fields are `Option<String>` where absence is meaningful;
/// multi-valued fields are `Vec<String>` (one element per list entry in
/// the source cell).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Unique within an institution; uniqueness across the combined
    /// merged set is enforced by the merger.
    pub photo_number: String,
    pub accession_number: String,
    /// Join key to archive cards of the same institution.
    pub post_number: String,
    pub institution: Institution,

    /// Required for publication.
    pub photographer: Option<String>,
    /// Required for publication.
    pub description: Option<String>,
    pub english_description: Option<String>,

    pub event: Option<String>,
    pub depicted_persons: Vec<String>,
    pub motif_keywords: Vec<String>,
    pub search_keywords: Vec<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub place: Option<String>,
    pub ethnic_group: Vec<String>,
    pub ethnic_group_historical: Vec<String>,
    pub geographic_name_other: Vec<String>,
    pub references: Vec<String>,

    /// Free text, expected shape `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    /// An invalid shape is a soft validation failure at render time.
    pub photo_date: Option<String>,
    /// References to records in other archive systems, each a prefixed
    /// identifier such as `gnm:photo/GNM1234`.
    pub external_same_as: Vec<String>,
}

impl PhotoRecord {
    /// Construction validation: both identity keys must be present.
    pub fn validate(&self) -> Result<()> {
        if self.photo_number.trim().is_empty() {
            return Err(Error::InvalidInput(
                "photo record without photo number".to_string(),
            ));
        }
        if self.post_number.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "{}: photo record without post number",
                self.photo_number
            )));
        }
        Ok(())
    }
}

/// One row of the archive-card dataset: a physical archive reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveCard {
    pub card_id: String,
    /// Join key to the owning photo record.
    pub post_number: String,
    pub institution: Institution,
}

impl ArchiveCard {
    pub fn validate(&self) -> Result<()> {
        if self.card_id.trim().is_empty() {
            return Err(Error::InvalidInput(
                "archive card without card id".to_string(),
            ));
        }
        if self.post_number.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "{}: archive card without post number",
                self.card_id
            )));
        }
        Ok(())
    }
}

/// A photo record joined with its archive cards from the same
/// institution. A record may have zero cards; every card in a merged
/// dataset belongs to exactly one record.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub photo: PhotoRecord,
    pub cards: Vec<ArchiveCard>,
}

/// The raw values a record contributes to one mappable field category,
/// in field order. Multi-valued fields contribute each element
/// separately; blank values are skipped.
pub fn category_values(photo: &PhotoRecord, category: FieldCategory) -> Vec<String> {
    let scalar = |v: &Option<String>| -> Vec<String> {
        v.iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };
    let list = |v: &[String]| -> Vec<String> {
        v.iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };

    match category {
        FieldCategory::Institution => vec![photo.institution.code().to_string()],
        FieldCategory::Photographer => scalar(&photo.photographer),
        FieldCategory::Event => scalar(&photo.event),
        FieldCategory::Person => list(&photo.depicted_persons),
        FieldCategory::Country => scalar(&photo.country),
        FieldCategory::Region => scalar(&photo.region),
        FieldCategory::Place => scalar(&photo.place),
        FieldCategory::EthnicGroup => {
            let mut values = list(&photo.ethnic_group);
            values.extend(list(&photo.ethnic_group_historical));
            values
        }
        FieldCategory::MotifKeyword => list(&photo.motif_keywords),
        FieldCategory::SearchKeyword => list(&photo.search_keywords),
    }
}
