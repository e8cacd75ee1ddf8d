//! Render one merged record into a publication document.
//!
//! Each render is an independent, side-effect-free function of the
//! record, the frozen mapping store and the run configuration:
//! `Start → (Refused | Validated) → Assembled → Done`, no retries.
//!
//! Refusal rules short-circuit first (missing photographer, missing
//! description, an unmapped value in a required-mapped category). After
//! validation, field resolution degrades gracefully: a value without a
//! curated resolution renders as its raw text, except where a rule below
//! says otherwise. Soft failures (bad date shape, unlinkable external
//! ids, archive cards under unsupported institutions) mark or reduce the
//! output without blocking publication.

use crate::links;
use chrono::NaiveDate;
use fotobatch_common::config::RunConfig;
use fotobatch_common::mappings::{FieldCategory, MappingStatus, MappingStore};
use fotobatch_common::records::{category_values, Institution, MergedRecord, PhotoRecord};
use std::fmt;

/// Why a record was refused publication.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    MissingPhotographer,
    MissingDescription,
    UnmappedRequiredField {
        category: FieldCategory,
        raw_value: String,
    },
}

impl RejectReason {
    /// Stable tag used in the reject report.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::MissingPhotographer => "missing-photographer",
            Self::MissingDescription => "missing-description",
            Self::UnmappedRequiredField { .. } => "unmapped-required-field",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedRequiredField {
                category,
                raw_value,
            } => write!(f, "{} ({}: {:?})", self.tag(), category, raw_value),
            _ => f.write_str(self.tag()),
        }
    }
}

/// A refused record, with enough identity to locate the source row.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub photo_number: String,
    pub institution: Institution,
    pub reason: RejectReason,
}

/// Soft findings made while assembling a published document.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNote {
    /// Date text did not match `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    BadDateShape(String),
    /// An `externalSameAs` entry with no known archive prefix; dropped.
    UnknownExternalId(String),
    /// Archive cards under an institution without a link template.
    UnsupportedInstitutionCards {
        institution: Institution,
        count: usize,
    },
}

impl fmt::Display for RenderNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadDateShape(date) => write!(f, "photo date {date:?} has an invalid shape"),
            Self::UnknownExternalId(id) => write!(f, "unrecognized external id {id:?} dropped"),
            Self::UnsupportedInstitutionCards { institution, count } => write!(
                f,
                "{count} archive card(s) omitted: no link template for {institution}"
            ),
        }
    }
}

/// The assembled publication document for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub photo_number: String,
    pub institution: Institution,
    pub filename: String,
    /// Ordered key → formatted text pairs, as consumed by the uploader.
    pub fields: Vec<(String, String)>,
    /// Ordered category names, duplicates removed, never empty strings.
    pub categories: Vec<String>,
    pub notes: Vec<RenderNote>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Published(Box<RenderedDocument>),
    Rejected(Rejection),
}

/// Strict, anchored date-shape check. `YYYY`, `YYYY-MM` and
/// `YYYY-MM-DD` only; full dates must also be real calendar dates.
pub fn photo_date_is_valid(date: &str) -> bool {
    fn all_digits(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }
    if !date.is_ascii() {
        return false;
    }
    let bytes = date.as_bytes();
    match bytes.len() {
        4 => all_digits(date),
        7 => {
            all_digits(&date[..4])
                && bytes[4] == b'-'
                && all_digits(&date[5..])
                && matches!(date[5..].parse::<u8>(), Ok(1..=12))
        }
        10 => {
            all_digits(&date[..4])
                && bytes[4] == b'-'
                && all_digits(&date[5..7])
                && bytes[7] == b'-'
                && all_digits(&date[8..])
                && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
        }
        _ => false,
    }
}

/// Renders merged records against a frozen store and run configuration.
pub struct Renderer<'a> {
    store: &'a MappingStore,
    config: &'a RunConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(store: &'a MappingStore, config: &'a RunConfig) -> Self {
        Self { store, config }
    }

    /// Apply the refusal rules, then assemble the document.
    pub fn render(&self, record: &MergedRecord) -> RenderOutcome {
        let photo = &record.photo;
        let reject = |reason: RejectReason| {
            tracing::warn!(photo_number = %photo.photo_number, reason = %reason, "record refused");
            RenderOutcome::Rejected(Rejection {
                photo_number: photo.photo_number.clone(),
                institution: photo.institution,
                reason,
            })
        };

        let Some(photographer) = non_blank(&photo.photographer) else {
            return reject(RejectReason::MissingPhotographer);
        };
        let Some(description) = non_blank(&photo.description) else {
            return reject(RejectReason::MissingDescription);
        };

        // Required-mapped categories: every observed value must have a
        // curated resolution.
        for category in FieldCategory::ALL {
            if !category.requires_full_mapping() {
                continue;
            }
            for value in category_values(photo, category) {
                let mapped = self
                    .store
                    .get(category, &value)
                    .map(|e| e.status == MappingStatus::Mapped)
                    .unwrap_or(false);
                if !mapped {
                    return reject(RejectReason::UnmappedRequiredField {
                        category,
                        raw_value: value,
                    });
                }
            }
        }

        let mut notes = Vec::new();

        let date_valid = photo
            .photo_date
            .as_deref()
            .map(photo_date_is_valid)
            .unwrap_or(true);
        if let Some(date) = photo.photo_date.as_deref() {
            if !date_valid {
                notes.push(RenderNote::BadDateShape(date.to_string()));
            }
        }

        let mut fields: Vec<(String, String)> = Vec::new();
        let mut push_field = |key: &str, text: String| {
            if !text.is_empty() {
                fields.push((key.to_string(), text));
            }
        };

        push_field("photographer", self.photographer_text(photographer));
        let short_info = self.short_info(photo, description);
        push_field("title", short_info.clone());
        push_field("description", self.localized_descriptions(photo, description));
        push_field("depicted people", self.depicted_people(photo));
        push_field("depicted place", self.depicted_place(photo).unwrap_or_default());
        push_field(
            "date",
            photo
                .photo_date
                .clone()
                .unwrap_or_else(|| "{{unknown|date}}".to_string()),
        );
        push_field("institution", self.institution_text(photo.institution));
        push_field("references", references_text(&photo.references));
        if !photo.accession_number.trim().is_empty() {
            push_field(
                "accession number",
                links::institution_link(
                    photo.institution,
                    &photo.accession_number,
                    &photo.photo_number,
                ),
            );
        }
        push_field("source", links::source_link(photo.institution));
        push_field("notes", self.notes_text(record, &mut notes));

        let categories = self.categories(photo, date_valid);
        let filename = format!(
            "{} - {} - {}.{}",
            short_info, self.config.collection, photo.photo_number, self.config.file_extension
        );

        RenderOutcome::Published(Box::new(RenderedDocument {
            photo_number: photo.photo_number.clone(),
            institution: photo.institution,
            filename,
            fields,
            categories,
            notes,
        }))
    }

    fn resolved_id(&self, category: FieldCategory, raw: &str) -> Option<&str> {
        self.store
            .resolution(category, raw)
            .and_then(|e| e.resolved_id.as_deref())
    }

    fn resolved_category(&self, category: FieldCategory, raw: &str) -> Option<&str> {
        self.store
            .resolution(category, raw)
            .and_then(|e| e.resolved_category.as_deref())
    }

    fn photographer_text(&self, photographer: &str) -> String {
        match self.resolved_id(FieldCategory::Photographer, photographer) {
            Some(id) => links::item_link(id),
            None => photographer.to_string(),
        }
    }

    fn institution_text(&self, institution: Institution) -> String {
        match self.resolved_id(FieldCategory::Institution, institution.code()) {
            Some(id) => links::item_link(id),
            None => institution.code().to_string(),
        }
    }

    /// Depicted place, first satisfied branch only:
    /// (a) city-level place resolved → city reference alone;
    /// (b) region resolved → raw place text, region reference;
    /// (c) otherwise → raw place text, raw region text, country
    ///     reference, comma separated.
    fn depicted_place(&self, photo: &PhotoRecord) -> Option<String> {
        let place_raw = non_blank(&photo.place);
        let region_raw = non_blank(&photo.region);
        let country_raw = non_blank(&photo.country);

        if let Some(id) = place_raw.and_then(|p| self.resolved_id(FieldCategory::Place, p)) {
            return Some(links::item_link(id));
        }
        if let Some(id) = region_raw.and_then(|r| self.resolved_id(FieldCategory::Region, r)) {
            let mut parts: Vec<String> = Vec::new();
            if let Some(place) = place_raw {
                parts.push(place.to_string());
            }
            parts.push(links::item_link(id));
            return Some(parts.join(", "));
        }
        let mut parts: Vec<String> = Vec::new();
        if let Some(place) = place_raw {
            parts.push(place.to_string());
        }
        if let Some(region) = region_raw {
            parts.push(region.to_string());
        }
        if let Some(country) = country_raw {
            parts.push(match self.resolved_id(FieldCategory::Country, country) {
                Some(id) => links::item_link(id),
                None => country.to_string(),
            });
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Display label: description followed by place and country raw
    /// text, period-and-space separated.
    fn short_info(&self, photo: &PhotoRecord, description: &str) -> String {
        let mut parts = vec![description.trim_end_matches([' ', ',', '.']).to_string()];
        if let Some(place) = non_blank(&photo.place) {
            parts.push(place.to_string());
        }
        if let Some(country) = non_blank(&photo.country) {
            parts.push(country.to_string());
        }
        parts.join(". ")
    }

    /// Two language blocks. The first composes the source-language
    /// description with ethnic group, place, region, the resolved
    /// country and the event display name; the second composes the
    /// alternate-language description with resolved ethnic-group and
    /// event references. Missing components are omitted.
    fn localized_descriptions(&self, photo: &PhotoRecord, description: &str) -> String {
        let mut sv_parts = vec![description.trim_end_matches([' ', ',', '.']).to_string()];
        let ethnic: Vec<&str> = photo
            .ethnic_group
            .iter()
            .chain(photo.ethnic_group_historical.iter())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if !ethnic.is_empty() {
            sv_parts.push(ethnic.join(", "));
        }
        if let Some(place) = non_blank(&photo.place) {
            sv_parts.push(place.to_string());
        }
        if let Some(region) = non_blank(&photo.region) {
            sv_parts.push(region.to_string());
        }
        if let Some(country) = non_blank(&photo.country) {
            sv_parts.push(match self.resolved_id(FieldCategory::Country, country) {
                Some(id) => links::item_link(id),
                None => country.to_string(),
            });
        }
        if let Some(event) = non_blank(&photo.event) {
            sv_parts.push(
                self.resolved_category(FieldCategory::Event, event)
                    .unwrap_or(event)
                    .to_string(),
            );
        }
        let mut text = format!("{{{{sv|{}.}}}}", sv_parts.join(". "));

        let mut en_parts: Vec<String> = Vec::new();
        if let Some(english) = non_blank(&photo.english_description) {
            en_parts.push(english.trim_end_matches([' ', ',', '.']).to_string());
        }
        let ethnic_refs: Vec<String> = ethnic
            .iter()
            .filter_map(|e| self.resolved_id(FieldCategory::EthnicGroup, e))
            .map(links::item_link)
            .collect();
        if !ethnic_refs.is_empty() {
            en_parts.push(ethnic_refs.join(", "));
        }
        if let Some(event) = non_blank(&photo.event) {
            if let Some(id) = self.resolved_id(FieldCategory::Event, event) {
                en_parts.push(links::item_link(id));
            }
        }
        if !en_parts.is_empty() {
            text.push_str(&format!("\n{{{{en|{}.}}}}", en_parts.join(". ")));
        }
        text
    }

    fn depicted_people(&self, photo: &PhotoRecord) -> String {
        let people: Vec<String> = photo
            .depicted_persons
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|person| match self.resolved_id(FieldCategory::Person, person) {
                Some(id) => id.to_string(),
                None => person.to_string(),
            })
            .collect();
        if people.is_empty() {
            String::new()
        } else {
            format!("{{{{depicted person|{}}}}}", people.join("|"))
        }
    }

    /// Archive card links and external same-as links. Cards under
    /// institutions without a link template and external ids with
    /// unknown prefixes are omitted and noted.
    fn notes_text(&self, record: &MergedRecord, notes: &mut Vec<RenderNote>) -> String {
        let mut card_links = Vec::new();
        let mut unsupported: Vec<Institution> = Vec::new();
        for card in &record.cards {
            match links::archive_card_link(card) {
                Some(link) => card_links.push(link),
                None => unsupported.push(card.institution),
            }
        }
        unsupported.dedup();
        for institution in unsupported {
            let count = record
                .cards
                .iter()
                .filter(|c| c.institution == institution)
                .count();
            notes.push(RenderNote::UnsupportedInstitutionCards { institution, count });
        }

        let mut external_links = Vec::new();
        for external_id in &record.photo.external_same_as {
            match links::external_link(external_id) {
                Some(link) => external_links.push(link),
                None => notes.push(RenderNote::UnknownExternalId(external_id.clone())),
            }
        }

        let mut text = String::new();
        if !card_links.is_empty() {
            text.push_str(&format!(
                "Related archive card(s): {}",
                card_links.join(", ")
            ));
        }
        if !external_links.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&format!(
                "Id in other archives: {}",
                external_links.join(", ")
            ));
        }
        text
    }

    /// Category list in fixed priority order; resolved values only, at
    /// most one place-level category, duplicates removed.
    fn categories(&self, photo: &PhotoRecord, date_valid: bool) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        let mut push = |cat: String, categories: &mut Vec<String>| {
            if !cat.is_empty() && !categories.contains(&cat) {
                categories.push(cat);
            }
        };

        if let Some(event) = non_blank(&photo.event) {
            if let Some(cat) = self.resolved_category(FieldCategory::Event, event) {
                push(cat.to_string(), &mut categories);
            }
        }
        for (category, values) in [
            (FieldCategory::MotifKeyword, &photo.motif_keywords),
            (FieldCategory::SearchKeyword, &photo.search_keywords),
            (FieldCategory::Person, &photo.depicted_persons),
        ] {
            for value in values {
                if let Some(cat) = self.resolved_category(category, value) {
                    push(cat.to_string(), &mut categories);
                }
            }
        }

        // The first available of city/region/country, never more than
        // one of the three.
        let place_level = [
            (FieldCategory::Place, &photo.place),
            (FieldCategory::Region, &photo.region),
            (FieldCategory::Country, &photo.country),
        ]
        .into_iter()
        .find_map(|(category, value)| {
            non_blank(value).and_then(|v| self.resolved_category(category, v))
        });
        if let Some(cat) = place_level {
            push(cat.to_string(), &mut categories);
        }

        for value in photo
            .ethnic_group
            .iter()
            .chain(photo.ethnic_group_historical.iter())
        {
            if let Some(cat) = self.resolved_category(FieldCategory::EthnicGroup, value) {
                push(cat.to_string(), &mut categories);
            }
        }

        push(self.config.batch_category(), &mut categories);
        if !date_valid {
            push(self.config.bad_dates_category(), &mut categories);
        }
        categories
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn references_text(references: &[String]) -> String {
    let refs: Vec<&str> = references
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    match refs.len() {
        0 => String::new(),
        1 => refs[0].to_string(),
        _ => format!("* {}", refs.join("\n* ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fotobatch_common::mappings::MappingEntry;

    fn base_photo() -> PhotoRecord {
        PhotoRecord {
            photo_number: "0301.0001".to_string(),
            accession_number: "12345".to_string(),
            post_number: "P1".to_string(),
            institution: Institution::Em,
            photographer: Some("A. Svensson".to_string()),
            description: Some("Group portrait".to_string()),
            country: Some("Bolivia".to_string()),
            ..Default::default()
        }
    }

    fn merged(photo: PhotoRecord) -> MergedRecord {
        MergedRecord {
            photo,
            cards: Vec::new(),
        }
    }

    fn mapped(category: FieldCategory, raw: &str, id: Option<&str>, cat: Option<&str>) -> MappingEntry {
        MappingEntry {
            field_category: category,
            raw_value: raw.to_string(),
            resolved_id: id.map(str::to_string),
            resolved_category: cat.map(str::to_string),
            status: MappingStatus::Mapped,
        }
    }

    fn base_store() -> MappingStore {
        MappingStore {
            entries: vec![mapped(
                FieldCategory::Country,
                "Bolivia",
                Some("Q750"),
                Some("Bolivia"),
            )],
        }
    }

    fn render(photo: PhotoRecord, store: &MappingStore) -> RenderOutcome {
        let config = RunConfig::default();
        Renderer::new(store, &config).render(&merged(photo))
    }

    fn published(outcome: RenderOutcome) -> RenderedDocument {
        match outcome {
            RenderOutcome::Published(doc) => *doc,
            RenderOutcome::Rejected(rejection) => {
                panic!("expected published, got {:?}", rejection)
            }
        }
    }

    fn field<'d>(doc: &'d RenderedDocument, key: &str) -> Option<&'d str> {
        doc.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn missing_photographer_is_refused() {
        let mut photo = base_photo();
        photo.photographer = Some("   ".to_string());
        match render(photo, &base_store()) {
            RenderOutcome::Rejected(rejection) => {
                assert_eq!(rejection.reason, RejectReason::MissingPhotographer);
                assert_eq!(rejection.photo_number, "0301.0001");
            }
            RenderOutcome::Published(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn missing_description_is_refused() {
        let mut photo = base_photo();
        photo.description = None;
        match render(photo, &base_store()) {
            RenderOutcome::Rejected(rejection) => {
                assert_eq!(rejection.reason, RejectReason::MissingDescription);
            }
            RenderOutcome::Published(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn unmapped_required_country_is_refused() {
        let photo = base_photo();
        // store has the country but only as an uncurated entry
        let store = MappingStore {
            entries: vec![MappingEntry::unmapped(FieldCategory::Country, "Bolivia")],
        };
        match render(photo, &store) {
            RenderOutcome::Rejected(rejection) => {
                assert_eq!(rejection.reason.tag(), "unmapped-required-field");
            }
            RenderOutcome::Published(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn depicted_place_city_branch_fires_alone() {
        let mut photo = base_photo();
        photo.place = Some("La Paz".to_string());
        photo.region = Some("Altiplano".to_string());
        let mut store = base_store();
        store.entries.push(mapped(
            FieldCategory::Place,
            "La Paz",
            Some("Q1491"),
            None,
        ));
        store.entries.push(mapped(
            FieldCategory::Region,
            "Altiplano",
            Some("Q133177"),
            None,
        ));
        let doc = published(render(photo, &store));
        assert_eq!(field(&doc, "depicted place"), Some("{{item|Q1491}}"));
    }

    #[test]
    fn depicted_place_region_branch_keeps_raw_place() {
        let mut photo = base_photo();
        photo.place = Some("La Paz".to_string());
        photo.region = Some("Altiplano".to_string());
        let mut store = base_store();
        store.entries.push(mapped(
            FieldCategory::Region,
            "Altiplano",
            Some("Q133177"),
            None,
        ));
        let doc = published(render(photo, &store));
        assert_eq!(
            field(&doc, "depicted place"),
            Some("La Paz, {{item|Q133177}}")
        );
    }

    #[test]
    fn depicted_place_falls_through_to_country() {
        let mut photo = base_photo();
        photo.place = Some("La Paz".to_string());
        photo.region = Some("Altiplano".to_string());
        let doc = published(render(photo, &base_store()));
        assert_eq!(
            field(&doc, "depicted place"),
            Some("La Paz, Altiplano, {{item|Q750}}")
        );
    }

    #[test]
    fn date_shapes_match_strictly() {
        for valid in ["1932", "1932-05", "1932-05-14"] {
            assert!(photo_date_is_valid(valid), "{valid}");
        }
        for invalid in ["14-05-1932", "1932/05", "May 1932", "1932-13", "1932-02-30", ""] {
            assert!(!photo_date_is_valid(invalid), "{invalid}");
        }
    }

    #[test]
    fn bad_date_adds_category_but_still_publishes() {
        let mut photo = base_photo();
        photo.photo_date = Some("May 1932".to_string());
        let doc = published(render(photo, &base_store()));
        let config = RunConfig::default();
        assert!(doc.categories.contains(&config.bad_dates_category()));
        assert_eq!(field(&doc, "date"), Some("May 1932"));
        assert!(doc
            .notes
            .iter()
            .any(|n| matches!(n, RenderNote::BadDateShape(_))));
    }

    #[test]
    fn valid_date_has_no_bad_dates_category() {
        let mut photo = base_photo();
        photo.photo_date = Some("1932-05-14".to_string());
        let doc = published(render(photo, &base_store()));
        let config = RunConfig::default();
        assert!(!doc.categories.contains(&config.bad_dates_category()));
    }

    #[test]
    fn category_list_never_contains_unresolved_values() {
        let mut photo = base_photo();
        photo.motif_keywords = vec!["boat".to_string(), "mask".to_string()];
        let mut store = base_store();
        store.entries.push(mapped(
            FieldCategory::MotifKeyword,
            "boat",
            None,
            Some("Boats in Bolivia"),
        ));
        store
            .entries
            .push(MappingEntry::unmapped(FieldCategory::MotifKeyword, "mask"));
        let doc = published(render(photo, &store));
        assert!(doc.categories.contains(&"Boats in Bolivia".to_string()));
        assert!(!doc.categories.iter().any(|c| c.contains("mask")));
        assert!(doc.categories.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn at_most_one_place_level_category() {
        let mut photo = base_photo();
        photo.place = Some("La Paz".to_string());
        let mut store = MappingStore {
            entries: vec![mapped(
                FieldCategory::Country,
                "Bolivia",
                Some("Q750"),
                Some("Bolivia"),
            )],
        };
        store.entries.push(mapped(
            FieldCategory::Place,
            "La Paz",
            None,
            Some("La Paz"),
        ));
        let doc = published(render(photo, &store));
        assert!(doc.categories.contains(&"La Paz".to_string()));
        assert!(!doc.categories.contains(&"Bolivia".to_string()));
    }

    #[test]
    fn batch_category_is_always_present() {
        let doc = published(render(base_photo(), &base_store()));
        let config = RunConfig::default();
        assert!(doc.categories.contains(&config.batch_category()));
    }

    #[test]
    fn unknown_external_ids_are_dropped_with_a_note() {
        let mut photo = base_photo();
        photo.external_same_as = vec![
            "gnm:photo/GNM1234".to_string(),
            "xyz:456".to_string(),
        ];
        let doc = published(render(photo, &base_store()));
        let notes_field = field(&doc, "notes").unwrap();
        assert!(notes_field.contains("{{GNM-link|photo/GNM1234}}"));
        assert!(!notes_field.contains("456"));
        assert!(doc
            .notes
            .iter()
            .any(|n| matches!(n, RenderNote::UnknownExternalId(id) if id == "xyz:456")));
    }

    #[test]
    fn unsupported_institution_cards_are_omitted() {
        let mut record = merged(base_photo());
        record.photo.institution = Institution::Om;
        record.cards = vec![fotobatch_common::records::ArchiveCard {
            card_id: "K1".to_string(),
            post_number: "P1".to_string(),
            institution: Institution::Om,
        }];
        let config = RunConfig::default();
        let store = base_store();
        let doc = match Renderer::new(&store, &config).render(&record) {
            RenderOutcome::Published(doc) => *doc,
            RenderOutcome::Rejected(r) => panic!("expected published, got {r:?}"),
        };
        assert!(field(&doc, "notes").is_none());
        assert!(doc.notes.iter().any(|n| matches!(
            n,
            RenderNote::UnsupportedInstitutionCards { count: 1, .. }
        )));
    }

    #[test]
    fn graceful_degradation_for_unmapped_optional_fields() {
        let mut photo = base_photo();
        photo.depicted_persons = vec!["Erland Nordenskiöld".to_string()];
        let doc = published(render(photo, &base_store()));
        assert_eq!(
            field(&doc, "depicted people"),
            Some("{{depicted person|Erland Nordenskiöld}}")
        );
        // photographer has no mapping either: raw text, no link
        assert_eq!(field(&doc, "photographer"), Some("A. Svensson"));
    }

    #[test]
    fn filename_carries_collection_and_extension() {
        let doc = published(render(base_photo(), &base_store()));
        assert_eq!(doc.filename, "Group portrait. Bolivia - SMVK - 0301.0001.tif");
    }
}
