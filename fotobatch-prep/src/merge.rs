//! Merge two institutions' paired datasets into one unified record set.
//!
//! Merge strategy:
//! - Photo sets are concatenated in input order (set A before set B).
//! - Photo identity must be unique across the combined set. Institutions
//!   are expected to use disjoint numbering, so a collision signals bad
//!   input: the colliding records are reported and excluded, the rest of
//!   the batch proceeds.
//! - Archive cards attach by post number, within the same institution
//!   only. Cards with no matching photo are returned as orphans, never
//!   silently dropped.
//!
//! A pure function: identical inputs always yield identical merged
//! sequences, orphan lists and diagnostics.

use fotobatch_common::records::{ArchiveCard, Institution, MergedRecord, PhotoRecord};
use std::collections::HashMap;
use std::fmt;

/// Batch-level structural problems found during a merge. Reported
/// alongside the result; not fatal to the run.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeDiagnostic {
    /// The same photo number appeared more than once in the combined
    /// set. All carriers are excluded from the merge result.
    DuplicatePhotoNumber {
        photo_number: String,
        institutions: Vec<Institution>,
    },
    /// A card's post number matched more than one photo record of its
    /// institution. The card went to the first match in input order.
    AmbiguousArchiveCard {
        card_id: String,
        post_number: String,
        institution: Institution,
    },
}

impl fmt::Display for MergeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePhotoNumber {
                photo_number,
                institutions,
            } => {
                let codes: Vec<&str> = institutions.iter().map(|i| i.code()).collect();
                write!(
                    f,
                    "duplicate photo number {} (seen in {}); records excluded",
                    photo_number,
                    codes.join(", ")
                )
            }
            Self::AmbiguousArchiveCard {
                card_id,
                post_number,
                institution,
            } => write!(
                f,
                "archive card {} ({}) matches several {} records for post number {}; attached to the first",
                card_id, institution, institution, post_number
            ),
        }
    }
}

/// Result of merging two institutions' datasets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    pub records: Vec<MergedRecord>,
    pub orphan_cards: Vec<ArchiveCard>,
    pub diagnostics: Vec<MergeDiagnostic>,
}

/// Combine two paired record sets into one unified set.
pub fn merge(
    photos_a: &[PhotoRecord],
    cards_a: &[ArchiveCard],
    photos_b: &[PhotoRecord],
    cards_b: &[ArchiveCard],
) -> MergeOutcome {
    let photos: Vec<&PhotoRecord> = photos_a.iter().chain(photos_b.iter()).collect();
    let cards: Vec<&ArchiveCard> = cards_a.iter().chain(cards_b.iter()).collect();
    let mut diagnostics = Vec::new();

    // Identity check across the combined set.
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for photo in &photos {
        *seen.entry(photo.photo_number.as_str()).or_insert(0) += 1;
    }
    let mut duplicates_reported: HashMap<&str, bool> = HashMap::new();
    let mut kept: Vec<&PhotoRecord> = Vec::with_capacity(photos.len());
    for photo in &photos {
        if seen[photo.photo_number.as_str()] > 1 {
            let reported = duplicates_reported
                .entry(photo.photo_number.as_str())
                .or_insert(false);
            if !*reported {
                *reported = true;
                let institutions = photos
                    .iter()
                    .filter(|p| p.photo_number == photo.photo_number)
                    .map(|p| p.institution)
                    .collect();
                tracing::warn!(
                    photo_number = %photo.photo_number,
                    "duplicate photo number across combined set; excluding"
                );
                diagnostics.push(MergeDiagnostic::DuplicatePhotoNumber {
                    photo_number: photo.photo_number.clone(),
                    institutions,
                });
            }
        } else {
            kept.push(*photo);
        }
    }

    // Attach cards within the owning institution. First match in input
    // order wins; further matches are diagnosed, keeping the
    // one-card-one-record invariant.
    let mut records: Vec<MergedRecord> = kept
        .into_iter()
        .map(|photo| MergedRecord {
            photo: photo.clone(),
            cards: Vec::new(),
        })
        .collect();
    let mut orphan_cards = Vec::new();
    for card in cards {
        let mut matches = records.iter_mut().filter(|r| {
            r.photo.institution == card.institution && r.photo.post_number == card.post_number
        });
        match matches.next() {
            Some(record) => {
                if matches.next().is_some() {
                    diagnostics.push(MergeDiagnostic::AmbiguousArchiveCard {
                        card_id: card.card_id.clone(),
                        post_number: card.post_number.clone(),
                        institution: card.institution,
                    });
                }
                record.cards.push(card.clone());
            }
            None => {
                tracing::debug!(card_id = %card.card_id, "orphan archive card");
                orphan_cards.push(card.clone());
            }
        }
    }

    tracing::info!(
        records = records.len(),
        orphans = orphan_cards.len(),
        diagnostics = diagnostics.len(),
        "merge complete"
    );
    MergeOutcome {
        records,
        orphan_cards,
        diagnostics,
    }
}
