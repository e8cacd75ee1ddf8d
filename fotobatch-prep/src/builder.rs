//! Mapping-store update pass.
//!
//! Scans a unified record set, collects the distinct raw values per
//! mappable field category, and folds them into the prior store:
//!
//! 1. Values not yet in the store are added as `unmapped` entries, in
//!    first-observed order.
//! 2. Prior entries whose value was not observed are marked `stale` but
//!    retained verbatim otherwise. Curated data is never lost.
//! 3. Entries present in both keep their resolution fields untouched;
//!    their status is recomputed from those fields (`mapped` when a
//!    curator has filled something in, else `unmapped`). This is also
//!    what flips a `stale` entry back when its value reappears.
//!
//! The output is a deterministic function of the input records and the
//! prior store.

use fotobatch_common::mappings::{
    normalize_raw_value, FieldCategory, MappingEntry, MappingStatus, MappingStore,
};
use fotobatch_common::records::{category_values, MergedRecord};
use std::collections::HashSet;

/// Produce the updated store for the next curation round.
pub fn update_mappings(records: &[MergedRecord], prior: &MappingStore) -> MappingStore {
    let observed = observe_values(records);
    let observed_keys: HashSet<(FieldCategory, &str)> = observed
        .iter()
        .map(|(category, value)| (*category, value.as_str()))
        .collect();

    let mut entries = Vec::with_capacity(prior.len() + observed.len());

    // Carry over prior entries in their existing relative order.
    for entry in &prior.entries {
        let mut entry = entry.clone();
        if observed_keys.contains(&(entry.field_category, entry.raw_value.as_str())) {
            entry.status = if entry.is_resolved() {
                MappingStatus::Mapped
            } else {
                MappingStatus::Unmapped
            };
        } else {
            entry.status = MappingStatus::Stale;
        }
        entries.push(entry);
    }

    // Append newly observed values in first-observed order.
    let mut added = 0usize;
    for (category, value) in &observed {
        if !entries
            .iter()
            .any(|e| e.field_category == *category && e.raw_value == *value)
        {
            entries.push(MappingEntry::unmapped(*category, value.clone()));
            added += 1;
        }
    }
    let stale = entries
        .iter()
        .filter(|e| e.status == MappingStatus::Stale)
        .count();
    tracing::info!(
        observed = observed.len(),
        added,
        stale,
        total = entries.len(),
        "mapping store updated"
    );

    MappingStore { entries }
}

/// Distinct (category, normalized raw value) pairs across all records,
/// in first-observed order: record order first, then category scan
/// order, then field order within a record.
fn observe_values(records: &[MergedRecord]) -> Vec<(FieldCategory, String)> {
    let mut observed = Vec::new();
    let mut seen: HashSet<(FieldCategory, String)> = HashSet::new();
    for record in records {
        for category in FieldCategory::ALL {
            for value in category_values(&record.photo, category) {
                let value = normalize_raw_value(&value).to_string();
                if value.is_empty() {
                    continue;
                }
                if seen.insert((category, value.clone())) {
                    observed.push((category, value));
                }
            }
        }
    }
    observed
}
