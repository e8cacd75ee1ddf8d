//! Link templates for rendered output.
//!
//! All wiki-template formatting for identifiers lives here: resolved
//! knowledge-base references, per-institution database links, archive
//! card links, and external-archive links.

use fotobatch_common::records::{ArchiveCard, Institution};

/// A reference to a resolved knowledge-base item.
pub fn item_link(id: &str) -> String {
    format!("{{{{item|{id}}}}}")
}

/// Database link for a photo record's accession number.
///
/// MM identifiers carry their own prefix, so the code is not repeated
/// inside the template arguments for that museum.
pub fn institution_link(institution: Institution, db_id: &str, label: &str) -> String {
    match institution {
        Institution::Mm => format!("{{{{SMVK-MM-link|{db_id}|{label}}}}}"),
        other => format!("{{{{SMVK-{}-link|{}|{}}}}}", other.code(), db_id, label),
    }
}

/// Source statement for a record's owning museum.
pub fn source_link(institution: Institution) -> String {
    format!(
        "{{{{SMVK cooperation project|museum={}}}}}",
        institution.code()
    )
}

/// Link for one attached archive card.
///
/// Only EM and MM have archive-card link templates on the target
/// repository; cards under any other institution render as `None` and
/// are omitted from output (a documented limitation, not an error).
pub fn archive_card_link(card: &ArchiveCard) -> Option<String> {
    match card.institution {
        Institution::Em | Institution::Mm => Some(format!(
            "{{{{SMVK-{}-archive-link|{}|{}}}}}",
            card.institution.code(),
            card.post_number,
            card.card_id
        )),
        _ => None,
    }
}

/// Link for an `externalSameAs` identifier of the form `prefix:localId`.
///
/// Returns `None` for unrecognized prefixes; the caller decides whether
/// to diagnose. The prefix table is the single place to extend when a
/// new external archive is supported.
pub fn external_link(external_id: &str) -> Option<String> {
    let (prefix, local_id) = external_id.split_once(':')?;
    match prefix {
        "gnm" => Some(format!("{{{{GNM-link|{local_id}}}}}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_links_wrap_the_identifier() {
        assert_eq!(item_link("Q750"), "{{item|Q750}}");
    }

    #[test]
    fn mm_links_omit_the_repeated_code() {
        assert_eq!(
            institution_link(Institution::Em, "12345", "0001.0001"),
            "{{SMVK-EM-link|12345|0001.0001}}"
        );
        assert_eq!(
            institution_link(Institution::Mm, "MM12345", "0001.0001"),
            "{{SMVK-MM-link|MM12345|0001.0001}}"
        );
    }

    #[test]
    fn archive_cards_only_link_for_supported_institutions() {
        let mut card = ArchiveCard {
            card_id: "K1".to_string(),
            post_number: "P1".to_string(),
            institution: Institution::Em,
        };
        assert_eq!(
            archive_card_link(&card).unwrap(),
            "{{SMVK-EM-archive-link|P1|K1}}"
        );
        card.institution = Institution::Om;
        assert!(archive_card_link(&card).is_none());
    }

    #[test]
    fn external_links_require_a_known_prefix() {
        assert_eq!(
            external_link("gnm:photo/GNM1234").unwrap(),
            "{{GNM-link|photo/GNM1234}}"
        );
        assert!(external_link("unknown:123").is_none());
        assert!(external_link("no-prefix-here").is_none());
    }
}
