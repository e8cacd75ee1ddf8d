//! Run outputs: publication units for the uploader and the reject
//! report.
//!
//! Published records serialize as ordered key→text pairs plus the
//! ordered category list; rejected records go to a separate report with
//! enough identity to locate the source row. Both documents are written
//! atomically so an aborted run leaves no partial output.

use crate::render::{RenderedDocument, Rejection};
use fotobatch_common::fsio::write_atomic;
use fotobatch_common::Result;
use serde::Serialize;
use std::path::Path;

/// One key→text pair of a publication unit. Serialized as an array
/// element to preserve field order.
#[derive(Debug, Clone, Serialize)]
pub struct KeyText {
    pub key: String,
    pub text: String,
}

/// One publishable record, in the form the uploader consumes.
#[derive(Debug, Clone, Serialize)]
pub struct OutputUnit {
    pub photo_number: String,
    pub institution: String,
    pub status: String,
    pub filename: String,
    pub fields: Vec<KeyText>,
    pub categories: Vec<String>,
}

impl From<&RenderedDocument> for OutputUnit {
    fn from(doc: &RenderedDocument) -> Self {
        Self {
            photo_number: doc.photo_number.clone(),
            institution: doc.institution.code().to_string(),
            status: "published".to_string(),
            filename: doc.filename.clone(),
            fields: doc
                .fields
                .iter()
                .map(|(key, text)| KeyText {
                    key: key.clone(),
                    text: text.clone(),
                })
                .collect(),
            categories: doc.categories.clone(),
        }
    }
}

/// One refused record in the reject report.
#[derive(Debug, Clone, Serialize)]
pub struct RejectRow {
    pub photo_number: String,
    pub institution: String,
    pub status: String,
    pub reason: String,
}

impl From<&Rejection> for RejectRow {
    fn from(rejection: &Rejection) -> Self {
        Self {
            photo_number: rejection.photo_number.clone(),
            institution: rejection.institution.code().to_string(),
            status: format!("rejected:{}", rejection.reason.tag()),
            reason: rejection.reason.to_string(),
        }
    }
}

/// Write the publication units as a JSON document, atomically.
pub fn write_output_units(path: &Path, documents: &[RenderedDocument]) -> Result<()> {
    let units: Vec<OutputUnit> = documents.iter().map(OutputUnit::from).collect();
    let mut json = serde_json::to_string_pretty(&units)?;
    json.push('\n');
    write_atomic(path, &json)?;
    tracing::info!(path = %path.display(), units = units.len(), "wrote publication units");
    Ok(())
}

/// Write the reject report as a JSON document, atomically.
pub fn write_reject_report(path: &Path, rejections: &[Rejection]) -> Result<()> {
    let rows: Vec<RejectRow> = rejections.iter().map(RejectRow::from).collect();
    let mut json = serde_json::to_string_pretty(&rows)?;
    json.push('\n');
    write_atomic(path, &json)?;
    tracing::info!(path = %path.display(), rejects = rows.len(), "wrote reject report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RejectReason;
    use fotobatch_common::records::Institution;

    #[test]
    fn reject_rows_carry_identity_and_tagged_status() {
        let rejection = Rejection {
            photo_number: "0001".to_string(),
            institution: Institution::Em,
            reason: RejectReason::MissingDescription,
        };
        let row = RejectRow::from(&rejection);
        assert_eq!(row.status, "rejected:missing-description");
        assert_eq!(row.institution, "EM");
        assert_eq!(row.photo_number, "0001");
    }

    #[test]
    fn output_units_preserve_field_order() {
        let doc = RenderedDocument {
            photo_number: "0001".to_string(),
            institution: Institution::Em,
            filename: "x - SMVK - 0001.tif".to_string(),
            fields: vec![
                ("photographer".to_string(), "A".to_string()),
                ("title".to_string(), "B".to_string()),
            ],
            categories: vec!["Cat".to_string()],
            notes: Vec::new(),
        };
        let unit = OutputUnit::from(&doc);
        let json = serde_json::to_string(&unit).unwrap();
        let photographer = json.find("photographer").unwrap();
        let title = json.find("title").unwrap();
        assert!(photographer < title);
        assert_eq!(unit.status, "published");
    }

    #[test]
    fn reports_write_and_replace_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rejects.json");
        write_reject_report(&path, &[]).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first.trim(), "[]");

        let rejection = Rejection {
            photo_number: "0001".to_string(),
            institution: Institution::Mm,
            reason: RejectReason::MissingPhotographer,
        };
        write_reject_report(&path, &[rejection]).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();
        assert!(second.contains("rejected:missing-photographer"));
    }
}
