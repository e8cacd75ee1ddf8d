//! Delimited-text parsing for the source metadata files.
//!
//! Each dataset is field-delimited text with a header row naming every
//! column. The column-name → record-field mapping lives in the table
//! layouts defined here and nowhere else; the parser itself knows
//! nothing about specific columns.
//!
//! The source data uses `¤` as the cell delimiter, a multi-byte
//! character, so cells are split per `char` rather than handed to a
//! byte-delimited CSV reader.

use fotobatch_common::records::{ArchiveCard, Institution, PhotoRecord};
use fotobatch_common::{Error, Result};
use std::collections::HashMap;

// Record field names used by the layouts and the row-to-record
// constructors below.
const PHOTO_NUMBER: &str = "photo_number";
const ACCESSION_NUMBER: &str = "accession_number";
const POST_NUMBER: &str = "post_number";
const INSTITUTION: &str = "institution";
const PHOTOGRAPHER: &str = "photographer";
const DESCRIPTION: &str = "description";
const ENGLISH_DESCRIPTION: &str = "english_description";
const EVENT: &str = "event";
const DEPICTED_PERSONS: &str = "depicted_persons";
const MOTIF_KEYWORDS: &str = "motif_keywords";
const SEARCH_KEYWORDS: &str = "search_keywords";
const COUNTRY: &str = "country";
const REGION: &str = "region";
const PLACE: &str = "place";
const ETHNIC_GROUP: &str = "ethnic_group";
const ETHNIC_GROUP_HISTORICAL: &str = "ethnic_group_historical";
const GEOGRAPHIC_NAME_OTHER: &str = "geographic_name_other";
const REFERENCES: &str = "references";
const PHOTO_DATE: &str = "photo_date";
const EXTERNAL_SAME_AS: &str = "external_same_as";
const CARD_ID: &str = "card_id";

/// One column in a table layout.
#[derive(Debug, Clone)]
pub struct Column {
    /// Exact header text in the source file.
    pub header: String,
    /// Record field the column feeds.
    pub field: String,
    /// Whether the cell holds a list (split on the list delimiter).
    pub is_list: bool,
}

impl Column {
    fn scalar(header: &str, field: &str) -> Self {
        Self {
            header: header.to_string(),
            field: field.to_string(),
            is_list: false,
        }
    }

    fn list(header: &str, field: &str) -> Self {
        Self {
            header: header.to_string(),
            field: field.to_string(),
            is_list: true,
        }
    }
}

/// Column mapping for one table. Supplied by configuration in principle;
/// the two layouts below match the delivered datasets.
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub columns: Vec<Column>,
}

impl TableLayout {
    fn expected_header(&self, delimiter: char) -> String {
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header.as_str()).collect();
        headers.join(&delimiter.to_string())
    }
}

/// Layout of the primary (photo record) dataset.
///
/// This is the only place where the original column names of the main
/// file are mentioned.
pub fn photo_layout() -> TableLayout {
    TableLayout {
        columns: vec![
            Column::scalar("Fotonummer", PHOTO_NUMBER),
            Column::scalar("Accessionsnr", ACCESSION_NUMBER),
            Column::scalar("Postnr.", POST_NUMBER),
            Column::scalar("Beskrivning", DESCRIPTION),
            Column::list("Motivord", MOTIF_KEYWORDS),
            Column::list("Sökord", SEARCH_KEYWORDS),
            Column::scalar("Händelse", EVENT),
            Column::list("Etnisk grupp", ETHNIC_GROUP),
            Column::list("Etn, tidigare", ETHNIC_GROUP_HISTORICAL),
            Column::list("Personnamn, avbildad", DEPICTED_PERSONS),
            Column::scalar("Land, fotograferad", COUNTRY),
            Column::scalar("Region, fotograferad i", REGION),
            Column::scalar("Ort, fotograferad i", PLACE),
            Column::list("Geografiskt namn, annat", GEOGRAPHIC_NAME_OTHER),
            Column::scalar("Fotograf", PHOTOGRAPHER),
            Column::scalar("Fotodatum", PHOTO_DATE),
            Column::scalar("Beskrivning, engelska", ENGLISH_DESCRIPTION),
            Column::list("Referens", REFERENCES),
            Column::list("Objekt, externt / samma som", EXTERNAL_SAME_AS),
            Column::scalar("Museum", INSTITUTION),
        ],
    }
}

/// Layout of the archive-card dataset.
///
/// This is the only place where the original column names of the archive
/// file are mentioned.
pub fn archive_layout() -> TableLayout {
    TableLayout {
        columns: vec![
            Column::scalar("Id", CARD_ID),
            Column::scalar("Postnr", POST_NUMBER),
            Column::scalar("Museum", INSTITUTION),
        ],
    }
}

/// One parsed data row: record field → values. Scalar columns hold at
/// most one value; empty cells are absent.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: HashMap<String, Vec<String>>,
}

impl Row {
    fn scalar(&self, field: &str) -> Option<String> {
        self.values
            .get(field)
            .and_then(|v| v.first())
            .map(|s| s.to_string())
    }

    fn required(&self, field: &str, line: usize) -> Result<String> {
        self.scalar(field)
            .ok_or_else(|| Error::Tabular(format!("line {line}: missing value for {field}")))
    }

    fn list(&self, field: &str) -> Vec<String> {
        self.values.get(field).cloned().unwrap_or_default()
    }
}

/// Parse delimited text against a layout. The header row must match the
/// layout exactly; any cell-count mismatch on a data row is an error
/// naming the line.
pub fn parse_table(
    contents: &str,
    layout: &TableLayout,
    delimiter: char,
    list_delimiter: char,
) -> Result<Vec<Row>> {
    let mut lines = contents.lines().enumerate();
    let (_, header) = lines
        .next()
        .ok_or_else(|| Error::Tabular("empty input".to_string()))?;
    let expected = layout.expected_header(delimiter);
    if header != expected {
        return Err(Error::Tabular(format!(
            "header mismatch: expected {expected:?}, found {header:?}"
        )));
    }

    let mut rows = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(delimiter).collect();
        if cells.len() != layout.columns.len() {
            return Err(Error::Tabular(format!(
                "line {}: expected {} cells, found {}",
                idx + 1,
                layout.columns.len(),
                cells.len()
            )));
        }

        let mut row = Row::default();
        for (column, cell) in layout.columns.iter().zip(cells) {
            let values: Vec<String> = if column.is_list {
                cell.split(list_delimiter)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            } else {
                let trimmed = cell.trim();
                if trimmed.is_empty() {
                    Vec::new()
                } else {
                    vec![trimmed.to_string()]
                }
            };
            if !values.is_empty() {
                row.values.insert(column.field.clone(), values);
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Parse the primary dataset into validated photo records.
pub fn photo_records(
    contents: &str,
    delimiter: char,
    list_delimiter: char,
) -> Result<Vec<PhotoRecord>> {
    let layout = photo_layout();
    let rows = parse_table(contents, &layout, delimiter, list_delimiter)?;
    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let line = idx + 2; // 1-based, after the header
        let record = PhotoRecord {
            photo_number: row.required(PHOTO_NUMBER, line)?,
            accession_number: row.scalar(ACCESSION_NUMBER).unwrap_or_default(),
            post_number: row.required(POST_NUMBER, line)?,
            institution: Institution::from_code(&row.required(INSTITUTION, line)?)?,
            photographer: row.scalar(PHOTOGRAPHER),
            description: row.scalar(DESCRIPTION),
            english_description: row.scalar(ENGLISH_DESCRIPTION),
            event: row.scalar(EVENT),
            depicted_persons: row.list(DEPICTED_PERSONS),
            motif_keywords: row.list(MOTIF_KEYWORDS),
            search_keywords: row.list(SEARCH_KEYWORDS),
            country: row.scalar(COUNTRY),
            region: row.scalar(REGION),
            place: row.scalar(PLACE),
            ethnic_group: row.list(ETHNIC_GROUP),
            ethnic_group_historical: row.list(ETHNIC_GROUP_HISTORICAL),
            geographic_name_other: row.list(GEOGRAPHIC_NAME_OTHER),
            references: row.list(REFERENCES),
            photo_date: row.scalar(PHOTO_DATE),
            external_same_as: row.list(EXTERNAL_SAME_AS),
        };
        record.validate()?;
        records.push(record);
    }
    Ok(records)
}

/// Parse the archive-card dataset into validated cards.
pub fn archive_cards(
    contents: &str,
    delimiter: char,
    list_delimiter: char,
) -> Result<Vec<ArchiveCard>> {
    let layout = archive_layout();
    let rows = parse_table(contents, &layout, delimiter, list_delimiter)?;
    let mut cards = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let line = idx + 2;
        let card = ArchiveCard {
            card_id: row.required(CARD_ID, line)?,
            post_number: row.required(POST_NUMBER, line)?,
            institution: Institution::from_code(&row.required(INSTITUTION, line)?)?,
        };
        card.validate()?;
        cards.push(card);
    }
    Ok(cards)
}

/// Serialize photo records back into the same tabular format they were
/// loaded from, so merged datasets can feed a later run.
pub fn write_photo_records(
    records: &[PhotoRecord],
    delimiter: char,
    list_delimiter: char,
) -> String {
    let layout = photo_layout();
    let mut out = String::new();
    out.push_str(&layout.expected_header(delimiter));
    out.push('\n');
    let sep = list_delimiter.to_string();
    for record in records {
        let cells: Vec<String> = layout
            .columns
            .iter()
            .map(|column| match column.field.as_str() {
                PHOTO_NUMBER => record.photo_number.clone(),
                ACCESSION_NUMBER => record.accession_number.clone(),
                POST_NUMBER => record.post_number.clone(),
                INSTITUTION => record.institution.code().to_string(),
                PHOTOGRAPHER => record.photographer.clone().unwrap_or_default(),
                DESCRIPTION => record.description.clone().unwrap_or_default(),
                ENGLISH_DESCRIPTION => record.english_description.clone().unwrap_or_default(),
                EVENT => record.event.clone().unwrap_or_default(),
                DEPICTED_PERSONS => record.depicted_persons.join(&sep),
                MOTIF_KEYWORDS => record.motif_keywords.join(&sep),
                SEARCH_KEYWORDS => record.search_keywords.join(&sep),
                COUNTRY => record.country.clone().unwrap_or_default(),
                REGION => record.region.clone().unwrap_or_default(),
                PLACE => record.place.clone().unwrap_or_default(),
                ETHNIC_GROUP => record.ethnic_group.join(&sep),
                ETHNIC_GROUP_HISTORICAL => record.ethnic_group_historical.join(&sep),
                GEOGRAPHIC_NAME_OTHER => record.geographic_name_other.join(&sep),
                REFERENCES => record.references.join(&sep),
                PHOTO_DATE => record.photo_date.clone().unwrap_or_default(),
                EXTERNAL_SAME_AS => record.external_same_as.join(&sep),
                _ => String::new(),
            })
            .collect();
        out.push_str(&cells.join(&delimiter.to_string()));
        out.push('\n');
    }
    out
}

/// Serialize archive cards back into their tabular format.
pub fn write_archive_cards(cards: &[ArchiveCard], delimiter: char) -> String {
    let layout = archive_layout();
    let mut out = String::new();
    out.push_str(&layout.expected_header(delimiter));
    out.push('\n');
    for card in cards {
        let cells = [
            card.card_id.as_str(),
            card.post_number.as_str(),
            card.institution.code(),
        ];
        out.push_str(&cells.join(&delimiter.to_string()));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELIM: char = '¤';
    const LIST_DELIM: char = '|';

    fn photo_header() -> String {
        photo_layout().expected_header(DELIM)
    }

    fn photo_line(photo_number: &str) -> String {
        // cells in layout order, mostly empty
        let mut cells = vec![String::new(); photo_layout().columns.len()];
        cells[0] = photo_number.to_string();
        cells[2] = "P1".to_string();
        cells[3] = "Gruppbild".to_string();
        cells[4] = "boat| portrait ".to_string();
        cells[14] = "A. Svensson".to_string();
        cells[19] = "EM".to_string();
        cells.join(&DELIM.to_string())
    }

    #[test]
    fn parses_lists_and_trims_cells() {
        let contents = format!("{}\n{}\n", photo_header(), photo_line("0001"));
        let records = photo_records(&contents, DELIM, LIST_DELIM).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.photo_number, "0001");
        assert_eq!(record.motif_keywords, vec!["boat", "portrait"]);
        assert_eq!(record.photographer.as_deref(), Some("A. Svensson"));
        assert!(record.country.is_none());
    }

    #[test]
    fn header_mismatch_is_rejected() {
        let contents = format!("Fel{}\n{}\n", DELIM, photo_line("0001"));
        let err = photo_records(&contents, DELIM, LIST_DELIM).unwrap_err();
        assert!(matches!(err, Error::Tabular(_)));
    }

    #[test]
    fn wrong_cell_count_names_the_line() {
        let contents = format!("{}\nonly¤three¤cells\n", photo_header());
        let err = photo_records(&contents, DELIM, LIST_DELIM).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "{msg}");
    }

    #[test]
    fn archive_cards_parse_and_round_trip() {
        let contents = format!("Id{d}Postnr{d}Museum\nK1{d}P1{d}EM\nK2{d}P2{d}MM\n", d = DELIM);
        let cards = archive_cards(&contents, DELIM, LIST_DELIM).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(write_archive_cards(&cards, DELIM), contents);
    }

    #[test]
    fn photo_records_round_trip() {
        let contents = format!("{}\n{}\n", photo_header(), photo_line("0001"));
        let records = photo_records(&contents, DELIM, LIST_DELIM).unwrap();
        let written = write_photo_records(&records, DELIM, LIST_DELIM);
        let reparsed = photo_records(&written, DELIM, LIST_DELIM).unwrap();
        assert_eq!(reparsed, records);
    }
}
