//! CSV summary export
//!
//! A flat, spreadsheet-friendly view of the journal: one row per entry with
//! the interpreted fields. Not importable; use the JSON document for that.

use std::io::Write;

use crate::error::{JournalError, JournalResult};
use crate::models::Entry;

const HEADER: [&str; 9] = [
    "id",
    "model",
    "createdAt",
    "updatedAt",
    "tokenMin",
    "tokenMax",
    "confidence",
    "rating",
    "title",
];

/// Write `entries` as CSV to `writer`
pub fn export_entries_csv<W: Write>(entries: &[Entry], writer: W) -> JournalResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(HEADER)
        .map_err(|e| JournalError::Export(e.to_string()))?;

    for entry in entries {
        let rating = entry.rating.map(|r| r.to_string()).unwrap_or_default();
        csv_writer
            .write_record([
                entry.id.as_str(),
                entry.model.as_str(),
                &entry.created_at.to_string(),
                &entry.updated_at.to_string(),
                &entry.token_estimate.min.to_string(),
                &entry.token_estimate.max.to_string(),
                entry.token_estimate.confidence.as_str(),
                &rating,
                entry.text_field("title").unwrap_or(""),
            ])
            .map_err(|e| JournalError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| JournalError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, EntryId, Timestamp, TokenEstimate};

    #[test]
    fn test_csv_rows() {
        let at = Timestamp::parse("2025-01-15T10:30:00.000Z").unwrap();
        let mut entry = Entry::new("gpt, turbo", TokenEstimate::new(3.0, 5.0, Confidence::Low));
        entry.id = EntryId::new("p_1");
        entry.created_at = at;
        entry.updated_at = at;
        entry.rating = Some(4.5);
        entry.set_field("title", "Refactor");

        let mut out = Vec::new();
        export_entries_csv(&[entry], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "id,model,createdAt,updatedAt,tokenMin,tokenMax,confidence,rating,title"
        );
        assert_eq!(
            lines[1],
            "p_1,\"gpt, turbo\",2025-01-15T10:30:00.000Z,2025-01-15T10:30:00.000Z,3,5,low,4.5,Refactor"
        );
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let mut out = Vec::new();
        export_entries_csv(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
