//! JSON export document
//!
//! The portable representation of the journal: a format version, the export
//! time, summary statistics, and every entry.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{JournalError, JournalResult};
use crate::models::entry::serialize_optional_number;
use crate::models::{Entry, Timestamp};

/// Current export format version. Imports require an exact match.
pub const EXPORT_VERSION: &str = "1.0.0";

/// Summary statistics embedded in every export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub total_prompts: usize,
    /// Mean rating over entries that have one; `null` when none do
    #[serde(serialize_with = "serialize_optional_number")]
    pub average_rating: Option<f64>,
    /// Most frequent model; ties go to the model encountered first
    pub most_used_model: Option<String>,
}

impl ExportStats {
    /// Compute statistics over `entries`
    pub fn compute(entries: &[Entry]) -> Self {
        let ratings: Vec<f64> = entries.iter().filter_map(|e| e.rating).collect();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
        };

        // Counts kept in first-seen order so ties resolve deterministically
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for entry in entries {
            match counts.iter_mut().find(|(model, _)| *model == entry.model) {
                Some((_, count)) => *count += 1,
                None => counts.push((entry.model.as_str(), 1)),
            }
        }

        let mut most_used_model: Option<&str> = None;
        let mut max_count = 0;
        for (model, count) in counts {
            if count > max_count {
                max_count = count;
                most_used_model = Some(model);
            }
        }

        Self {
            total_prompts: entries.len(),
            average_rating,
            most_used_model: most_used_model.map(str::to_string),
        }
    }
}

/// Versioned export of the whole collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub exported_at: Timestamp,
    pub stats: ExportStats,
    pub prompts: Vec<Entry>,
}

impl ExportDocument {
    /// Build a document over already-validated entries
    pub fn new(prompts: Vec<Entry>) -> Self {
        Self::at(prompts, Timestamp::now())
    }

    /// Build a document stamped with `exported_at`
    pub fn at(prompts: Vec<Entry>, exported_at: Timestamp) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            exported_at,
            stats: ExportStats::compute(&prompts),
            prompts,
        }
    }

    /// Suggested file name, derived from the export time
    pub fn file_name(&self) -> String {
        export_filename(self.exported_at)
    }

    /// Serialize the document to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> JournalResult<()> {
        if pretty {
            serde_json::to_writer_pretty(writer, self)
        } else {
            serde_json::to_writer(writer, self)
        }
        .map_err(|e| JournalError::Export(e.to_string()))
    }

    /// Serialize the document to a string
    pub fn to_json(&self, pretty: bool) -> JournalResult<String> {
        let mut out = Vec::new();
        self.write_to(&mut out, pretty)?;
        String::from_utf8(out).map_err(|e| JournalError::Export(e.to_string()))
    }
}

/// `prompt-journal-export-<timestamp>.json`, with `:` and `.` replaced by `-`
pub fn export_filename(at: Timestamp) -> String {
    format!("prompt-journal-export-{}.json", at.file_safe())
}
