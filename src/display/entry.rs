//! Entry display formatting
//!
//! Formats journal entries for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Entry;

const PREVIEW_LEN: usize = 40;

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Tokens")]
    tokens: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Title")]
    title: String,
}

impl From<&Entry> for EntryRow {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.to_string(),
            model: entry.model.clone(),
            tokens: entry.token_estimate.to_string(),
            rating: format_rating(entry.rating),
            created: entry.created_at.as_datetime().format("%Y-%m-%d %H:%M").to_string(),
            title: preview(entry),
        }
    }
}

/// Format a list of entries as a table
pub fn format_entry_list(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "No prompts found.\n".to_string();
    }

    let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());

    format!("{}\n\nTotal: {} prompt(s)\n", table, entries.len())
}

/// Format a single entry's details
pub fn format_entry_details(entry: &Entry) -> String {
    let mut output = String::new();

    output.push_str(&format!("Prompt: {}\n", entry.id));
    if let Some(title) = entry.text_field("title") {
        output.push_str(&format!("  Title:      {}\n", title));
    }
    output.push_str(&format!("  Model:      {}\n", entry.model));
    output.push_str(&format!("  Tokens:     {}\n", entry.token_estimate));
    output.push_str(&format!("  Rating:     {}\n", format_rating(entry.rating)));
    output.push('\n');
    output.push_str(&format!("  Created:  {}\n", entry.created_at));
    output.push_str(&format!("  Modified: {}\n", entry.updated_at));

    if let Some(content) = entry.text_field("content") {
        output.push('\n');
        for line in content.lines() {
            output.push_str(&format!("  | {}\n", line));
        }
    }

    output
}

fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(r) => r.to_string(),
        None => "-".to_string(),
    }
}

/// Title if present, otherwise the first line of the content, shortened
fn preview(entry: &Entry) -> String {
    let text = entry
        .text_field("title")
        .or_else(|| entry.text_field("content").and_then(|c| c.lines().next()))
        .unwrap_or("");

    if text.chars().count() > PREVIEW_LEN {
        let cut: String = text.chars().take(PREVIEW_LEN - 3).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
