use std::fmt;

use serde_json::Value;

use super::record::{text_of, Record};

/// Number of characters of each question shown in the report.
pub const PREVIEW_CHARS: usize = 50;

const PLACEHOLDER: &str = "N/A";

const HEADER: &str = "# Content Source Verification Report\n\nThis report lists the academic \
                      source for every generated question to ensure scientific validity.\n\n";

/// A Markdown report cross-referencing every question with its source.
///
/// Sections appear in the order collections are added, and rows in the order
/// records are stored. Nothing is sorted or filtered, so identical input
/// always produces an identical report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    text: String,
}

impl Default for SourceReport {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceReport {
    /// Starts a report containing only the title and description.
    #[must_use]
    pub fn new() -> Self {
        Self {
            text: HEADER.to_string(),
        }
    }

    /// Appends a section for one collection.
    ///
    /// `title` names the collection in the section header.
    pub fn add_collection(&mut self, title: &str, records: &[Record]) {
        self.text.push_str(&format!("## {title} ({} Questions)\n\n", records.len()));
        self.text.push_str("| ID | Question (Stem) | Source ID (Theory/Researcher) |\n");
        self.text.push_str("| :--- | :--- | :--- |\n");

        for record in records {
            let id = field(record, "id");
            let question = preview(&field(record, "question"));
            let source = field(record, "source_id");
            self.text
                .push_str(&format!("| `{id}` | {question} | **{source}** |\n"));
        }

        self.text.push('\n');
    }

    /// Returns the report text.
    #[must_use]
    pub fn finish(self) -> String {
        self.text
    }
}

impl fmt::Display for SourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The first [`PREVIEW_CHARS`] characters of `text`, followed by `...`.
///
/// The ellipsis is appended even when nothing was cut off.
#[must_use]
pub fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}

fn field(record: &Record, name: &str) -> String {
    match record.get(name) {
        None | Some(Value::Null) => PLACEHOLDER.to_string(),
        Some(value) => text_of(value),
    }
}
