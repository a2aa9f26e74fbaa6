use serde_json::Value;

use super::record::Record;

/// Prompts longer than this many characters are flagged by default.
pub const DEFAULT_MIN_CHARS: usize = 100;

/// A record whose prompt is long enough to need editorial review.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongQuestion<'a> {
    /// 0-based position of the record in its collection.
    pub position: usize,
    /// The prompt text.
    pub prompt: &'a str,
    /// The whole record.
    pub record: &'a Record,
}

impl LongQuestion<'_> {
    /// The record's `type`, if it has one.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.record.get("type").and_then(Value::as_str)
    }

    /// The record's choices rendered as JSON, if it has any.
    #[must_use]
    pub fn choices(&self) -> Option<String> {
        self.record.get("choices").map(Value::to_string)
    }
}

/// The prompt text of a record in either schema.
///
/// Uses a non-empty `stem` first, then a non-empty `question`, and the empty
/// string otherwise.
#[must_use]
pub fn prompt_text(record: &Record) -> &str {
    ["stem", "question"]
        .into_iter()
        .filter_map(|field| record.get(field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// Records whose prompt is longer than `min_chars` characters, in stored
/// order.
///
/// Length is measured in Unicode scalar values, so an emoji counts as one
/// character rather than as two UTF-16 code units.
#[must_use]
pub fn long_questions(records: &[Record], min_chars: usize) -> Vec<LongQuestion<'_>> {
    records
        .iter()
        .enumerate()
        .filter_map(|(position, record)| {
            let prompt = prompt_text(record);
            (prompt.chars().count() > min_chars).then_some(LongQuestion {
                position,
                prompt,
                record,
            })
        })
        .collect()
}
