use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single question record as stored in a collection.
///
/// Records are kept as JSON objects so that fields this crate does not model
/// (media, evidence grades, practice configuration, ...) survive every
/// rewrite untouched and in their original order.
pub type Record = Map<String, Value>;

/// Attribution key given to every record produced by legacy migration.
pub const LEGACY_SOURCE_ID: &str = "legacy_content_v1";

/// Fields that only exist in the legacy schema.
///
/// All of them are removed when a legacy record is migrated, whether or not
/// they were present.
pub const LEGACY_FIELDS: [&str; 11] = [
    "stem",
    "answer_index",
    "what",
    "why",
    "how",
    "real_example",
    "action",
    "fun_fact",
    "tip",
    "incorrect_feedback",
    "emoji_hint",
];

/// How the choices of a question are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Pick one of three or four choices.
    MultipleChoice,
    /// A statement judged correct or incorrect.
    TrueFalse,
}

impl QuestionType {
    /// The serialized name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::TrueFalse => "true_false",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Informational difficulty weighting of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Introductory question.
    Easy,
    /// Standard question.
    Medium,
    /// Advanced question.
    Hard,
}

impl Difficulty {
    /// The XP reward conventionally paired with this difficulty.
    ///
    /// This is observed in authored content, not enforced by the schema.
    #[must_use]
    pub const fn conventional_xp(self) -> u32 {
        match self {
            Self::Easy => 5,
            Self::Medium => 10,
            Self::Hard => 15,
        }
    }
}

/// A record in the current schema, with typed fields.
///
/// Parsing a [`Record`] into this type is how structural problems are found;
/// the stored form of a collection is never rewritten through it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestionRecord {
    /// Stable identifier, unique within its collection.
    pub id: String,
    /// How `choices` is interpreted.
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// The prompt shown to the user.
    pub question: String,
    /// The answer options, in display order.
    pub choices: Vec<String>,
    /// 0-based index of the correct choice.
    ///
    /// Signed so that negative values are reported as out of range rather
    /// than as a schema mismatch.
    pub correct_index: i64,
    /// Rationale shown after answering.
    pub explanation: String,
    /// Attribution key of the originating research or theory.
    pub source_id: String,
    /// Difficulty weighting.
    pub difficulty: Difficulty,
    /// Reward points.
    pub xp: u32,
    /// Every other field of the record.
    #[serde(flatten)]
    pub extra: Record,
}

impl TryFrom<&Record> for QuestionRecord {
    type Error = serde_json::Error;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        serde_json::from_value(Value::Object(record.clone()))
    }
}

/// Returns `true` if the record was authored in the legacy schema.
///
/// A record is legacy if and only if it has a `stem` field and no `question`
/// field. Migrated records gain `question`, so they are never classified as
/// legacy again.
#[must_use]
pub fn is_legacy(record: &Record) -> bool {
    record.contains_key("stem") && !record.contains_key("question")
}

/// A stored record, classified by schema.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRecord {
    /// A record in the deprecated `stem`/`answer_index` schema.
    Legacy(LegacyRecord),
    /// Any other record. It is left exactly as stored.
    Current(Record),
}

impl StoredRecord {
    /// Classifies a stored record.
    #[must_use]
    pub fn classify(record: Record) -> Self {
        match LegacyRecord::try_from(record) {
            Ok(legacy) => Self::Legacy(legacy),
            Err(record) => Self::Current(record),
        }
    }
}

/// A record in the deprecated authoring schema.
///
/// The legacy-only fields are pulled out into typed slots; everything else is
/// kept in `rest` in its stored order. Field values are kept as JSON values
/// since legacy content was never schema-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRecord {
    /// The prompt text.
    pub stem: Value,
    /// Index of the correct choice, if one was recorded.
    pub answer_index: Option<Value>,
    /// First explanation paragraph.
    pub what: Option<Value>,
    /// Second explanation paragraph.
    pub why: Option<Value>,
    /// Third explanation paragraph.
    pub how: Option<Value>,
    /// The remaining fields, with every legacy-only field removed.
    pub rest: Record,
}

impl LegacyRecord {
    /// The record's `id`, if it has a string one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.rest.get("id").and_then(Value::as_str)
    }
}

impl TryFrom<Record> for LegacyRecord {
    type Error = Record;

    /// Splits a legacy record into its parts.
    ///
    /// A record that is not legacy is handed back unchanged as the error.
    /// `null` values are treated as absent.
    fn try_from(mut record: Record) -> Result<Self, Self::Error> {
        if !is_legacy(&record) {
            return Err(record);
        }

        let mut take = |field: &str| record.shift_remove(field).filter(|value| !value.is_null());

        let stem = take("stem").unwrap_or_default();
        let answer_index = take("answer_index");
        let what = take("what");
        let why = take("why");
        let how = take("how");

        for field in LEGACY_FIELDS {
            record.shift_remove(field);
        }

        Ok(Self {
            stem,
            answer_index,
            what,
            why,
            how,
            rest: record,
        })
    }
}

/// A human-readable reference to a record within its collection.
///
/// Uses the record's `id` when it has one, and its position otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLabel {
    /// 0-based position of the record in its collection.
    pub position: usize,
    /// The record's `id`, if present.
    pub id: Option<String>,
}

impl RecordLabel {
    /// Builds the label for the record at `position`.
    #[must_use]
    pub fn new(position: usize, record: &Record) -> Self {
        Self {
            position,
            id: record.get("id").and_then(Value::as_str).map(str::to_string),
        }
    }
}

impl fmt::Display for RecordLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => f.write_str(id),
            None => write!(f, "#{}", self.position),
        }
    }
}

/// Renders a field value as plain text.
///
/// Strings are used verbatim; any other value is rendered as JSON.
pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test records must be objects"),
        }
    }

    #[test]
    fn stem_without_question_is_legacy() {
        assert!(is_legacy(&record(json!({"stem": "Q"}))));
    }

    #[test]
    fn stem_with_question_is_not_legacy() {
        assert!(!is_legacy(&record(json!({"stem": "Q", "question": "Q"}))));
    }

    #[test]
    fn question_only_is_not_legacy() {
        assert!(!is_legacy(&record(json!({"question": "Q"}))));
    }

    #[test]
    fn record_without_either_is_not_legacy() {
        assert!(!is_legacy(&record(json!({"id": "health_l01_01"}))));
    }

    #[test]
    fn classify_current_returns_record_unchanged() {
        let original = record(json!({"question": "Q", "stem": "S", "tip": "keep"}));

        let StoredRecord::Current(current) = StoredRecord::classify(original.clone()) else {
            panic!("expected a current record");
        };

        assert_eq!(current, original);
    }

    #[test]
    fn classify_legacy_strips_legacy_fields() {
        let original = record(json!({
            "id": "money_l01_01",
            "stem": "Q",
            "answer_index": 2,
            "what": "A",
            "tip": "drop me",
            "emoji_hint": "💡",
            "choices": ["a", "b", "c"],
        }));

        let StoredRecord::Legacy(legacy) = StoredRecord::classify(original) else {
            panic!("expected a legacy record");
        };

        assert_eq!(legacy.stem, json!("Q"));
        assert_eq!(legacy.answer_index, Some(json!(2)));
        assert_eq!(legacy.what, Some(json!("A")));
        assert_eq!(legacy.why, None);
        assert_eq!(legacy.id(), Some("money_l01_01"));
        let keys: Vec<_> = legacy.rest.keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "choices"]);
    }

    #[test]
    fn null_legacy_values_are_absent() {
        let legacy = LegacyRecord::try_from(record(json!({"stem": "Q", "answer_index": null})))
            .expect("record is legacy");

        assert_eq!(legacy.answer_index, None);
    }

    #[test]
    fn question_record_parses_current_schema() {
        let parsed = QuestionRecord::try_from(&record(json!({
            "id": "work_l04_002",
            "type": "true_false",
            "question": "優れたリーダーは、常に答えを持っていなければならない",
            "choices": ["正しい", "誤り"],
            "correct_index": 1,
            "explanation": "謙虚なリーダーシップ",
            "source_id": "humble_leadership_2018",
            "difficulty": "medium",
            "xp": 10,
            "image": "leader.png",
        })))
        .unwrap();

        assert_eq!(parsed.kind, QuestionType::TrueFalse);
        assert_eq!(parsed.difficulty, Difficulty::Medium);
        assert_eq!(parsed.extra.get("image"), Some(&json!("leader.png")));
    }

    #[test]
    fn question_record_rejects_unknown_type() {
        let result = QuestionRecord::try_from(&record(json!({
            "id": "x", "type": "essay", "question": "Q", "choices": ["a", "b"],
            "correct_index": 0, "explanation": "", "source_id": "s",
            "difficulty": "easy", "xp": 5,
        })));

        assert!(result.is_err());
    }

    #[test]
    fn label_prefers_id() {
        let labelled = RecordLabel::new(3, &record(json!({"id": "social_l02_01"})));
        let anonymous = RecordLabel::new(3, &record(json!({"id": 7})));

        assert_eq!(labelled.to_string(), "social_l02_01");
        assert_eq!(anonymous.to_string(), "#3");
    }
}
