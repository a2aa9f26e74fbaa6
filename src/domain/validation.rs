use std::{collections::HashMap, fmt};

use serde_json::Value;

use super::{
    record::{is_legacy, QuestionRecord, QuestionType, Record, RecordLabel, LEGACY_SOURCE_ID},
    RecordId,
};

/// How serious an [`Issue`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Authored content that deviates from convention but still works.
    Warning,
    /// Content the application cannot present correctly.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A problem found in a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// The record the issue was found in.
    pub record: RecordLabel,
    /// How serious the issue is.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

impl Issue {
    fn error(record: &RecordLabel, message: impl Into<String>) -> Self {
        Self {
            record: record.clone(),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(record: &RecordLabel, message: impl Into<String>) -> Self {
        Self {
            record: record.clone(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.record, self.severity, self.message)
    }
}

/// Checks every record of a collection against the current schema.
///
/// Issues are returned in record order.
#[must_use]
pub fn validate_collection(records: &[Record]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for (position, record) in records.iter().enumerate() {
        let label = RecordLabel::new(position, record);

        if let Some(id) = record.get("id").and_then(Value::as_str) {
            if let Some(first) = first_seen.get(id) {
                issues.push(Issue::error(
                    &label,
                    format!("duplicate id, first used by record #{first}"),
                ));
            } else {
                first_seen.insert(id, position);
            }
        }

        if is_legacy(record) {
            issues.push(Issue::error(
                &label,
                "legacy record has not been migrated (run `lessons migrate`)",
            ));
            continue;
        }

        match QuestionRecord::try_from(record) {
            Ok(question) => check_question(&label, &question, &mut issues),
            Err(e) => issues.push(Issue::error(
                &label,
                format!("does not match the question schema: {e}"),
            )),
        }
    }

    issues
}

fn check_question(label: &RecordLabel, question: &QuestionRecord, issues: &mut Vec<Issue>) {
    if question.question.trim().is_empty() {
        issues.push(Issue::error(label, "question text is empty"));
    }

    let choices = question.choices.len();
    if choices < 2 {
        issues.push(Issue::error(
            label,
            format!("expected at least 2 choices, found {choices}"),
        ));
    } else if question.kind == QuestionType::TrueFalse && choices != 2 {
        issues.push(Issue::warning(
            label,
            format!("true_false question has {choices} choices"),
        ));
    }

    let in_range = usize::try_from(question.correct_index).is_ok_and(|index| index < choices);
    if !in_range {
        issues.push(Issue::error(
            label,
            format!(
                "correct_index {} is out of range (choices length: {choices})",
                question.correct_index
            ),
        ));
    }

    if question.source_id.trim().is_empty() {
        issues.push(Issue::error(label, "source_id is empty"));
    } else if question.source_id == LEGACY_SOURCE_ID {
        issues.push(Issue::warning(
            label,
            format!("migrated from legacy content; confirm the question type ({})", question.kind),
        ));
    }

    let expected_xp = question.difficulty.conventional_xp();
    if question.xp != expected_xp {
        issues.push(Issue::warning(
            label,
            format!("xp {} does not match difficulty (expected {expected_xp})", question.xp),
        ));
    }

    if let Err(e) = question.id.parse::<RecordId>() {
        issues.push(Issue::warning(label, e.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn question(overrides: Value) -> Record {
        let mut base = json!({
            "id": "health_l01_01",
            "type": "multiple_choice",
            "question": "睡眠の質を上げるために最も効果的なのは？",
            "choices": ["寝る前にスマホを見ない", "寝る直前に運動する", "夜食を食べる"],
            "correct_index": 0,
            "explanation": "ブルーライトはメラトニンの分泌を抑えます。",
            "source_id": "chang_2015_pnas",
            "difficulty": "easy",
            "xp": 5,
        });
        if let (Value::Object(base), Value::Object(overrides)) = (&mut base, overrides) {
            base.extend(overrides);
        }
        match base {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn messages(issues: &[Issue]) -> Vec<(Severity, &str)> {
        issues
            .iter()
            .map(|issue| (issue.severity, issue.message.as_str()))
            .collect()
    }

    #[test]
    fn well_formed_record_has_no_issues() {
        assert!(validate_collection(&[question(json!({}))]).is_empty());
    }

    #[test]
    fn out_of_range_correct_index() {
        let issues = validate_collection(&[question(json!({"correct_index": 3}))]);
        assert_eq!(
            messages(&issues),
            [(
                Severity::Error,
                "correct_index 3 is out of range (choices length: 3)"
            )]
        );
    }

    #[test]
    fn negative_correct_index() {
        let issues = validate_collection(&[question(json!({"correct_index": -1}))]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn too_few_choices() {
        let issues = validate_collection(&[question(json!({"choices": ["only"]}))]);
        assert_eq!(
            messages(&issues),
            [(Severity::Error, "expected at least 2 choices, found 1")]
        );
    }

    #[test]
    fn true_false_with_three_choices_warns() {
        let issues = validate_collection(&[question(json!({"type": "true_false"}))]);
        assert_eq!(
            messages(&issues),
            [(Severity::Warning, "true_false question has 3 choices")]
        );
    }

    #[test]
    fn duplicate_ids_are_errors() {
        let issues = validate_collection(&[question(json!({})), question(json!({}))]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].record.position, 1);
        assert_eq!(issues[0].message, "duplicate id, first used by record #0");
    }

    #[test]
    fn unmigrated_legacy_record_is_an_error() {
        let mut legacy = Record::new();
        legacy.insert("id".to_string(), json!("money_l01_01"));
        legacy.insert("stem".to_string(), json!("Q"));

        let issues = validate_collection(&[legacy]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.starts_with("legacy record"));
    }

    #[test]
    fn schema_mismatch_is_reported() {
        let mut record = question(json!({}));
        record.shift_remove("source_id");

        let issues = validate_collection(&[record]);

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("source_id"));
    }

    #[test]
    fn legacy_source_requires_type_review() {
        let issues = validate_collection(&[question(json!({"source_id": LEGACY_SOURCE_ID}))]);
        assert_eq!(
            messages(&issues),
            [(
                Severity::Warning,
                "migrated from legacy content; confirm the question type (multiple_choice)"
            )]
        );
    }

    #[test]
    fn xp_mismatch_warns() {
        let issues = validate_collection(&[question(json!({"difficulty": "hard"}))]);
        assert_eq!(
            messages(&issues),
            [(
                Severity::Warning,
                "xp 5 does not match difficulty (expected 15)"
            )]
        );
    }

    #[test]
    fn malformed_id_warns() {
        let issues = validate_collection(&[question(json!({"id": "health-1"}))]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].record.to_string(), "health-1");
    }
}
