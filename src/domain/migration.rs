//! Legacy records predate the `type` and `source_id` fields and split their
//! explanation into `what`/`why`/`how` paragraphs. Migration rewrites them into
//! the current schema exactly once: a migrated record has a `question` field,
//! so it is never classified as legacy again.

use serde_json::Value;

use super::record::{
    text_of, LegacyRecord, QuestionType, Record, RecordLabel, StoredRecord, LEGACY_SOURCE_ID,
};

/// A legacy record rewritten into the current schema.
#[derive(Debug, Clone, PartialEq)]
pub struct MigratedRecord {
    /// The prompt, taken from `stem`.
    pub question: Value,
    /// Taken from `answer_index`, or `0` if it was missing.
    pub correct_index: Value,
    /// Always [`QuestionType::MultipleChoice`].
    ///
    /// The legacy schema has no way of expressing a true/false question, so
    /// every migrated record needs its type confirmed by hand.
    pub kind: QuestionType,
    /// The `what`, `why` and `how` paragraphs joined by blank lines.
    pub explanation: String,
    /// Whether `correct_index` was defaulted because `answer_index` was
    /// missing.
    pub defaulted_answer: bool,
    /// All other fields of the original record, in their stored order.
    pub rest: Record,
}

impl From<LegacyRecord> for MigratedRecord {
    fn from(legacy: LegacyRecord) -> Self {
        let LegacyRecord {
            stem,
            answer_index,
            what,
            why,
            how,
            rest,
        } = legacy;

        let explanation = [what, why, how]
            .iter()
            .flatten()
            .map(text_of)
            .collect::<Vec<_>>()
            .join("\n\n");

        Self {
            question: stem,
            defaulted_answer: answer_index.is_none(),
            correct_index: answer_index.unwrap_or_else(|| Value::from(0)),
            kind: QuestionType::MultipleChoice,
            explanation,
            rest,
        }
    }
}

impl From<MigratedRecord> for Record {
    /// Converts back to the stored form.
    ///
    /// The original fields keep their order; the current-schema fields follow
    /// them. `source_id` is always set to [`LEGACY_SOURCE_ID`].
    fn from(migrated: MigratedRecord) -> Self {
        let MigratedRecord {
            question,
            correct_index,
            kind,
            explanation,
            defaulted_answer: _,
            mut rest,
        } = migrated;

        rest.insert("question".to_string(), question);
        rest.insert("correct_index".to_string(), correct_index);
        rest.insert("type".to_string(), Value::from(kind.as_str()));
        rest.insert("explanation".to_string(), Value::from(explanation));
        rest.insert("source_id".to_string(), Value::from(LEGACY_SOURCE_ID));
        rest
    }
}

/// What a migration pass over one collection did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    /// The number of records migrated.
    pub migrated: usize,
    /// Migrated records whose `type` was assumed and must be reviewed.
    pub needs_type_review: Vec<RecordLabel>,
    /// Migrated records whose `correct_index` was defaulted to `0`.
    pub defaulted_answers: Vec<RecordLabel>,
}

impl MigrationSummary {
    /// Returns `true` if no record was migrated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.migrated == 0
    }
}

/// Migrates every legacy record of a collection in place.
///
/// Records that are not legacy are left untouched. Record order is preserved.
/// Running this twice over the same collection changes nothing the second
/// time.
pub fn migrate_collection(records: &mut [Record]) -> MigrationSummary {
    let mut summary = MigrationSummary::default();

    for (position, slot) in records.iter_mut().enumerate() {
        let legacy = match StoredRecord::classify(std::mem::take(slot)) {
            StoredRecord::Current(record) => {
                *slot = record;
                continue;
            }
            StoredRecord::Legacy(legacy) => legacy,
        };

        let label = RecordLabel {
            position,
            id: legacy.id().map(str::to_string),
        };
        tracing::info!("Migrating record {label}");

        let migrated = MigratedRecord::from(legacy);
        if migrated.defaulted_answer {
            tracing::warn!("Record {label} has no answer_index; correct_index defaulted to 0");
            summary.defaulted_answers.push(label.clone());
        }

        *slot = migrated.into();
        summary.migrated += 1;
        summary.needs_type_review.push(label);
    }

    summary
}
