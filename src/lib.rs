//! Lesson content tools
//!
//! Quiz lessons are stored as JSON collections of question records, one file
//! per topic. This crate migrates records out of the deprecated authoring
//! schema, validates them, and reports where every question's content comes
//! from.

pub mod domain;
pub use domain::{
    Config, LegacyRecord, MigrationSummary, QuestionRecord, QuestionType, Record, RecordId,
    StoredRecord,
};

/// Filesystem storage for lesson collections.
pub mod storage;
pub use storage::{ContentDir, MigrationOutcome};
