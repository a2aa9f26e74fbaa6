//! Domain models for lesson content.
//!
//! This module contains the question record schema (current and legacy), the
//! record identifier format, and the pure transformations applied to
//! collections: migration, validation, renumbering and reporting.

/// Question records and schema classification.
pub mod record;
pub use record::{
    Difficulty, LegacyRecord, QuestionRecord, QuestionType, Record, RecordLabel, StoredRecord,
    LEGACY_SOURCE_ID,
};

mod config;
pub use config::{Config, Error as ConfigError};

/// Record identifiers of the form `<topic>_l<level>_<seq>`.
pub mod record_id;
pub use record_id::{Error as RecordIdError, RecordId, Topic};

/// Conversion of legacy records into the current schema.
pub mod migration;
pub use migration::{migrate_collection, MigratedRecord, MigrationSummary};

/// Structural checks over current-schema records.
pub mod validation;
pub use validation::{validate_collection, Issue, Severity};

/// Positional identifier assignment.
pub mod renumber;

/// Editorial review helpers.
pub mod review;

/// Markdown source verification report.
pub mod report;
pub use report::SourceReport;
