//! Assigns identifiers to a collection by position, so that the record at
//! position `i` gets level `i / per_level + 1` and sequence
//! `i % per_level + 1`.

use std::num::NonZeroUsize;

use serde_json::Value;

use super::{
    record::Record,
    record_id::{RecordId, Topic},
};

/// The number of questions per lesson level in authored content.
pub const DEFAULT_PER_LEVEL: NonZeroUsize = NonZeroUsize::new(15).expect("15 is non-zero");

/// Options for [`renumber`].
#[derive(Debug, Clone)]
pub struct Renumber {
    /// Topic used as the identifier prefix.
    pub topic: Topic,
    /// Questions per level.
    pub per_level: NonZeroUsize,
    /// Also overwrite `source_id` with the new identifier.
    ///
    /// This discards the record's attribution.
    pub with_source_id: bool,
}

impl Renumber {
    /// Renumbering for `topic` with the default level size.
    #[must_use]
    pub const fn new(topic: Topic) -> Self {
        Self {
            topic,
            per_level: DEFAULT_PER_LEVEL,
            with_source_id: false,
        }
    }
}

/// Rewrites the `id` of every record from its position.
///
/// Returns the number of records that changed.
pub fn renumber(records: &mut [Record], options: &Renumber) -> usize {
    let mut changed = 0;

    for (position, record) in records.iter_mut().enumerate() {
        let id = RecordId::at_position(options.topic.clone(), options.per_level, position);
        let id = Value::from(id.to_string());

        let mut touched = replace(record, "id", &id);
        if options.with_source_id {
            touched |= replace(record, "source_id", &id);
        }

        if touched {
            tracing::debug!("Renumbered record #{position} to {id}");
            changed += 1;
        }
    }

    changed
}

fn replace(record: &mut Record, field: &str, value: &Value) -> bool {
    if record.get(field) == Some(value) {
        return false;
    }
    record.insert(field.to_string(), value.clone());
    true
}
