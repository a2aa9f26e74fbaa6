/// JSON persistence for a single collection.
pub mod collection;
mod content_dir;

pub use collection::{LoadError, SaveError};
pub use content_dir::{ContentDir, MigrationOutcome, CONFIG_FILE};
