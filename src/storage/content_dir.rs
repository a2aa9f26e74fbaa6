//! A filesystem backed set of lesson collections
//!
//! The [`ContentDir`] maps collection names to files under a root directory
//! using a [`Config`], and runs the collection-level operations (migration,
//! reporting) over them one file at a time.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use super::collection::{self, LoadError, SaveError};
use crate::domain::{
    migrate_collection, Config, ConfigError, MigrationSummary, Record, SourceReport,
};

/// The name of the configuration file in a content directory.
pub const CONFIG_FILE: &str = "lessons.toml";

/// What happened when migrating one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The collection file does not exist.
    Missing,
    /// The collection file could not be read or parsed.
    Unreadable(String),
    /// No record needed migrating; the file was not written.
    Unchanged,
    /// Records were migrated and the file was rewritten.
    Migrated(MigrationSummary),
    /// Records would have been migrated, but this was a dry run.
    WouldMigrate(MigrationSummary),
}

/// A directory of lesson collections.
#[derive(Debug, Clone)]
pub struct ContentDir {
    root: PathBuf,
    config: Config,
}

impl ContentDir {
    /// Uses `root` as the content directory with the given configuration.
    #[must_use]
    pub const fn new(root: PathBuf, config: Config) -> Self {
        Self { root, config }
    }

    /// Opens the content directory at `root`.
    ///
    /// The configuration is read from [`CONFIG_FILE`] in `root`; if there is
    /// no such file the defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read or
    /// parsed.
    pub fn open(root: PathBuf) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        let config = if path.exists() {
            Config::load(&path)?
        } else {
            tracing::debug!("No {CONFIG_FILE} in {}, using defaults", root.display());
            Config::default()
        };
        Ok(Self::new(root, config))
    }

    /// The root of the content directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The storage location of a collection.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(self.config.file_for(name))
    }

    /// Where the source report is written.
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.root.join(self.config.report_path())
    }

    /// Loads a collection by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection file is missing, unreadable or not a
    /// JSON array of objects.
    pub fn load(&self, name: &str) -> Result<Vec<Record>, LoadError> {
        collection::load(&self.path_for(name))
    }

    /// Saves a collection by name, replacing its file atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, name: &str, records: &[Record]) -> Result<(), SaveError> {
        collection::save(&self.path_for(name), records)
    }

    /// The names of the collections stored directly in the root, sorted.
    ///
    /// Every `*.json` file counts as a collection named after its stem.
    #[must_use]
    pub fn discover(&self) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension() == Some(OsStr::new("json")))
            .filter_map(|entry| {
                entry
                    .path()
                    .file_stem()
                    .and_then(OsStr::to_str)
                    .map(str::to_string)
            })
            .collect();

        names.sort();
        names.dedup();
        names
    }

    /// Migrates the legacy records of one collection.
    ///
    /// The file is rewritten only if at least one record was migrated, and
    /// never when `dry_run` is set. A missing or unparseable file is logged
    /// and reported in the outcome rather than treated as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the migrated collection cannot be written. The
    /// previous content of the file is left untouched in that case.
    pub fn migrate(&self, name: &str, dry_run: bool) -> Result<MigrationOutcome, SaveError> {
        let path = self.path_for(name);

        let mut records = match collection::load(&path) {
            Ok(records) => records,
            Err(LoadError::NotFound) => {
                tracing::warn!("File not found: {}", path.display());
                return Ok(MigrationOutcome::Missing);
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", path.display());
                return Ok(MigrationOutcome::Unreadable(e.to_string()));
            }
        };

        let summary = migrate_collection(&mut records);

        if summary.is_empty() {
            tracing::info!("No records needed migration in {}", path.display());
            return Ok(MigrationOutcome::Unchanged);
        }

        if dry_run {
            return Ok(MigrationOutcome::WouldMigrate(summary));
        }

        collection::save(&path, &records)?;
        tracing::info!("Migrated {} records in {}", summary.migrated, path.display());
        Ok(MigrationOutcome::Migrated(summary))
    }

    /// Builds the source verification report over the named collections, in
    /// the given order.
    ///
    /// Collections whose file does not exist are left out of the report.
    /// Collections that cannot be parsed are logged and left out as well.
    #[must_use]
    pub fn build_report<S: AsRef<str>>(&self, names: &[S]) -> String {
        let mut report = SourceReport::new();

        for name in names {
            let path = self.path_for(name.as_ref());
            match collection::load(&path) {
                Ok(records) => {
                    let title = path
                        .file_name()
                        .map_or_else(|| name.as_ref().into(), OsStr::to_string_lossy);
                    report.add_collection(&title, &records);
                }
                Err(LoadError::NotFound) => {
                    tracing::debug!("Skipping missing collection {}", path.display());
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {e}", path.display());
                }
            }
        }

        report.finish()
    }

    /// Builds the source report and writes it to `destination`, replacing it
    /// atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written. The previous content
    /// of `destination` is left untouched in that case.
    pub fn write_report<S: AsRef<str>>(
        &self,
        names: &[S],
        destination: &Path,
    ) -> Result<(), SaveError> {
        let report = self.build_report(names);
        collection::write_atomic(destination, report.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, name: &str, value: &serde_json::Value) {
        fs::write(dir.join(name), serde_json::to_string(value).unwrap()).unwrap();
    }

    #[test]
    fn open_without_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let content = ContentDir::open(tmp.path().to_path_buf()).unwrap();
        assert_eq!(content.config(), &Config::default());
    }

    #[test]
    fn open_with_broken_config_fails() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "_version = 7").unwrap();

        assert!(ContentDir::open(tmp.path().to_path_buf()).is_err());
    }

    #[test]
    fn configured_file_overrides_convention() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.set_file("work".to_string(), PathBuf::from("data/work_v2.json"));
        let content = ContentDir::new(tmp.path().to_path_buf(), config);

        assert_eq!(content.path_for("work"), tmp.path().join("data/work_v2.json"));
        assert_eq!(content.path_for("money"), tmp.path().join("money.json"));
    }

    #[test]
    fn discover_lists_json_files() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "work.json", &json!([]));
        write(tmp.path(), "health.json", &json!([]));
        fs::write(tmp.path().join("notes.md"), "ignored").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        write(&tmp.path().join("nested"), "deep.json", &json!([]));

        let content = ContentDir::open(tmp.path().to_path_buf()).unwrap();

        assert_eq!(content.discover(), ["health", "work"]);
    }

    #[test]
    fn migrate_rewrites_file() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "money.json",
            &json!([{"id": "money_l01_01", "stem": "貯金のコツは？", "answer_index": 1}]),
        );
        let content = ContentDir::open(tmp.path().to_path_buf()).unwrap();

        let outcome = content.migrate("money", false).unwrap();

        let MigrationOutcome::Migrated(summary) = outcome else {
            panic!("expected migration, got {outcome:?}");
        };
        assert_eq!(summary.migrated, 1);
        let records = content.load("money").unwrap();
        assert_eq!(records[0]["question"], json!("貯金のコツは？"));
        assert_eq!(records[0]["correct_index"], json!(1));
        assert!(!records[0].contains_key("stem"));
    }

    #[test]
    fn migrate_without_legacy_records_does_not_write() {
        let tmp = TempDir::new().unwrap();
        // Compact formatting would be replaced by indented output on any write.
        let original = r#"[{"id":"social_l01_01","question":"Q","source_id":"s"}]"#;
        fs::write(tmp.path().join("social.json"), original).unwrap();
        let content = ContentDir::open(tmp.path().to_path_buf()).unwrap();

        let outcome = content.migrate("social", false).unwrap();

        assert_eq!(outcome, MigrationOutcome::Unchanged);
        assert_eq!(
            fs::read_to_string(tmp.path().join("social.json")).unwrap(),
            original
        );
    }

    #[test]
    fn dry_run_does_not_write() {
        let tmp = TempDir::new().unwrap();
        let original = r#"[{"stem":"Q"}]"#;
        fs::write(tmp.path().join("money.json"), original).unwrap();
        let content = ContentDir::open(tmp.path().to_path_buf()).unwrap();

        let outcome = content.migrate("money", true).unwrap();

        assert!(matches!(outcome, MigrationOutcome::WouldMigrate(ref s) if s.migrated == 1));
        assert_eq!(
            fs::read_to_string(tmp.path().join("money.json")).unwrap(),
            original
        );
    }

    #[test]
    fn migrate_missing_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let content = ContentDir::open(tmp.path().to_path_buf()).unwrap();

        assert_eq!(
            content.migrate("money", false).unwrap(),
            MigrationOutcome::Missing
        );
        assert!(!tmp.path().join("money.json").exists());
    }

    #[test]
    fn migrate_malformed_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("money.json"), "{not json").unwrap();
        let content = ContentDir::open(tmp.path().to_path_buf()).unwrap();

        let outcome = content.migrate("money", false).unwrap();

        assert!(matches!(outcome, MigrationOutcome::Unreadable(_)));
        assert_eq!(
            fs::read_to_string(tmp.path().join("money.json")).unwrap(),
            "{not json"
        );
    }

    #[test]
    fn report_skips_missing_and_malformed_collections() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "health.json",
            &json!([{"id": "health_l01_01", "question": "Q1", "source_id": "a"}]),
        );
        fs::write(tmp.path().join("money.json"), "oops").unwrap();
        write(
            tmp.path(),
            "work.json",
            &json!([{"id": "work_l01_01", "question": "Q2", "source_id": "b"}]),
        );
        let content = ContentDir::open(tmp.path().to_path_buf()).unwrap();

        let report = content.build_report(&["health", "study", "money", "work"]);

        assert!(report.contains("## health.json (1 Questions)"));
        assert!(report.contains("## work.json (1 Questions)"));
        assert!(!report.contains("study.json"));
        assert!(!report.contains("money.json"));
        assert!(report.find("health.json").unwrap() < report.find("work.json").unwrap());
    }

    #[test]
    fn write_report_creates_destination() {
        let tmp = TempDir::new().unwrap();
        let content = ContentDir::open(tmp.path().to_path_buf()).unwrap();
        let destination = content.report_path();

        content
            .write_report(content.config().report_collections(), &destination)
            .unwrap();

        let text = fs::read_to_string(destination).unwrap();
        assert_eq!(text, SourceReport::new().finish());
    }
}
