use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Configuration for a lesson content directory.
///
/// This struct holds the collection lists each command operates on by
/// default, where collections are stored, and where the source report is
/// written. Paths are relative to the content directory unless absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Collections migrated by `lessons migrate` when none are named.
    migrate: Vec<String>,

    /// Collections included in the source report when none are named, in
    /// report order.
    report: Vec<String>,

    /// Where the source report is written.
    report_path: PathBuf,

    /// Storage locations for collections that don't follow the
    /// `<name>.json` convention.
    files: BTreeMap<String, PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrate: default_migrate(),
            report: default_report(),
            report_path: default_report_path(),
            files: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(Error::Read)?;
        toml::from_str(&content).map_err(Error::Parse)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let content = toml::to_string_pretty(self).map_err(Error::Serialize)?;
        std::fs::write(path, content).map_err(Error::Write)
    }

    /// Returns the collections migrated by default.
    #[must_use]
    pub fn migrate_collections(&self) -> &[String] {
        &self.migrate
    }

    /// Returns the collections reported by default, in report order.
    #[must_use]
    pub fn report_collections(&self) -> &[String] {
        &self.report
    }

    /// Returns the report destination.
    #[must_use]
    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Returns the storage location of a collection, relative to the content
    /// directory unless overridden with an absolute path.
    ///
    /// Collections are stored as `<name>.json` unless listed in `files`.
    #[must_use]
    pub fn file_for(&self, name: &str) -> PathBuf {
        self.files
            .get(name)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(format!("{name}.json")))
    }

    /// Stores a collection somewhere other than `<name>.json`.
    pub fn set_file(&mut self, name: String, path: PathBuf) {
        self.files.insert(name, path);
    }

    /// Sets the report destination.
    pub fn set_report_path(&mut self, path: PathBuf) {
        self.report_path = path;
    }
}

/// Errors that can occur when loading or saving a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] io::Error),
    /// The file is not valid configuration TOML.
    #[error("Failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),
    /// The file could not be written.
    #[error("Failed to write config file: {0}")]
    Write(#[source] io::Error),
}

fn default_migrate() -> Vec<String> {
    ["money", "social"].map(String::from).to_vec()
}

fn default_report() -> Vec<String> {
    ["health", "study", "money", "social", "work"]
        .map(String::from)
        .to_vec()
}

fn default_report_path() -> PathBuf {
    PathBuf::from("source_verification_report.md")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_migrate")]
        migrate: Vec<String>,

        #[serde(default = "default_report")]
        report: Vec<String>,

        #[serde(default = "default_report_path")]
        report_path: PathBuf,

        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        files: BTreeMap<String, PathBuf>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                migrate,
                report,
                report_path,
                files,
            } => Self {
                migrate,
                report,
                report_path,
                files,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            migrate: config.migrate,
            report: config.report,
            report_path: config.report_path,
            files: config.files,
        }
    }
}
