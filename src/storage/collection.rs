use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use tempfile::{Builder, NamedTempFile};

use crate::domain::Record;

/// Errors that can occur when loading a collection.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The collection file was not found.
    #[error("collection file not found")]
    NotFound,
    /// An I/O error occurred.
    #[error("failed to read collection: {0}")]
    Io(#[from] io::Error),
    /// The file is not a JSON array of objects.
    #[error("collection is not a JSON array of objects: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when saving a collection or report.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// An I/O error occurred.
    #[error("failed to write {path}: {source}")]
    Io {
        /// The destination that could not be written.
        path: String,
        /// The underlying error.
        source: io::Error,
    },
    /// The records could not be serialized.
    #[error("failed to serialize collection: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads a collection from a JSON file.
///
/// # Errors
///
/// Returns [`LoadError::NotFound`] if there is no file at `path`, and an error
/// if it cannot be read or is not a JSON array of objects.
pub fn load(path: &Path) -> Result<Vec<Record>, LoadError> {
    let content = fs::read_to_string(path).map_err(|io_error| match io_error.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound,
        _ => LoadError::Io(io_error),
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Serializes a collection the way it is stored on disk.
///
/// Two-space indentation, non-ASCII text kept literal, trailing newline.
///
/// # Errors
///
/// Returns an error if the records cannot be serialized.
pub fn to_json(records: &[Record]) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    Ok(json)
}

/// Writes a collection to a JSON file, replacing it atomically.
///
/// # Errors
///
/// Returns an error if the records cannot be serialized or the file cannot be
/// written. On error the previous content of `path` is left untouched.
pub fn save(path: &Path, records: &[Record]) -> Result<(), SaveError> {
    let json = to_json(records)?;
    write_atomic(path, json.as_bytes())
}

/// Writes `contents` to `path` by way of a temporary file in the same
/// directory, so that readers never observe a partially written file.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, or if
/// it cannot be moved into place.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), SaveError> {
    let io_error = |source: io::Error| SaveError::Io {
        path: path.display().to_string(),
        source,
    };

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = match fs::metadata(path) {
        Ok(existing) => {
            let file = NamedTempFile::new_in(dir).map_err(io_error)?;
            file.as_file()
                .set_permissions(existing.permissions())
                .map_err(io_error)?;
            file
        }
        Err(_) => new_temp_file(dir).map_err(io_error)?,
    };
    file.write_all(contents).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// A temporary file created with the mode `File::create` would use.
#[cfg(unix)]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}
