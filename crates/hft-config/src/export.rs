//! Export payloads and all-or-nothing file writes.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::SchemaVersion;

/// MIME type of every exported document.
pub const JSON_MIME: &str = "application/json";

/// Download file name for the single-terrain variants.
pub const HEIGHTFIELD_FILE_NAME: &str = "heightfield_config.json";

/// Download file name for the map designer variant.
pub const MAP_FILE_NAME: &str = "map_config.json";

/// An in-memory document offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportPayload {
    /// Wrap serialized JSON under the fixed file name for `version`.
    pub fn new(version: SchemaVersion, json: String) -> Self {
        Self {
            file_name: export_file_name(version),
            mime: JSON_MIME,
            bytes: json.into_bytes(),
        }
    }

    /// Write the payload into `dir` under its file name.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ConfigError> {
        std::fs::create_dir_all(dir).map_err(ConfigError::WriteError)?;
        let path = dir.join(self.file_name);
        write_atomic(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Fixed download file name for a document version.
pub fn export_file_name(version: SchemaVersion) -> &'static str {
    if version.has_map_features() {
        MAP_FILE_NAME
    } else {
        HEIGHTFIELD_FILE_NAME
    }
}

/// Write `contents` to `path` without ever leaving a truncated file.
///
/// Data goes to a sibling `.tmp` file which is synced and closed before being
/// renamed over `path`. On failure the temporary file is removed and any
/// existing file at `path` is untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ConfigError> {
    let Some(file_name) = path.file_name() else {
        return Err(ConfigError::MissingFileName);
    };
    let mut temp_name = OsString::from(file_name);
    temp_name.push(".tmp");
    let temp = path.with_file_name(temp_name);

    let result = write_synced(&temp, contents).and_then(|()| std::fs::rename(&temp, path));
    if let Err(e) = result {
        let _ = std::fs::remove_file(&temp);
        return Err(ConfigError::WriteError(e));
    }
    Ok(())
}

fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}
