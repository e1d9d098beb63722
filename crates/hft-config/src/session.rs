//! Session-scoped working document.
//!
//! An [`EditSession`] owns its [`Configuration`]; sessions share nothing, so
//! any number of them can run side by side.

use std::path::{Path, PathBuf};

use crate::edit::{Edit, apply_edit};
use crate::error::ConfigError;
use crate::export::{ExportPayload, write_atomic};
use crate::model::{default_config, load_config, merge_defaults, serialize};
use crate::schema::{Configuration, SchemaVersion};

/// One editing session: a form version plus the document being edited.
#[derive(Debug, Clone)]
pub struct EditSession {
    form_version: SchemaVersion,
    config: Configuration,
}

impl EditSession {
    /// Start from the default document for `version`.
    pub fn new(version: SchemaVersion) -> Self {
        Self {
            form_version: version,
            config: default_config(version),
        }
    }

    /// The version of the form this session was opened with.
    pub fn form_version(&self) -> SchemaVersion {
        self.form_version
    }

    /// The current working document.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn into_config(self) -> Configuration {
        self.config
    }

    /// Replace the working document with `raw`, merged with the form's defaults.
    ///
    /// On a parse error the current document is kept.
    pub fn load(&mut self, raw: impl AsRef<[u8]>) -> Result<(), ConfigError> {
        let partial = load_config(raw)?;
        self.config = merge_defaults(partial, self.form_version);
        log::info!(
            "Loaded configuration (schema version {})",
            self.config.schema_version
        );
        Ok(())
    }

    /// Read `path` and [`load`](Self::load) it.
    pub fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = std::fs::read(path).map_err(ConfigError::ReadError)?;
        self.load(raw)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(())
    }

    /// Apply one edit; a rejected edit leaves the document unchanged.
    pub fn apply(&mut self, edit: Edit) -> Result<(), ConfigError> {
        apply_edit(&mut self.config, edit)
    }

    /// Apply a whole edit pass. Rejected edits are skipped and returned.
    pub fn apply_all(&mut self, edits: impl IntoIterator<Item = Edit>) -> Vec<ConfigError> {
        let mut rejected = Vec::new();
        for edit in edits {
            if let Err(e) = self.apply(edit) {
                log::warn!("Edit rejected: {e}");
                rejected.push(e);
            }
        }
        rejected
    }

    /// The document as indented JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serialize(&self.config)
    }

    /// Save the document to `path`.
    ///
    /// A missing or empty path fails with [`ConfigError::MissingFileName`]
    /// and writes nothing.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let path = path
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingFileName)?;
        let json = self.to_json()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(ConfigError::WriteError)?;
        }
        write_atomic(path, json.as_bytes())?;
        log::info!("Configuration saved to {}", path.display());
        Ok(path.to_path_buf())
    }

    /// The document as a download payload, named after the form.
    pub fn export(&self) -> Result<ExportPayload, ConfigError> {
        let payload = ExportPayload::new(self.form_version, self.to_json()?);
        log::debug!("Prepared export {} ({} bytes)", payload.file_name, payload.bytes.len());
        Ok(payload)
    }

    /// Heading shown above the form.
    pub fn title(&self) -> &'static str {
        if self.form_version.has_map_features() {
            "HeightfieldTesselator and Map Designer"
        } else {
            "HeightfieldTesselator Configuration"
        }
    }

    /// Static notice shown in place of a preview.
    pub fn preview_notice(&self) -> &'static str {
        if self.form_version.has_map_features() {
            "Note: Preview rendering is a future feature, leveraging Panda3D."
        } else {
            "Note: Preview rendering not available in this app."
        }
    }
}
