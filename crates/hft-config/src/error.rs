//! Configuration error types.

use crate::schema::SchemaVersion;

/// A value outside the allowed set of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} {value:?} (expected one of: {allowed})")]
pub struct ValidationError {
    /// Name of the field being validated.
    pub field: &'static str,
    /// The rejected value.
    pub value: String,
    /// Comma-separated list of accepted values.
    pub allowed: &'static str,
}

/// Errors that can occur when loading, editing, saving, or exporting a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a document or settings file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write a document or settings file to disk.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// The input is not valid JSON, or a typed field holds the wrong JSON type.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] serde_json::Error),

    /// Failed to serialize the configuration to JSON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] serde_json::Error),

    /// An enumerated field was given a value outside its set.
    #[error(transparent)]
    ValidationError(#[from] ValidationError),

    /// A numeric edit carried NaN or an infinity, which JSON cannot represent.
    #[error("{field} must be a finite number, got {value}")]
    NonFinite {
        /// Field targeted by the edit.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Save requested without a destination path.
    #[error("no file name given to save the configuration to")]
    MissingFileName,

    /// An edit targeted a field the document's schema version does not carry.
    #[error("field `{field}` is not part of schema version {version}")]
    FieldUnavailable {
        /// Field targeted by the edit.
        field: &'static str,
        /// Version of the working document.
        version: SchemaVersion,
    },

    /// A record edit addressed an index past the end of its list.
    #[error("{list} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Which list was addressed.
        list: &'static str,
        /// Requested index.
        index: usize,
        /// Current list length.
        len: usize,
    },

    /// Failed to parse the designer settings file.
    #[error("failed to parse settings: {0}")]
    SettingsParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize the designer settings.
    #[error("failed to serialize settings: {0}")]
    SettingsSerializeError(#[source] ron::Error),
}
