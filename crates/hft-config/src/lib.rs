//! Configuration model for the HeightfieldTesselator designer.
//!
//! Defines the three progressive document shapes, default supply, merge-on-load,
//! record list resizing and 4-space-indented JSON round-trip. Editing happens
//! through explicit [`Edit`] passes on a session-local [`EditSession`]. The
//! designer's own preferences persist as RON with CLI overrides via clap.

mod cli;
mod edit;
mod error;
mod export;
mod model;
mod schema;
mod session;
mod settings;

pub use cli::CliArgs;
pub use edit::{Edit, apply_edit};
pub use error::{ConfigError, ValidationError};
pub use export::{
    ExportPayload, HEIGHTFIELD_FILE_NAME, JSON_MIME, MAP_FILE_NAME, export_file_name,
    write_atomic,
};
pub use model::{
    default_config, load_config, merge_defaults, resize_list, serialize, validate_terrain_type,
};
pub use schema::{
    Building, Configuration, MapDetails, MapFeatures, PartialConfiguration, PartialMapDetails,
    PointOfInterest, SchemaVersion, TerrainType,
};
pub use session::EditSession;
pub use settings::{Settings, default_settings_dir};
