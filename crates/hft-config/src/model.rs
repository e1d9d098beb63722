//! Default supply, merge-on-load, list resizing and JSON round-trip.

use serde::Serialize;
use serde::ser::Error as _;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{ConfigError, ValidationError};
use crate::schema::{
    Configuration, MapDetails, MapFeatures, PartialConfiguration, PartialMapDetails,
    SchemaVersion, TerrainType,
};

const INDENT: &[u8] = b"    ";

/// The canonical default document for `version`.
pub fn default_config(version: SchemaVersion) -> Configuration {
    let map_details = version.has_map_details().then(|| MapDetails {
        features: version.has_map_features().then(MapFeatures::default),
        ..MapDetails::default()
    });

    Configuration {
        schema_version: version,
        heightfield_image: String::new(),
        focal_point: [0.0, 0.0],
        horizontal_scale: 1.0,
        vertical_scale: 255.0,
        polygon_count: 10_000,
        visibility_radius: None,
        max_triangles: None,
        map_details,
        extra: serde_json::Map::new(),
    }
}

/// Parse a JSON document of any schema version.
///
/// Missing fields are fine; they are filled by [`merge_defaults`]. Fails with
/// [`ConfigError::ParseError`] on invalid JSON or when a known field holds a
/// value of the wrong JSON type.
pub fn load_config(raw: impl AsRef<[u8]>) -> Result<PartialConfiguration, ConfigError> {
    let partial: PartialConfiguration =
        serde_json::from_slice(raw.as_ref()).map_err(ConfigError::ParseError)?;
    log::debug!(
        "parsed document (shape v{}, {} unknown keys)",
        partial.shape_version(),
        partial.extra.len()
    );
    Ok(partial)
}

/// Fill every absent or `null` field with the defaults of `version`.
///
/// The result's version is the larger of `version` and the version detected in
/// the document, so fields from a richer document are never dropped. An
/// invalid `terrain_type` is replaced with the default and logged.
pub fn merge_defaults(
    partial: impl Into<PartialConfiguration>,
    version: SchemaVersion,
) -> Configuration {
    let partial = partial.into();
    let version = version.max(partial.detected_version());
    let defaults = default_config(version);

    let map_details = version
        .has_map_details()
        .then(|| merge_map_details(partial.map_details.unwrap_or_default(), version));

    Configuration {
        schema_version: version,
        heightfield_image: partial.heightfield_image.unwrap_or(defaults.heightfield_image),
        focal_point: partial.focal_point.unwrap_or(defaults.focal_point),
        horizontal_scale: partial.horizontal_scale.unwrap_or(defaults.horizontal_scale),
        vertical_scale: partial.vertical_scale.unwrap_or(defaults.vertical_scale),
        polygon_count: partial.polygon_count.unwrap_or(defaults.polygon_count),
        // Unset stays unset.
        visibility_radius: partial.visibility_radius,
        max_triangles: partial.max_triangles,
        map_details,
        extra: partial.extra,
    }
}

fn merge_map_details(partial: PartialMapDetails, version: SchemaVersion) -> MapDetails {
    let defaults = MapDetails::default();

    let terrain_type = match partial.terrain_type {
        Some(raw) => validate_terrain_type(&raw).unwrap_or_else(|err| {
            log::warn!("{err}; using {}", defaults.terrain_type);
            defaults.terrain_type
        }),
        None => defaults.terrain_type,
    };

    let features = version.has_map_features().then(|| MapFeatures {
        buildings: partial.buildings.unwrap_or_default(),
        lanes: partial.lanes.unwrap_or_default(),
        points_of_interest: partial.points_of_interest.unwrap_or_default(),
    });

    MapDetails {
        terrain_type,
        water_level: partial.water_level.unwrap_or(defaults.water_level),
        vegetation_density: partial
            .vegetation_density
            .unwrap_or(defaults.vegetation_density),
        features,
        extra: partial.extra,
    }
}

/// Rebuild a record list with exactly `desired_count` fresh records.
///
/// The contents of `list` are discarded, not truncated or padded: every
/// returned record comes from `factory`.
pub fn resize_list<T>(list: Vec<T>, desired_count: usize, factory: impl FnMut() -> T) -> Vec<T> {
    log::debug!(
        "rebuilding list: {} records discarded, {desired_count} created",
        list.len()
    );
    drop(list);
    std::iter::repeat_with(factory).take(desired_count).collect()
}

/// Serialize as JSON with 4-space indentation, keys in schema order.
pub fn serialize(config: &Configuration) -> Result<String, ConfigError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    config
        .serialize(&mut ser)
        .map_err(ConfigError::SerializeError)?;
    String::from_utf8(buf).map_err(|e| ConfigError::SerializeError(serde_json::Error::custom(e)))
}

/// Check a terrain type against the allowed set.
pub fn validate_terrain_type(value: &str) -> Result<TerrainType, ValidationError> {
    value.parse()
}
