//! Configuration document types for the three schema versions, with defaults.
//!
//! A version-1 document carries only the terrain fields. Version 2 adds
//! [`MapDetails`], and version 3 adds the building, lane and point-of-interest
//! lists inside it ([`MapFeatures`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// SchemaVersion
// ---------------------------------------------------------------------------

/// Progressive document shape. Persisted as the integer `schema_version`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SchemaVersion {
    /// Terrain fields only.
    V1,
    /// Terrain fields plus map details.
    V2,
    /// Map details with building and point-of-interest lists.
    #[default]
    V3,
}

impl SchemaVersion {
    /// All versions, oldest first.
    pub const ALL: [SchemaVersion; 3] = [SchemaVersion::V1, SchemaVersion::V2, SchemaVersion::V3];

    /// The integer written to `schema_version`.
    pub fn number(self) -> u8 {
        match self {
            SchemaVersion::V1 => 1,
            SchemaVersion::V2 => 2,
            SchemaVersion::V3 => 3,
        }
    }

    /// Whether documents of this version carry `map_details`.
    pub fn has_map_details(self) -> bool {
        self >= SchemaVersion::V2
    }

    /// Whether documents of this version carry the building/POI lists.
    pub fn has_map_features(self) -> bool {
        self >= SchemaVersion::V3
    }
}

impl From<SchemaVersion> for u8 {
    fn from(version: SchemaVersion) -> Self {
        version.number()
    }
}

impl TryFrom<u8> for SchemaVersion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SchemaVersion::V1),
            2 => Ok(SchemaVersion::V2),
            3 => Ok(SchemaVersion::V3),
            other => Err(format!("unsupported schema version {other} (expected 1, 2 or 3)")),
        }
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("schema version must be 1, 2 or 3, got {s:?}"))?;
        SchemaVersion::try_from(n)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// TerrainType
// ---------------------------------------------------------------------------

/// Base terrain the map is designed around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainType {
    #[default]
    Plain,
    Mountain,
    Desert,
    Forest,
}

impl TerrainType {
    /// All terrain types in menu order.
    pub const ALL: [TerrainType; 4] = [
        TerrainType::Plain,
        TerrainType::Mountain,
        TerrainType::Desert,
        TerrainType::Forest,
    ];

    const ALLOWED: &'static str = "plain, mountain, desert, forest";

    pub fn as_str(self) -> &'static str {
        match self {
            TerrainType::Plain => "plain",
            TerrainType::Mountain => "mountain",
            TerrainType::Desert => "desert",
            TerrainType::Forest => "forest",
        }
    }
}

impl FromStr for TerrainType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TerrainType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError {
                field: "terrain_type",
                value: s.to_string(),
                allowed: TerrainType::ALLOWED,
            })
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A building placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Building {
    pub name: String,
    /// Map-space (x, y).
    pub position: [f64; 2],
    pub height: f64,
}

impl Default for Building {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: [0.0, 0.0],
            height: 10.0,
        }
    }
}

/// A named, described location on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointOfInterest {
    pub name: String,
    /// Map-space (x, y).
    pub position: [f64; 2],
    pub description: String,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// A complete, defaulted configuration document.
///
/// Field order is the serialized key order. Keys this tool does not know
/// about are kept in `extra` and written after the known ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    pub schema_version: SchemaVersion,
    /// Path or identifier of the heightfield image. May be empty.
    pub heightfield_image: String,
    /// Tessellation focus (x, y).
    pub focal_point: [f64; 2],
    pub horizontal_scale: f64,
    pub vertical_scale: f64,
    pub polygon_count: i64,
    /// `None` is "unset" and serializes as `null`.
    pub visibility_radius: Option<f64>,
    /// `None` is "unset" and serializes as `null`.
    pub max_triangles: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_details: Option<MapDetails>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Configuration {
    /// Visibility radius as shown in a numeric input: unset reads as `0.0`.
    pub fn visibility_radius_for_editing(&self) -> f64 {
        self.visibility_radius.unwrap_or(0.0)
    }

    /// Max triangles as shown in a numeric input: unset reads as `0`.
    pub fn max_triangles_for_editing(&self) -> i64 {
        self.max_triangles.unwrap_or(0)
    }

    /// The map feature lists, when this is a version-3 document.
    pub fn features(&self) -> Option<&MapFeatures> {
        self.map_details.as_ref()?.features.as_ref()
    }
}

/// Map design details (version 2 and later).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDetails {
    pub terrain_type: TerrainType,
    /// Nominally in `[0.0, 1.0]`; only edits clamp it.
    pub water_level: f64,
    /// Nominally in `[0.0, 1.0]`; only edits clamp it.
    pub vegetation_density: f64,
    #[serde(flatten)]
    pub features: Option<MapFeatures>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for MapDetails {
    fn default() -> Self {
        Self {
            terrain_type: TerrainType::default(),
            water_level: 0.0,
            vegetation_density: 0.5,
            features: None,
            extra: Map::new(),
        }
    }
}

/// Repeated records carried by version-3 documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapFeatures {
    pub buildings: Vec<Building>,
    /// Not edited by this tool; carried through verbatim.
    pub lanes: Vec<Value>,
    pub points_of_interest: Vec<PointOfInterest>,
}

// ---------------------------------------------------------------------------
// Partial documents (load input)
// ---------------------------------------------------------------------------

/// A document as loaded from JSON: every field may be absent or `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartialConfiguration {
    /// Kept untyped so a bad tag falls back to shape detection instead of failing the load.
    pub schema_version: Option<Value>,
    pub heightfield_image: Option<String>,
    pub focal_point: Option<[f64; 2]>,
    pub horizontal_scale: Option<f64>,
    pub vertical_scale: Option<f64>,
    pub polygon_count: Option<i64>,
    pub visibility_radius: Option<f64>,
    pub max_triangles: Option<i64>,
    pub map_details: Option<PartialMapDetails>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Loaded `map_details`; `terrain_type` is validated during the merge.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartialMapDetails {
    pub terrain_type: Option<String>,
    pub water_level: Option<f64>,
    pub vegetation_density: Option<f64>,
    pub buildings: Option<Vec<Building>>,
    pub lanes: Option<Vec<Value>>,
    pub points_of_interest: Option<Vec<PointOfInterest>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PartialMapDetails {
    fn has_features(&self) -> bool {
        self.buildings.is_some() || self.lanes.is_some() || self.points_of_interest.is_some()
    }
}

impl PartialConfiguration {
    /// Version implied by field presence alone, for untagged documents.
    pub fn shape_version(&self) -> SchemaVersion {
        match &self.map_details {
            Some(details) if details.has_features() => SchemaVersion::V3,
            Some(_) => SchemaVersion::V2,
            None => SchemaVersion::V1,
        }
    }

    /// The explicit `schema_version` tag, if present and valid.
    pub fn tagged_version(&self) -> Option<SchemaVersion> {
        let tag = self.schema_version.as_ref()?;
        let parsed = tag
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .and_then(|n| SchemaVersion::try_from(n).ok());
        if parsed.is_none() {
            log::warn!("ignoring invalid schema_version tag {tag}");
        }
        parsed
    }

    /// Detected version: the tag, raised to the shape version if the document
    /// carries fields the tag does not cover.
    pub fn detected_version(&self) -> SchemaVersion {
        let shape = self.shape_version();
        self.tagged_version().map_or(shape, |tag| tag.max(shape))
    }
}

impl From<Configuration> for PartialConfiguration {
    fn from(config: Configuration) -> Self {
        Self {
            schema_version: Some(Value::from(config.schema_version.number())),
            heightfield_image: Some(config.heightfield_image),
            focal_point: Some(config.focal_point),
            horizontal_scale: Some(config.horizontal_scale),
            vertical_scale: Some(config.vertical_scale),
            polygon_count: Some(config.polygon_count),
            visibility_radius: config.visibility_radius,
            max_triangles: config.max_triangles,
            map_details: config.map_details.map(PartialMapDetails::from),
            extra: config.extra,
        }
    }
}

impl From<MapDetails> for PartialMapDetails {
    fn from(details: MapDetails) -> Self {
        let (buildings, lanes, points_of_interest) = match details.features {
            Some(f) => (Some(f.buildings), Some(f.lanes), Some(f.points_of_interest)),
            None => (None, None, None),
        };
        Self {
            terrain_type: Some(details.terrain_type.as_str().to_string()),
            water_level: Some(details.water_level),
            vegetation_density: Some(details.vegetation_density),
            buildings,
            lanes,
            points_of_interest,
            extra: details.extra,
        }
    }
}
