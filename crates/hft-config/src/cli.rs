//! Command-line argument parsing for the designer.

use std::path::PathBuf;

use clap::Parser;

use crate::Settings;
use crate::edit::Edit;
use crate::schema::{Building, PointOfInterest, SchemaVersion};

/// HeightfieldTesselator configuration designer.
///
/// Loads a configuration document (or starts from defaults), applies the
/// edits given as flags, prints the result and optionally saves or exports it.
#[derive(Parser, Debug, Default)]
#[command(name = "hft-designer", about = "HeightfieldTesselator configuration designer")]
pub struct CliArgs {
    /// Path to settings directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Form schema version (1, 2 or 3).
    #[arg(long)]
    pub schema: Option<SchemaVersion>,

    /// JSON configuration to load.
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Heightfield image path.
    #[arg(long)]
    pub heightfield_image: Option<String>,

    /// Focal point X.
    #[arg(long, allow_negative_numbers = true)]
    pub focal_x: Option<f64>,

    /// Focal point Y.
    #[arg(long, allow_negative_numbers = true)]
    pub focal_y: Option<f64>,

    /// Horizontal scale.
    #[arg(long)]
    pub horizontal_scale: Option<f64>,

    /// Vertical scale.
    #[arg(long)]
    pub vertical_scale: Option<f64>,

    /// Polygon count.
    #[arg(long)]
    pub polygon_count: Option<i64>,

    /// Visibility radius.
    #[arg(long, conflicts_with = "clear_visibility_radius")]
    pub visibility_radius: Option<f64>,

    /// Reset visibility radius to unset.
    #[arg(long)]
    pub clear_visibility_radius: bool,

    /// Maximum triangle count.
    #[arg(long, conflicts_with = "clear_max_triangles")]
    pub max_triangles: Option<i64>,

    /// Reset max triangles to unset.
    #[arg(long)]
    pub clear_max_triangles: bool,

    /// Terrain type (plain, mountain, desert, forest).
    #[arg(long)]
    pub terrain_type: Option<String>,

    /// Water level, clamped to 0.0..=1.0.
    #[arg(long, allow_negative_numbers = true)]
    pub water_level: Option<f64>,

    /// Vegetation density, clamped to 0.0..=1.0.
    #[arg(long, allow_negative_numbers = true)]
    pub vegetation_density: Option<f64>,

    /// Number of buildings. Rebuilds the list with default records.
    #[arg(long)]
    pub buildings: Option<usize>,

    /// Number of points of interest. Rebuilds the list with default records.
    #[arg(long)]
    pub points_of_interest: Option<usize>,

    /// Replace one building, e.g. `0:Tower:5:5:80`. Repeatable; applied
    /// after the counts.
    #[arg(long = "building", value_name = "INDEX:NAME:X:Y:HEIGHT", value_parser = parse_building)]
    pub building: Vec<(usize, Building)>,

    /// Replace one point of interest, e.g. `0:Oasis:40:12:Palm trees`.
    /// Repeatable; applied after the counts.
    #[arg(long = "poi", value_name = "INDEX:NAME:X:Y:DESCRIPTION", value_parser = parse_point_of_interest)]
    pub point_of_interest: Vec<(usize, PointOfInterest)>,

    /// Save to this file (e.g., config.json).
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub save: Option<String>,

    /// Export under the fixed download file name into the export directory.
    #[arg(long)]
    pub export: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// The edit pass described by the flags, in form order.
    pub fn edits(&self) -> Vec<Edit> {
        let mut edits = Vec::new();

        if let Some(ref image) = self.heightfield_image {
            edits.push(Edit::HeightfieldImage(image.clone()));
        }
        if let Some(x) = self.focal_x {
            edits.push(Edit::FocalPointX(x));
        }
        if let Some(y) = self.focal_y {
            edits.push(Edit::FocalPointY(y));
        }
        if let Some(v) = self.horizontal_scale {
            edits.push(Edit::HorizontalScale(v));
        }
        if let Some(v) = self.vertical_scale {
            edits.push(Edit::VerticalScale(v));
        }
        if let Some(n) = self.polygon_count {
            edits.push(Edit::PolygonCount(n));
        }
        if self.clear_visibility_radius {
            edits.push(Edit::VisibilityRadius(None));
        } else if let Some(r) = self.visibility_radius {
            edits.push(Edit::VisibilityRadius(Some(r)));
        }
        if self.clear_max_triangles {
            edits.push(Edit::MaxTriangles(None));
        } else if let Some(n) = self.max_triangles {
            edits.push(Edit::MaxTriangles(Some(n)));
        }
        if let Some(ref terrain) = self.terrain_type {
            edits.push(Edit::TerrainType(terrain.clone()));
        }
        if let Some(v) = self.water_level {
            edits.push(Edit::WaterLevel(v));
        }
        if let Some(v) = self.vegetation_density {
            edits.push(Edit::VegetationDensity(v));
        }
        if let Some(n) = self.buildings {
            edits.push(Edit::BuildingCount(n));
        }
        if let Some(n) = self.points_of_interest {
            edits.push(Edit::PointOfInterestCount(n));
        }
        for (index, building) in &self.building {
            edits.push(Edit::Building {
                index: *index,
                building: building.clone(),
            });
        }
        for (index, point) in &self.point_of_interest {
            edits.push(Edit::PointOfInterest {
                index: *index,
                point: point.clone(),
            });
        }

        edits
    }
}

/// `INDEX:NAME:X:Y:HEIGHT`. The name may itself contain `:`.
fn parse_building(raw: &str) -> Result<(usize, Building), String> {
    let malformed = || format!("expected INDEX:NAME:X:Y:HEIGHT, got {raw:?}");
    let (index, rest) = raw.split_once(':').ok_or_else(malformed)?;
    let mut tail = rest.rsplitn(4, ':');
    let (Some(height), Some(y), Some(x), Some(name)) =
        (tail.next(), tail.next(), tail.next(), tail.next())
    else {
        return Err(malformed());
    };
    let building = Building {
        name: name.to_string(),
        position: [number(x)?, number(y)?],
        height: number(height)?,
    };
    Ok((parse_index(index)?, building))
}

/// `INDEX:NAME:X:Y:DESCRIPTION`. The description takes the rest of the value.
fn parse_point_of_interest(raw: &str) -> Result<(usize, PointOfInterest), String> {
    let mut parts = raw.splitn(5, ':');
    let (Some(index), Some(name), Some(x), Some(y), Some(description)) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(format!("expected INDEX:NAME:X:Y:DESCRIPTION, got {raw:?}"));
    };
    let point = PointOfInterest {
        name: name.to_string(),
        position: [number(x)?, number(y)?],
        description: description.to_string(),
    };
    Ok((parse_index(index)?, point))
}

fn parse_index(raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse()
        .map_err(|e| format!("invalid index {raw:?}: {e}"))
}

fn number(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse()
        .map_err(|e| format!("invalid number {raw:?}: {e}"))
}

impl Settings {
    /// Apply CLI overrides to loaded settings.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(schema) = args.schema {
            self.default_schema = schema;
        }
        if let Some(ref level) = args.log_level {
            self.log_level = level.clone();
        }
    }
}
