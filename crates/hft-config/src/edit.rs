//! Field-level edits applied to a working document.
//!
//! Each [`Edit`] corresponds to one control of the editing surface. Sliders
//! clamp to `[0.0, 1.0]`; the terrain type menu only accepts known values;
//! count controls rebuild their list through [`resize_list`].

use crate::error::ConfigError;
use crate::model::{resize_list, validate_terrain_type};
use crate::schema::{Building, Configuration, MapDetails, MapFeatures, PointOfInterest};

/// One control change.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    HeightfieldImage(String),
    FocalPointX(f64),
    FocalPointY(f64),
    HorizontalScale(f64),
    VerticalScale(f64),
    PolygonCount(i64),
    /// `None` clears the value back to unset.
    VisibilityRadius(Option<f64>),
    /// `None` clears the value back to unset.
    MaxTriangles(Option<i64>),
    /// Raw menu value; rejected unless it names a known terrain type.
    TerrainType(String),
    WaterLevel(f64),
    VegetationDensity(f64),
    /// Desired number of buildings. Rebuilds the list with fresh records.
    BuildingCount(usize),
    /// Desired number of points of interest. Rebuilds the list with fresh records.
    PointOfInterestCount(usize),
    /// Replace one building in place.
    Building { index: usize, building: Building },
    /// Replace one point of interest in place.
    PointOfInterest {
        index: usize,
        point: PointOfInterest,
    },
}

impl Edit {
    /// Name of the document field this edit writes.
    pub fn field(&self) -> &'static str {
        match self {
            Edit::HeightfieldImage(_) => "heightfield_image",
            Edit::FocalPointX(_) | Edit::FocalPointY(_) => "focal_point",
            Edit::HorizontalScale(_) => "horizontal_scale",
            Edit::VerticalScale(_) => "vertical_scale",
            Edit::PolygonCount(_) => "polygon_count",
            Edit::VisibilityRadius(_) => "visibility_radius",
            Edit::MaxTriangles(_) => "max_triangles",
            Edit::TerrainType(_) => "terrain_type",
            Edit::WaterLevel(_) => "water_level",
            Edit::VegetationDensity(_) => "vegetation_density",
            Edit::BuildingCount(_) | Edit::Building { .. } => "buildings",
            Edit::PointOfInterestCount(_) | Edit::PointOfInterest { .. } => "points_of_interest",
        }
    }

    /// Every float the edit would write.
    fn floats(&self) -> Vec<f64> {
        match self {
            Edit::FocalPointX(v)
            | Edit::FocalPointY(v)
            | Edit::HorizontalScale(v)
            | Edit::VerticalScale(v)
            | Edit::VisibilityRadius(Some(v))
            | Edit::WaterLevel(v)
            | Edit::VegetationDensity(v) => vec![*v],
            Edit::Building { building, .. } => {
                vec![building.position[0], building.position[1], building.height]
            }
            Edit::PointOfInterest { point, .. } => point.position.to_vec(),
            _ => Vec::new(),
        }
    }
}

/// Slider range for water level and vegetation density.
fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Apply one edit. On error `config` is left unchanged.
///
/// NaN and infinities are rejected with [`ConfigError::NonFinite`]; JSON
/// would write them as `null`.
pub fn apply_edit(config: &mut Configuration, edit: Edit) -> Result<(), ConfigError> {
    let field = edit.field();
    let version = config.schema_version;
    let unavailable = || ConfigError::FieldUnavailable { field, version };

    if let Some(value) = edit.floats().into_iter().find(|v| !v.is_finite()) {
        return Err(ConfigError::NonFinite { field, value });
    }

    match edit {
        Edit::HeightfieldImage(path) => config.heightfield_image = path,
        Edit::FocalPointX(x) => config.focal_point[0] = x,
        Edit::FocalPointY(y) => config.focal_point[1] = y,
        Edit::HorizontalScale(v) => config.horizontal_scale = v,
        Edit::VerticalScale(v) => config.vertical_scale = v,
        Edit::PolygonCount(n) => config.polygon_count = n,
        Edit::VisibilityRadius(r) => config.visibility_radius = r,
        Edit::MaxTriangles(n) => config.max_triangles = n,
        Edit::TerrainType(raw) => {
            let details = details_mut(config).ok_or_else(unavailable)?;
            details.terrain_type = validate_terrain_type(&raw)?;
        }
        Edit::WaterLevel(v) => {
            details_mut(config).ok_or_else(unavailable)?.water_level = clamp_unit(v);
        }
        Edit::VegetationDensity(v) => {
            details_mut(config).ok_or_else(unavailable)?.vegetation_density = clamp_unit(v);
        }
        Edit::BuildingCount(count) => {
            let features = features_mut(config).ok_or_else(unavailable)?;
            let old = std::mem::take(&mut features.buildings);
            features.buildings = resize_list(old, count, Building::default);
        }
        Edit::PointOfInterestCount(count) => {
            let features = features_mut(config).ok_or_else(unavailable)?;
            let old = std::mem::take(&mut features.points_of_interest);
            features.points_of_interest = resize_list(old, count, PointOfInterest::default);
        }
        Edit::Building { index, building } => {
            let features = features_mut(config).ok_or_else(unavailable)?;
            let len = features.buildings.len();
            let slot = features
                .buildings
                .get_mut(index)
                .ok_or(ConfigError::IndexOutOfRange { list: field, index, len })?;
            *slot = building;
        }
        Edit::PointOfInterest { index, point } => {
            let features = features_mut(config).ok_or_else(unavailable)?;
            let len = features.points_of_interest.len();
            let slot = features
                .points_of_interest
                .get_mut(index)
                .ok_or(ConfigError::IndexOutOfRange { list: field, index, len })?;
            *slot = point;
        }
    }

    log::debug!("applied edit to {field}");
    Ok(())
}

fn details_mut(config: &mut Configuration) -> Option<&mut MapDetails> {
    config.map_details.as_mut()
}

fn features_mut(config: &mut Configuration) -> Option<&mut MapFeatures> {
    details_mut(config)?.features.as_mut()
}
