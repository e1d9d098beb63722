//! End-to-end editing scenarios through the public API.

use hft_config::{
    Building, ConfigError, Edit, EditSession, PointOfInterest, SchemaVersion, TerrainType,
    default_config, load_config, merge_defaults, resize_list, serialize,
};

#[test]
fn edit_serialize_reload_v1() {
    let mut session = EditSession::new(SchemaVersion::V1);
    session.apply(Edit::HorizontalScale(2.5)).unwrap();
    let json = session.to_json().unwrap();

    let reloaded = merge_defaults(load_config(&json).unwrap(), SchemaVersion::V1);
    assert_eq!(reloaded.horizontal_scale, 2.5);

    let expected = hft_config::Configuration {
        horizontal_scale: 2.5,
        ..default_config(SchemaVersion::V1)
    };
    assert_eq!(reloaded, expected);
}

#[test]
fn empty_document_at_v3_is_default() {
    let merged = merge_defaults(load_config("{}").unwrap(), SchemaVersion::V3);
    assert_eq!(merged, default_config(SchemaVersion::V3));
}

#[test]
fn loaded_water_level_is_clamped_only_by_the_next_edit() {
    let mut session = EditSession::new(SchemaVersion::V3);
    session.load(r#"{"map_details":{"water_level": 5.0}}"#).unwrap();
    let water = |s: &EditSession| s.config().map_details.as_ref().unwrap().water_level;
    assert_eq!(water(&session), 5.0);

    let edited = water(&session) + 0.5;
    session.apply(Edit::WaterLevel(edited)).unwrap();
    assert_eq!(water(&session), 1.0);
}

#[test]
fn legacy_untagged_v2_document() {
    let legacy = r#"{
    "heightfield_image": "hills.png",
    "focal_point": [10, 20],
    "horizontal_scale": 1.0,
    "vertical_scale": 255.0,
    "polygon_count": 10000,
    "visibility_radius": 0.0,
    "max_triangles": 0,
    "map_details": {
        "terrain_type": "mountain",
        "water_level": 0.1,
        "vegetation_density": 0.5
    }
}"#;
    let mut session = EditSession::new(SchemaVersion::V2);
    session.load(legacy).unwrap();
    let config = session.config();
    assert_eq!(config.schema_version, SchemaVersion::V2);
    assert_eq!(config.focal_point, [10.0, 20.0]);
    assert_eq!(config.visibility_radius, Some(0.0));
    assert_eq!(
        config.map_details.as_ref().unwrap().terrain_type,
        TerrainType::Mountain
    );

    let json = session.to_json().unwrap();
    assert!(json.starts_with("{\n    \"schema_version\": 2,\n    \"heightfield_image\": \"hills.png\""));
}

#[test]
fn map_designer_session() {
    let mut session = EditSession::new(SchemaVersion::V3);
    let rejected = session.apply_all([
        Edit::TerrainType("desert".into()),
        Edit::BuildingCount(3),
        Edit::PointOfInterestCount(1),
        Edit::PointOfInterest {
            index: 0,
            point: PointOfInterest {
                name: "Oasis".into(),
                position: [40.0, 12.0],
                description: "Palm trees".into(),
            },
        },
        Edit::TerrainType("tundra".into()),
    ]);
    assert_eq!(rejected.len(), 1);
    assert!(matches!(rejected[0], ConfigError::ValidationError(_)));

    let features = session.config().features().unwrap();
    assert_eq!(features.buildings, vec![Building::default(); 3]);
    assert_eq!(features.points_of_interest[0].name, "Oasis");

    let payload = session.export().unwrap();
    assert_eq!(payload.file_name, "map_config.json");
    let reloaded = merge_defaults(load_config(&payload.bytes).unwrap(), SchemaVersion::V3);
    assert_eq!(&reloaded, session.config());
}

#[test]
fn resize_replaces_loaded_records() {
    let mut session = EditSession::new(SchemaVersion::V3);
    session
        .load(r#"{"map_details": {"buildings": [{"name": "A"}, {"name": "B"}, {"name": "C"}]}}"#)
        .unwrap();
    session.apply(Edit::BuildingCount(1)).unwrap();
    assert_eq!(
        session.config().features().unwrap().buildings,
        vec![Building::default()]
    );

    let grown = resize_list(Vec::new(), 2, PointOfInterest::default);
    assert_eq!(grown, vec![PointOfInterest::default(); 2]);
}

#[test]
fn failed_save_does_not_touch_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = EditSession::new(SchemaVersion::V1);
    session.apply(Edit::PolygonCount(123)).unwrap();
    let before = serialize(session.config()).unwrap();

    assert!(matches!(session.save(None), Err(ConfigError::MissingFileName)));
    // A regular file where the parent directory should be.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    assert!(session.save(Some(blocker.join("config.json").as_path())).is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    assert_eq!(serialize(session.config()).unwrap(), before);
}
