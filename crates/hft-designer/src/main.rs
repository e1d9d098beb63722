//! The binary entry point for the HeightfieldTesselator designer.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use hft_config::{CliArgs, ConfigError, EditSession, Settings, default_settings_dir};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let settings_dir = args.config.clone().or_else(default_settings_dir);
    let (mut settings, origin) = load_settings(settings_dir.as_deref());
    settings.apply_cli_overrides(&args);

    hft_log::init_logging(
        settings.log_dir.as_deref(),
        cfg!(debug_assertions),
        Some(&settings),
    );
    origin.log();

    let stdout = io::stdout();
    let stderr = io::stderr();
    match run(&args, &settings, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Failed to write output: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Where the settings came from. Reported once logging is up.
#[derive(Debug)]
enum SettingsOrigin {
    Loaded(PathBuf),
    Created(PathBuf),
    Failed(ConfigError),
    NoConfigDir,
}

impl SettingsOrigin {
    fn log(&self) {
        match self {
            SettingsOrigin::Loaded(path) => log::info!("Loaded settings from {}", path.display()),
            SettingsOrigin::Created(path) => {
                log::info!("Created default settings at {}", path.display())
            }
            SettingsOrigin::Failed(e) => log::warn!("Using default settings: {e}"),
            SettingsOrigin::NoConfigDir => {
                log::warn!("No config directory found; using default settings")
            }
        }
    }
}

fn load_settings(dir: Option<&Path>) -> (Settings, SettingsOrigin) {
    let Some(dir) = dir else {
        return (Settings::default(), SettingsOrigin::NoConfigDir);
    };
    let path = Settings::file_in(dir);
    let existed = path.exists();
    match Settings::load_or_create(dir) {
        Ok(settings) if existed => (settings, SettingsOrigin::Loaded(path)),
        Ok(settings) => (settings, SettingsOrigin::Created(path)),
        Err(e) => (Settings::default(), SettingsOrigin::Failed(e)),
    }
}

/// One edit pass: load, edit, display, then save and export on request.
///
/// Returns `Ok(false)` when a requested load, save or export failed. Such
/// failures are reported on `err` and never abort the pass.
fn run(
    args: &CliArgs,
    settings: &Settings,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    let mut ok = true;
    let mut session = EditSession::new(args.schema.unwrap_or(settings.default_schema));

    if let Some(ref path) = args.load {
        match session.load_file(path) {
            Ok(()) => writeln!(out, "Configuration loaded successfully!")?,
            Err(e) => {
                writeln!(err, "Could not load {}: {e}", path.display())?;
                ok = false;
            }
        }
    }

    for rejected in session.apply_all(args.edits()) {
        writeln!(err, "Edit rejected: {rejected}")?;
    }

    writeln!(out, "{}", session.title())?;
    writeln!(out)?;
    writeln!(out, "Current Configuration")?;
    match session.to_json() {
        Ok(json) => writeln!(out, "{json}")?,
        Err(e) => {
            writeln!(err, "{e}")?;
            ok = false;
        }
    }

    if let Some(ref save) = args.save {
        match session.save(Some(Path::new(save))) {
            Ok(path) => writeln!(out, "Configuration saved to {}", path.display())?,
            Err(ConfigError::MissingFileName) => {
                writeln!(err, "Please provide a file name to save.")?;
                ok = false;
            }
            Err(e) => {
                writeln!(err, "{e}")?;
                ok = false;
            }
        }
    }

    if args.export {
        match session
            .export()
            .and_then(|payload| payload.write_to_dir(&settings.export_dir))
        {
            Ok(path) => writeln!(out, "Exported {}", path.display())?,
            Err(e) => {
                writeln!(err, "{e}")?;
                ok = false;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", session.preview_notice())?;
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(argv: &[&str], settings: &Settings) -> (bool, String, String) {
        let args = CliArgs::try_parse_from(std::iter::once("hft-designer").chain(argv.iter().copied()))
            .unwrap();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = run(&args, settings, &mut out, &mut err).unwrap();
        (
            ok,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_defaults_printed() {
        let (ok, out, err) = run_with(&["--schema", "1"], &Settings::default());
        assert!(ok);
        assert!(err.is_empty());
        assert!(out.starts_with("HeightfieldTesselator Configuration\n"));
        assert!(out.contains("    \"polygon_count\": 10000,"));
        assert!(out.contains("Preview rendering not available"));
    }

    #[test]
    fn test_edit_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.json");
        let path_str = path.to_str().unwrap();

        let (ok, out, _) = run_with(
            &["--schema", "2", "--horizontal-scale", "2.5", "--save", path_str],
            &Settings::default(),
        );
        assert!(ok);
        assert!(out.contains("Configuration saved to"));

        let (ok, out, _) = run_with(&["--schema", "2", "--load", path_str], &Settings::default());
        assert!(ok);
        assert!(out.contains("Configuration loaded successfully!"));
        assert!(out.contains("\"horizontal_scale\": 2.5"));
    }

    #[test]
    fn test_bare_save_reports_missing_name() {
        let (ok, _, err) = run_with(&["--save"], &Settings::default());
        assert!(!ok);
        assert!(err.contains("Please provide a file name to save."));
    }

    #[test]
    fn test_bad_load_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"polygon_count\": ").unwrap();

        let (ok, out, err) = run_with(
            &["--schema", "1", "--load", path.to_str().unwrap()],
            &Settings::default(),
        );
        assert!(!ok);
        assert!(err.contains("failed to parse config"));
        assert!(out.contains("\"polygon_count\": 10000"));
    }

    #[test]
    fn test_rejected_terrain_type_is_reported() {
        let (ok, out, err) = run_with(
            &["--schema", "2", "--terrain-type", "swamp"],
            &Settings::default(),
        );
        assert!(ok);
        assert!(err.contains("invalid terrain_type \"swamp\""));
        assert!(out.contains("\"terrain_type\": \"plain\""));
    }

    #[test]
    fn test_export_into_settings_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            export_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        let (ok, out, _) = run_with(&["--buildings", "2", "--export"], &settings);
        assert!(ok);
        assert!(out.contains("map_config.json"));
        assert!(out.contains("HeightfieldTesselator and Map Designer"));

        let exported = std::fs::read_to_string(dir.path().join("map_config.json")).unwrap();
        assert!(exported.contains("\"height\": 10.0"));
    }

    #[test]
    fn test_record_flags_edit_exported_lists() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            export_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        let (ok, _, err) = run_with(
            &[
                "--buildings",
                "1",
                "--building",
                "0:Tower:5:5:80",
                "--points-of-interest",
                "1",
                "--poi",
                "0:Oasis:40:12:Palm trees",
                "--export",
            ],
            &settings,
        );
        assert!(ok);
        assert!(err.is_empty());

        let exported = std::fs::read_to_string(dir.path().join("map_config.json")).unwrap();
        assert!(exported.contains("\"name\": \"Tower\""));
        assert!(exported.contains("\"height\": 80.0"));
        assert!(exported.contains("\"description\": \"Palm trees\""));
    }

    #[test]
    fn test_record_flag_past_list_end_is_rejected() {
        let (ok, _, err) = run_with(&["--building", "2:Tower:5:5:80"], &Settings::default());
        assert!(ok);
        assert!(err.contains("buildings index 2 out of range (len 0)"));
    }

    #[test]
    fn test_non_finite_flag_is_rejected() {
        let (ok, out, err) = run_with(
            &["--schema", "1", "--visibility-radius", "NaN", "--horizontal-scale", "inf"],
            &Settings::default(),
        );
        assert!(ok);
        assert!(err.contains("visibility_radius must be a finite number"));
        assert!(err.contains("horizontal_scale must be a finite number"));
        assert!(out.contains("\"visibility_radius\": null"));
        assert!(out.contains("\"horizontal_scale\": 1.0"));
    }

    #[test]
    fn test_v1_form_over_map_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        std::fs::write(&path, r#"{"map_details": {"buildings": []}}"#).unwrap();
        let settings = Settings {
            export_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };

        let (ok, out, _) = run_with(
            &["--schema", "1", "--load", path.to_str().unwrap(), "--export"],
            &settings,
        );
        assert!(ok);
        assert!(out.starts_with("HeightfieldTesselator Configuration\n"));
        assert!(out.contains("heightfield_config.json"));
        assert!(out.contains("Preview rendering not available"));
    }

    #[test]
    fn test_settings_origin() {
        let dir = tempfile::tempdir().unwrap();

        let (settings, origin) = load_settings(Some(dir.path()));
        assert_eq!(settings, Settings::default());
        assert!(matches!(origin, SettingsOrigin::Created(ref p) if p == &Settings::file_in(dir.path())));

        let (_, origin) = load_settings(Some(dir.path()));
        assert!(matches!(origin, SettingsOrigin::Loaded(_)));

        std::fs::write(Settings::file_in(dir.path()), "{{not valid}}").unwrap();
        let (settings, origin) = load_settings(Some(dir.path()));
        assert_eq!(settings, Settings::default());
        assert!(matches!(origin, SettingsOrigin::Failed(ConfigError::SettingsParseError(_))));

        assert!(matches!(load_settings(None).1, SettingsOrigin::NoConfigDir));
    }
}
