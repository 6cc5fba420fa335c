//! Loading of reference tables and settings documents from disk.
//!
//! Documents may be JSON or YAML; the format is chosen by file extension
//! (`.json`, otherwise YAML).

use crate::{error::PondfeedError, reference::ReferenceData};
use pondfeed_schemas::file_formats::{HarvestTableFile, SettingsFile, TerrainFile, YieldTableFile};
use serde::de::DeserializeOwned;
use std::{fs, path::Path};
use tracing::{debug, info};

pub const HARVEST_TABLE_STEM: &str = "harvest_table";
pub const TERRAIN_STEM: &str = "terrain";
pub const YIELD_TABLE_STEM: &str = "yield_table";

const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, PondfeedError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| PondfeedError::FileIO(display.clone(), e))?;

    if path.extension().map_or(false, |ext| ext == "json") {
        Ok(serde_json::from_str(&content)?)
    } else {
        serde_yaml::from_str(&content).map_err(|e| PondfeedError::YamlParsing(display, e))
    }
}

/// Loads the first `<stem>.{json,yaml,yml}` found in `dir`, if any.
fn load_optional<T: DeserializeOwned>(dir: &Path, stem: &str) -> Result<Option<T>, PondfeedError> {
    for ext in EXTENSIONS {
        let path = dir.join(format!("{stem}.{ext}"));
        if path.is_file() {
            debug!(path = %path.display(), "loading reference document");
            return load_document(&path).map(Some);
        }
    }
    Ok(None)
}

/// Loads the reference tables from `dir`. Missing files fall back to the
/// built-in example rows; malformed files are an error.
pub fn load_reference_dir(dir: &Path) -> Result<ReferenceData, PondfeedError> {
    if !dir.is_dir() {
        return Err(PondfeedError::ConfigError(format!(
            "reference directory '{}' does not exist",
            dir.display()
        )));
    }

    let harvest: Option<HarvestTableFile> = load_optional(dir, HARVEST_TABLE_STEM)?;
    let terrain: Option<TerrainFile> = load_optional(dir, TERRAIN_STEM)?;
    let yields: Option<YieldTableFile> = load_optional(dir, YIELD_TABLE_STEM)?;

    let data = ReferenceData::from_files(harvest, terrain, yields);
    info!(
        dir = %dir.display(),
        harvest_rows = data.harvest.len(),
        farms = data.terrain.farm_count(),
        "reference data loaded"
    );
    Ok(data)
}

pub fn load_settings(path: &Path) -> Result<SettingsFile, PondfeedError> {
    let settings: SettingsFile = load_document(path)?;
    info!(path = %path.display(), "settings loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn settings_override_only_named_values() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "settings.yaml",
            "thresholds:\n  growth_rate:\n    low: 0.6\ncalculation:\n  sack_weight_kg: 40\n",
        );

        let settings = load_settings(&dir.path().join("settings.yaml")).unwrap();
        assert_relative_eq!(settings.thresholds.growth_rate.low, 0.6);
        assert_relative_eq!(settings.thresholds.growth_rate.high, 1.5);
        assert_relative_eq!(settings.calculation.sack_weight_kg, 40.0);
        assert_relative_eq!(settings.calculation.density_calibration_divisor, 100.0);
    }

    #[test]
    fn json_is_chosen_by_extension() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "settings.json", r#"{"thresholds": {"fca": {"optimal_max": 1.4}}}"#);

        let settings = load_settings(&dir.path().join("settings.json")).unwrap();
        assert_relative_eq!(settings.thresholds.fca.optimal_max, 1.4);
        assert_relative_eq!(settings.thresholds.fca.optimal_min, 0.8);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        match load_settings(&path) {
            Err(PondfeedError::FileIO(p, _)) => assert!(p.ends_with("absent.yaml")),
            other => panic!("expected FileIO error, got {other:?}"),
        }
    }

    #[test]
    fn empty_directory_uses_built_in_tables() {
        let dir = tempdir().unwrap();
        let data = load_reference_dir(dir.path()).unwrap();
        assert_eq!(data, ReferenceData::fallback());
    }

    #[test]
    fn files_present_replace_only_their_table() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "harvest_table.json",
            r#"{"rows": [{"Pesos": 10, "BWCosechas": "5%"}, {"Pesos": 20, "BWCosechas": "3%"}]}"#,
        );
        write_file(dir.path(), "terrain.yaml", "NUEVA:\n  - Piscinas: 1\n    Hectareas: 4.5\n");

        let data = load_reference_dir(dir.path()).unwrap();
        assert_eq!(data.harvest.len(), 2);
        assert_relative_eq!(data.harvest.lookup(12.0).unwrap(), 0.05);
        assert_eq!(data.terrain.farm_count(), 1);
        assert_eq!(data.yields, ReferenceData::fallback().yields);
    }

    #[test]
    fn malformed_table_is_an_error() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "yield_table.yaml", "rows: [unclosed");
        assert!(matches!(
            load_reference_dir(dir.path()),
            Err(PondfeedError::YamlParsing(_, _))
        ));
    }

    #[test]
    fn missing_directory_is_a_config_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_reference_dir(&dir.path().join("nope")),
            Err(PondfeedError::ConfigError(_))
        ));
    }
}
