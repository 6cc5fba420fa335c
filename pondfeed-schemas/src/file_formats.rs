use crate::{
    options::CalculationOptions,
    reference::{HarvestRow, PondRow, YieldRow},
    thresholds::Thresholds,
};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
pub struct HarvestTableFile {
    #[serde(default)]
    pub rows: Vec<HarvestRow>,
}

/// Farm name to its pond list.
#[derive(Debug, Default, Deserialize)]
pub struct TerrainFile {
    #[serde(flatten)]
    pub farms: BTreeMap<String, FarmPonds>,
}

/// A farm's ponds, stored either bare or wrapped in `rows`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FarmPonds {
    Wrapped { rows: Vec<PondRow> },
    Bare(Vec<PondRow>),
}

impl FarmPonds {
    pub fn into_rows(self) -> Vec<PondRow> {
        match self {
            FarmPonds::Wrapped { rows } => rows,
            FarmPonds::Bare(rows) => rows,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct YieldTableFile {
    #[serde(default)]
    pub rows: Vec<YieldRow>,
}

/// Settings override document: `{"thresholds": {...}, "calculation": {...}}`.
/// Either section may be partial or absent.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub calculation: CalculationOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::FieldValue;

    #[test]
    fn terrain_accepts_wrapped_and_bare_farms() {
        let json = r#"{
            "CAMANOVILLO": {"rows": [{"Piscinas": "1", "Hectareas": "8.3"}]},
            "GROVITAL": [{"Piscinas": 2, "Hectareas": 2.6}]
        }"#;
        let terrain: TerrainFile = serde_json::from_str(json).unwrap();
        assert_eq!(terrain.farms.len(), 2);

        let camanovillo = terrain.farms["CAMANOVILLO"].clone().into_rows();
        assert_eq!(camanovillo[0].hectares, FieldValue::Text("8.3".into()));

        let grovital = terrain.farms["GROVITAL"].clone().into_rows();
        assert_eq!(grovital[0].pond, FieldValue::Number(2.0));
    }

    #[test]
    fn harvest_rows_keep_mixed_encodings() {
        let json = r#"{"rows": [
            {"BWCosechas": "9.15414480282437%", "Pesos": "0.10"},
            {"BWCosechas": 8.97526907090715, "Pesos": 0.2}
        ]}"#;
        let table: HarvestTableFile = serde_json::from_str(json).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].harvest_percentage, FieldValue::Number(8.97526907090715));
    }
}
