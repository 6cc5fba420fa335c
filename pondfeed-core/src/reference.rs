use crate::{error::StepError, fallback, normalize};
use pondfeed_schemas::{
    file_formats::{HarvestTableFile, TerrainFile, YieldTableFile},
    reference::{HarvestRow, PondRow, YieldRow},
    sample::FieldValue,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Weight to harvest fraction, searched by floor match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    rows: Vec<(f64, f64)>,
}

impl ReferenceTable {
    pub fn from_rows(rows: &[HarvestRow]) -> Self {
        let rows = rows
            .iter()
            .map(|row| (normalize::normalize(Some(&row.weight_g)), harvest_fraction(&row.harvest_percentage)))
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the harvest fraction of the row with the greatest weight not
    /// exceeding `weight`. On duplicate weights the first row wins.
    pub fn lookup(&self, weight: f64) -> Result<f64, StepError> {
        if self.rows.is_empty() {
            return Err(StepError::NoReferenceData);
        }

        let mut best: Option<(f64, f64)> = None;
        for &(row_weight, fraction) in &self.rows {
            if row_weight <= weight && best.map_or(true, |(w, _)| row_weight > w) {
                best = Some((row_weight, fraction));
            }
        }

        match best {
            Some((_, fraction)) => Ok(fraction),
            None => {
                debug!(weight, "no harvest row at or below weight");
                Err(StepError::LookupMiss)
            }
        }
    }
}

/// Harvest values are percentages with or without a `%` sign.
fn harvest_fraction(value: &FieldValue) -> f64 {
    normalize::normalize(Some(value)) / 100.0
}

/// Pond areas per farm.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Terrain {
    farms: BTreeMap<String, Vec<(String, f64)>>,
    default_farm: Option<String>,
}

impl Terrain {
    pub fn from_rows<I>(farms: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<PondRow>)>,
    {
        let farms = farms
            .into_iter()
            .map(|(farm, rows)| {
                let ponds = rows
                    .iter()
                    .map(|row| (pond_key(&row.pond), normalize::normalize(Some(&row.hectares))))
                    .collect();
                (farm.to_uppercase(), ponds)
            })
            .collect();
        Self { farms, default_farm: None }
    }

    /// Farm whose ponds stand in for farms the terrain does not list.
    pub fn with_default_farm(mut self, farm: &str) -> Self {
        self.default_farm = Some(farm.to_uppercase());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.farms.values().all(Vec::is_empty)
    }

    pub fn farm_count(&self) -> usize {
        self.farms.len()
    }

    pub fn ponds(&self, farm: &str) -> &[(String, f64)] {
        self.farms
            .get(&farm.to_uppercase())
            .or_else(|| self.default_farm.as_ref().and_then(|d| self.farms.get(d)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Stocked area of `pond` on `farm`, matched exactly on the pond id.
    pub fn hectares(&self, farm: &str, pond: &FieldValue) -> Option<f64> {
        let key = pond_key(pond);
        self.ponds(farm)
            .iter()
            .find(|(id, _)| *id == key)
            .map(|(_, hectares)| *hectares)
    }
}

/// Canonical pond id: integral numbers lose their fractional part so `5`,
/// `5.0` and `"5"` compare equal.
pub fn pond_key(pond: &FieldValue) -> String {
    match pond {
        FieldValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Text(text) => text.trim().to_string(),
    }
}

/// Processing yield percentage by harvest weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YieldTable {
    rows: Vec<(f64, f64)>,
}

impl YieldTable {
    pub fn from_rows(rows: &[YieldRow]) -> Self {
        let mut rows: Vec<(f64, f64)> = rows
            .iter()
            .map(|row| {
                (
                    normalize::normalize(Some(&row.grams)),
                    normalize::normalize(Some(&row.yield_percentage)),
                )
            })
            .collect();
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Yield for the closest tabulated weight; ties go to the smaller weight.
    pub fn nearest(&self, grams: f64) -> Option<f64> {
        let mut best: Option<(f64, f64)> = None;
        for &(weight, pct) in &self.rows {
            let distance = (weight - grams).abs();
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, pct));
            }
        }
        best.map(|(_, pct)| pct)
    }
}

/// Every static table the pipeline consults, loaded once and shared read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub harvest: ReferenceTable,
    pub terrain: Terrain,
    pub yields: YieldTable,
}

impl ReferenceData {
    /// The built-in example dataset.
    pub fn fallback() -> Self {
        Self {
            harvest: ReferenceTable::from_rows(&fallback::harvest_rows()),
            terrain: Terrain::from_rows(fallback::terrain_rows()).with_default_farm(fallback::DEFAULT_FARM),
            yields: YieldTable::from_rows(&fallback::yield_rows()),
        }
    }

    /// Builds from loaded files. Any table that is missing or empty is
    /// replaced by its built-in example counterpart.
    pub fn from_files(
        harvest: Option<HarvestTableFile>,
        terrain: Option<TerrainFile>,
        yields: Option<YieldTableFile>,
    ) -> Self {
        let harvest_rows = match harvest {
            Some(file) if !file.rows.is_empty() => file.rows,
            _ => {
                warn!("harvest table unavailable, using built-in example rows");
                fallback::harvest_rows()
            }
        };

        let terrain = match terrain {
            Some(file) if !file.farms.is_empty() => Terrain::from_rows(
                file.farms.into_iter().map(|(farm, ponds)| (farm, ponds.into_rows())),
            ),
            _ => {
                warn!("terrain data unavailable, using built-in example farms");
                Terrain::from_rows(fallback::terrain_rows())
            }
        }
        .with_default_farm(fallback::DEFAULT_FARM);

        let yield_rows = match yields {
            Some(file) if !file.rows.is_empty() => file.rows,
            _ => {
                warn!("yield table unavailable, using built-in example rows");
                fallback::yield_rows()
            }
        };

        Self {
            harvest: ReferenceTable::from_rows(&harvest_rows),
            terrain,
            yields: YieldTable::from_rows(&yield_rows),
        }
    }
}
