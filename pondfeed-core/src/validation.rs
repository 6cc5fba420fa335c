//! Plausibility checks reported alongside every successful result.

use crate::{
    pipeline::steps::parse_date,
    store::{Key, ValueStore},
};
use pondfeed_schemas::record::{
    ConsistencyCheck, DataValidations, DateValidity, DensityConsistency, GrowthRangeCheck, GrowthRanges,
    RangeCheck,
};
use std::collections::BTreeMap;

/// Cycles longer than this many days are flagged.
pub const MAX_CYCLE_DAYS: i64 = 200;
pub const DENSITY_CONSISTENCY_PCT: f64 = 20.0;

pub fn validate(store: &ValueStore) -> DataValidations {
    DataValidations {
        dates: validate_dates(store),
        numeric_values: validate_numeric_values(store),
        ranges: validate_ranges(store),
        consistency: validate_consistency(store),
    }
}

fn validate_dates(store: &ValueStore) -> DateValidity {
    let invalid = |error: &str| DateValidity {
        valid: false,
        cultivation_days: None,
        error: Some(error.to_string()),
        warning: None,
    };

    let seeding = store.text(Key::SeedingDate).unwrap_or_default();
    let sampling = store.text(Key::SamplingDate).unwrap_or_default();
    if seeding.is_empty() || sampling.is_empty() {
        return invalid("Fechas faltantes");
    }

    let (Some(seeding), Some(sampling)) = (parse_date(&seeding), parse_date(&sampling)) else {
        return invalid("Error en fechas: formato esperado dd/mm/aaaa");
    };
    if sampling < seeding {
        return invalid("Fecha muestreo anterior a siembra");
    }

    let days = (sampling - seeding).num_days();
    if days > MAX_CYCLE_DAYS {
        return DateValidity {
            valid: false,
            cultivation_days: None,
            error: None,
            warning: Some("Ciclo excesivamente largo".to_string()),
        };
    }

    DateValidity {
        valid: true,
        cultivation_days: Some(days + 1),
        error: None,
        warning: None,
    }
}

fn range_check(value: f64, min: f64, max: f64, expected: &str) -> RangeCheck {
    RangeCheck {
        value,
        valid: (min..=max).contains(&value),
        expected_range: expected.to_string(),
    }
}

fn validate_numeric_values(store: &ValueStore) -> BTreeMap<String, RangeCheck> {
    BTreeMap::from([
        (
            "peso_actual".to_string(),
            range_check(store.number(Key::CurrentWeight), 0.1, 100.0, "0.1-100 gramos"),
        ),
        (
            "densidad".to_string(),
            range_check(store.number(Key::BiologistDensity), 1.0, 50.0, "1-50 ind/m²"),
        ),
        (
            "fca".to_string(),
            range_check(store.number(Key::FcaField), 0.5, 3.0, "0.5-3.0"),
        ),
    ])
}

fn validate_ranges(store: &ValueStore) -> GrowthRanges {
    let growth = store.number(Key::GrowthRate);
    GrowthRanges {
        growth: GrowthRangeCheck {
            value: growth,
            optimal: (0.8..=1.5).contains(&growth),
            acceptable: (0.5..=2.0).contains(&growth),
            optimal_range: "0.8-1.5 g/día".to_string(),
        },
    }
}

fn validate_consistency(store: &ValueStore) -> DensityConsistency {
    let biologist = store.number(Key::BiologistDensity);
    let consumption = store.number(Key::ConsumptionDensity);
    if biologist <= 0.0 || consumption <= 0.0 {
        return DensityConsistency::default();
    }

    let percent = (biologist - consumption).abs() / biologist * 100.0;
    DensityConsistency {
        densities: Some(ConsistencyCheck {
            percent,
            consistent: percent <= DENSITY_CONSISTENCY_PCT,
            limit: format!("{DENSITY_CONSISTENCY_PCT}%"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Entry;
    use pondfeed_schemas::sample::FieldValue;

    fn create_test_store(seeding: &str, sampling: &str) -> ValueStore {
        let mut store = ValueStore::new();
        store.set(Key::SeedingDate, Entry::Input(FieldValue::from(seeding)));
        store.set(Key::SamplingDate, Entry::Input(FieldValue::from(sampling)));
        store
    }

    #[test]
    fn date_validity_cases() {
        let ok = validate_dates(&create_test_store("10/10/2024", "10/12/2024"));
        assert!(ok.valid);
        assert_eq!(ok.cultivation_days, Some(62));

        let inverted = validate_dates(&create_test_store("10/12/2024", "10/10/2024"));
        assert_eq!(inverted.error.as_deref(), Some("Fecha muestreo anterior a siembra"));

        let long = validate_dates(&create_test_store("01/01/2024", "01/09/2024"));
        assert!(!long.valid);
        assert_eq!(long.warning.as_deref(), Some("Ciclo excesivamente largo"));

        let missing = validate_dates(&ValueStore::new());
        assert_eq!(missing.error.as_deref(), Some("Fechas faltantes"));
    }

    #[test]
    fn numeric_and_growth_ranges() {
        let mut store = ValueStore::new();
        store.set(Key::CurrentWeight, Entry::Input(FieldValue::Number(30.0)));
        store.set(Key::BiologistDensity, Entry::Input(FieldValue::Number(60.0)));
        store.set(Key::GrowthRate, Entry::Input(FieldValue::Number(0.6)));

        let values = validate_numeric_values(&store);
        assert!(values["peso_actual"].valid);
        assert!(!values["densidad"].valid);
        assert!(!values["fca"].valid);

        let ranges = validate_ranges(&store);
        assert!(!ranges.growth.optimal);
        assert!(ranges.growth.acceptable);
    }

    #[test]
    fn density_consistency_needs_both_estimates() {
        let mut store = ValueStore::new();
        store.set(Key::BiologistDensity, Entry::Input(FieldValue::Number(11.0)));
        assert!(validate_consistency(&store).densities.is_none());

        store.set(Key::ConsumptionDensity, Entry::Input(FieldValue::Number(10.15)));
        let check = validate_consistency(&store).densities.unwrap();
        assert!(check.consistent);
        assert_eq!(check.limit, "20%");
    }
}
