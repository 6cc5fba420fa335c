//! The per-run value store. Inputs and every derived value live here, keyed by
//! the identifiers the field client and the spreadsheet share.

use crate::{error::StepError, normalize};
use pondfeed_schemas::sample::{FieldValue, Sample};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Hectares,
    Pond,
    SeedingDate,
    SamplingDate,
    AgeDays,
    PreviousWeight,
    CurrentWeight,
    BiologistDensity,
    CumulativeFeedLbs,
    FeederCount,
    MechanicalAerators,
    FeedKg,
    SeedWeight,
    CastNetDensity,
    WeightIncrement,
    GrowthRate,
    ProjectedWeight,
    ExpectedGrowth,
    ConsumptionDensity,
    KgPer100k,
    FeedSacks,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    WeeklyAverage,
    WeeklyCumulative,
    DieselAerators,
    AerationCapacity,
    LbsHaField,
    LbsHaConsumption,
    TotalLbsField,
    TotalLbsConsumption,
    TrayLbsField,
    TrayLbsConsumption,
    HpPerHectare,
    FcaField,
    FcaConsumption,
    YieldLbsPerSack,
    RecommendedLbs,
    DensityDifference,
    LbsPerAerator,
}

impl Key {
    /// Weekday keys, Monday first.
    pub const WEEK: [Key; 7] = [
        Key::Monday,
        Key::Tuesday,
        Key::Wednesday,
        Key::Thursday,
        Key::Friday,
        Key::Saturday,
        Key::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Hectares => "hectareas",
            Key::Pond => "piscinas",
            Key::SeedingDate => "fecha_siembra",
            Key::SamplingDate => "fecha_muestreo",
            Key::AgeDays => "edad_cultivo",
            Key::PreviousWeight => "peso_anterior",
            Key::CurrentWeight => "peso_actual_gdia",
            Key::BiologistDensity => "densidad_biologo_indm2",
            Key::CumulativeFeedLbs => "acumulado_actual_lbs",
            Key::FeederCount => "numero_aa",
            Key::MechanicalAerators => "h_aireadores_mecanicos",
            Key::FeedKg => "alimento_actual_kg",
            Key::SeedWeight => "peso_siembra",
            Key::CastNetDensity => "densidad_atarraya",
            Key::WeightIncrement => "incremento_gr",
            Key::GrowthRate => "crecim_actual_gdia",
            Key::ProjectedWeight => "peso_proyectado_gdia",
            Key::ExpectedGrowth => "crecimiento_esperado_sem",
            Key::ConsumptionDensity => "densidad_consumo_im2",
            Key::KgPer100k => "kg_100mil",
            Key::FeedSacks => "sacos_actuales",
            Key::Monday => "lunes_dia1",
            Key::Tuesday => "martes_dia2",
            Key::Wednesday => "miercoles_dia3",
            Key::Thursday => "jueves_dia4",
            Key::Friday => "viernes_dia5",
            Key::Saturday => "sabado_dia6",
            Key::Sunday => "domingo_dia7",
            Key::WeeklyAverage => "recomendation_semana",
            Key::WeeklyCumulative => "acumulado_semanal",
            Key::DieselAerators => "aireadores_diesel",
            Key::AerationCapacity => "capacidad_carga_aireaccion",
            Key::LbsHaField => "lbs_ha_actual_campo",
            Key::LbsHaConsumption => "lbs_ha_consumo",
            Key::TotalLbsField => "libras_totales_campo",
            Key::TotalLbsConsumption => "libras_totales_consumo",
            Key::TrayLbsField => "lbs_tolva_actual_campo",
            Key::TrayLbsConsumption => "lbs_tolva_segun_consumo",
            Key::HpPerHectare => "hp_ha",
            Key::FcaField => "fca_campo",
            Key::FcaConsumption => "fca_consumo",
            Key::YieldLbsPerSack => "rendimiento_lbs_saco",
            Key::RecommendedLbs => "recomendacion_lbs_ha",
            Key::DensityDifference => "diferencia_campo_biologo",
            Key::LbsPerAerator => "libras_totales_por_aireador",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a derived number is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Two decimals: `1075.00`.
    Fixed2,
    /// Two decimals with thousands grouping: `56,628.00`.
    Grouped2,
    /// Whole number: `675`.
    Integer,
}

/// A derived number together with its display format. The value is held at
/// display precision so later steps read exactly what is shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    value: f64,
    format: Format,
}

impl Quantity {
    pub fn new(value: f64, format: Format) -> Self {
        let value = match format {
            Format::Fixed2 | Format::Grouped2 => quantize_2dp(value),
            Format::Integer => value.round(),
        };
        Self { value, format }
    }

    pub fn fixed(value: f64) -> Self {
        Self::new(value, Format::Fixed2)
    }

    pub fn grouped(value: f64) -> Self {
        Self::new(value, Format::Grouped2)
    }

    pub fn integer(value: f64) -> Self {
        Self::new(value, Format::Integer)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn render(&self) -> String {
        match self.format {
            Format::Fixed2 => format!("{:.2}", self.value),
            Format::Grouped2 => format_grouped(self.value),
            Format::Integer => format!("{}", self.value as i64),
        }
    }
}

fn quantize_2dp(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// `1234567.891` renders as `1,234,567.89`.
pub fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Seeded from the sample, kept as received.
    Input(FieldValue),
    Number(Quantity),
    Failed(StepError),
}

impl Entry {
    pub fn render(&self) -> String {
        match self {
            Entry::Input(FieldValue::Number(n)) => n.to_string(),
            Entry::Input(FieldValue::Text(text)) => text.clone(),
            Entry::Number(quantity) => quantity.render(),
            Entry::Failed(err) => err.sentinel().to_string(),
        }
    }
}

/// Defaults applied when the sample omits them.
pub const DEFAULT_SEED_WEIGHT_G: f64 = 1.0;
pub const DEFAULT_CAST_NET_DENSITY: f64 = 10.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    entries: BTreeMap<Key, Entry>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store with every field the sample provides.
    pub fn from_sample(sample: &Sample) -> Self {
        let mut store = Self::new();
        let aux = &sample.auxiliary;

        let inputs: [(Key, Option<&FieldValue>); 11] = [
            (Key::Hectares, sample.hectares.as_ref()),
            (Key::Pond, sample.pond.as_ref()),
            (Key::PreviousWeight, sample.previous_weight_g.as_ref()),
            (Key::CurrentWeight, sample.current_weight_g.as_ref()),
            (Key::BiologistDensity, sample.biologist_density.as_ref()),
            (Key::CumulativeFeedLbs, sample.cumulative_feed_lbs.as_ref()),
            (Key::FeederCount, sample.feeder_count.as_ref()),
            (Key::MechanicalAerators, sample.mechanical_aerators.as_ref()),
            (Key::FeedKg, sample.feed_kg.as_ref()),
            (Key::SeedWeight, aux.seed_weight_g.as_ref()),
            (Key::CastNetDensity, aux.cast_net_density.as_ref()),
        ];
        for (key, value) in inputs {
            if let Some(value) = value {
                store.set(key, Entry::Input(value.clone()));
            }
        }

        if let Some(date) = &sample.seeding_date {
            store.set(Key::SeedingDate, Entry::Input(FieldValue::Text(date.clone())));
        }
        if let Some(date) = &sample.sampling_date {
            store.set(Key::SamplingDate, Entry::Input(FieldValue::Text(date.clone())));
        }

        // A zero age means "not supplied" and is recomputed from the dates.
        if let Some(age) = &sample.age_days {
            if normalize::normalize(Some(age)) > 0.0 {
                store.set(Key::AgeDays, Entry::Input(age.clone()));
            }
        }

        if !store.contains(Key::SeedWeight) {
            store.set(Key::SeedWeight, Entry::Input(FieldValue::Number(DEFAULT_SEED_WEIGHT_G)));
        }
        if !store.contains(Key::CastNetDensity) {
            store.set(Key::CastNetDensity, Entry::Input(FieldValue::Number(DEFAULT_CAST_NET_DENSITY)));
        }

        store
    }

    pub fn set(&mut self, key: Key, entry: Entry) {
        self.entries.insert(key, entry);
    }

    pub fn set_number(&mut self, key: Key, quantity: Quantity) {
        self.set(key, Entry::Number(quantity));
    }

    pub fn contains(&self, key: Key) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn entry(&self, key: Key) -> Option<&Entry> {
        self.entries.get(&key)
    }

    /// Rendered value, or an empty string when the key is absent.
    pub fn get(&self, key: Key) -> String {
        self.entries.get(&key).map(Entry::render).unwrap_or_default()
    }

    /// Numeric reading of a key. Absent keys and failed steps read as 0.0.
    pub fn number(&self, key: Key) -> f64 {
        match self.entries.get(&key) {
            Some(Entry::Input(value)) => normalize::normalize(Some(value)),
            Some(Entry::Number(quantity)) => quantity.value(),
            Some(Entry::Failed(_)) | None => 0.0,
        }
    }

    /// The raw text of a key, for fields that are not numbers (dates).
    pub fn text(&self, key: Key) -> Option<String> {
        match self.entries.get(&key)? {
            Entry::Input(FieldValue::Text(text)) => Some(text.trim().to_string()),
            other => Some(other.render()),
        }
    }

    /// The step failure recorded under `key`, if any.
    pub fn failure(&self, key: Key) -> Option<StepError> {
        match self.entries.get(&key) {
            Some(Entry::Failed(err)) => Some(*err),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, &Entry)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
