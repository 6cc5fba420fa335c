use crate::sample::FieldValue;
use serde::{Deserialize, Serialize};

/// One row of the body-weight harvest table: a tabulated weight and its
/// harvest percentage, either a bare number or an `"X%"` string, both in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestRow {
    #[serde(rename = "Pesos")]
    pub weight_g: FieldValue,
    #[serde(rename = "BWCosechas")]
    pub harvest_percentage: FieldValue,
}

/// A pond of a farm with its stocked area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PondRow {
    #[serde(rename = "Piscinas")]
    pub pond: FieldValue,
    #[serde(rename = "Hectareas")]
    pub hectares: FieldValue,
}

/// Processing yield by harvest weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldRow {
    #[serde(rename = "Gramos")]
    pub grams: FieldValue,
    #[serde(rename = "Rendimiento")]
    pub yield_percentage: FieldValue,
}
