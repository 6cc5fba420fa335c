use serde::{Deserialize, Serialize};

/// Constants of the feeding calculation. Defaults reproduce the farm
/// spreadsheet; any field can be overridden from a settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOptions {
    /// Divides the raw consumption density.
    #[serde(default = "default_density_calibration_divisor")]
    pub density_calibration_divisor: f64,
    #[serde(default = "default_sack_weight_kg")]
    pub sack_weight_kg: f64,
    /// Daily rations are rounded to multiples of this many kg.
    #[serde(default = "default_feed_rounding_step")]
    pub feed_rounding_step: f64,
    #[serde(default = "default_aerator_hp")]
    pub aerator_hp: f64,
    #[serde(default = "default_maintenance_factor")]
    pub maintenance_factor: f64,
    /// Mechanical aerators per diesel-equivalent unit.
    #[serde(default = "default_diesel_factor")]
    pub diesel_factor: f64,
    #[serde(default = "default_capacity_per_diesel_aerator")]
    pub capacity_per_diesel_aerator_lbs: f64,
    #[serde(default = "default_base_capacity_per_ha")]
    pub base_capacity_per_ha_lbs: f64,
    #[serde(default = "default_recommended_capacity_per_ha")]
    pub recommended_capacity_per_ha_lbs: f64,
    #[serde(default = "default_lbs_per_ha_factor")]
    pub lbs_per_ha_factor: f64,
    #[serde(default = "default_lbs_to_kg")]
    pub lbs_to_kg: f64,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            density_calibration_divisor: default_density_calibration_divisor(),
            sack_weight_kg: default_sack_weight_kg(),
            feed_rounding_step: default_feed_rounding_step(),
            aerator_hp: default_aerator_hp(),
            maintenance_factor: default_maintenance_factor(),
            diesel_factor: default_diesel_factor(),
            capacity_per_diesel_aerator_lbs: default_capacity_per_diesel_aerator(),
            base_capacity_per_ha_lbs: default_base_capacity_per_ha(),
            recommended_capacity_per_ha_lbs: default_recommended_capacity_per_ha(),
            lbs_per_ha_factor: default_lbs_per_ha_factor(),
            lbs_to_kg: default_lbs_to_kg(),
        }
    }
}

fn default_density_calibration_divisor() -> f64 {
    100.0
}
fn default_sack_weight_kg() -> f64 {
    25.0
}
fn default_feed_rounding_step() -> f64 {
    25.0
}
fn default_aerator_hp() -> f64 {
    16.0
}
fn default_maintenance_factor() -> f64 {
    1.0
}
fn default_diesel_factor() -> f64 {
    3.0
}
fn default_capacity_per_diesel_aerator() -> f64 {
    3000.0
}
fn default_base_capacity_per_ha() -> f64 {
    7500.0
}
fn default_recommended_capacity_per_ha() -> f64 {
    7000.0
}
fn default_lbs_per_ha_factor() -> f64 {
    22.0
}
fn default_lbs_to_kg() -> f64 {
    0.453592
}
