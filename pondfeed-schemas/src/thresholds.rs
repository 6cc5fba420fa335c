use serde::{Deserialize, Serialize};

/// Limits used by the diagnostic rules. Every field has a default, so an
/// override document only needs to name the values it changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default)]
    pub growth_rate: GrowthRateThresholds,
    #[serde(default)]
    pub fca: FcaThresholds,
    #[serde(default)]
    pub density_difference: DensityDifferenceThresholds,
    #[serde(default)]
    pub aeration_capacity: AerationThresholds,
    #[serde(default)]
    pub feed_ratio: FeedRatioThresholds,
    #[serde(default)]
    pub biomass_difference: BiomassDifferenceThresholds,
}

/// Growth in g/day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRateThresholds {
    #[serde(default = "default_growth_low")]
    pub low: f64,
    #[serde(default = "default_growth_optimal")]
    pub optimal: f64,
    #[serde(default = "default_growth_high")]
    pub high: f64,
}

impl Default for GrowthRateThresholds {
    fn default() -> Self {
        Self {
            low: default_growth_low(),
            optimal: default_growth_optimal(),
            high: default_growth_high(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FcaThresholds {
    #[serde(default = "default_fca_optimal_min")]
    pub optimal_min: f64,
    #[serde(default = "default_fca_optimal_max")]
    pub optimal_max: f64,
}

impl Default for FcaThresholds {
    fn default() -> Self {
        Self {
            optimal_min: default_fca_optimal_min(),
            optimal_max: default_fca_optimal_max(),
        }
    }
}

/// Tolerated biologist vs. consumption density gap, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityDifferenceThresholds {
    #[serde(default = "default_density_acceptable")]
    pub acceptable: f64,
}

impl Default for DensityDifferenceThresholds {
    fn default() -> Self {
        Self {
            acceptable: default_density_acceptable(),
        }
    }
}

/// Biomass over aeration capacity ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AerationThresholds {
    #[serde(default = "default_aeration_warning")]
    pub warning: f64,
    #[serde(default = "default_aeration_critical")]
    pub critical: f64,
}

impl Default for AerationThresholds {
    fn default() -> Self {
        Self {
            warning: default_aeration_warning(),
            critical: default_aeration_critical(),
        }
    }
}

/// Daily ration as percent of body weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedRatioThresholds {
    #[serde(default = "default_feed_ratio_optimal")]
    pub optimal: f64,
}

impl Default for FeedRatioThresholds {
    fn default() -> Self {
        Self {
            optimal: default_feed_ratio_optimal(),
        }
    }
}

/// Field vs. consumption biomass gap, in percent of the field estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomassDifferenceThresholds {
    #[serde(default = "default_biomass_acceptable")]
    pub acceptable: f64,
}

impl Default for BiomassDifferenceThresholds {
    fn default() -> Self {
        Self {
            acceptable: default_biomass_acceptable(),
        }
    }
}

fn default_growth_low() -> f64 {
    0.5
}
fn default_growth_optimal() -> f64 {
    1.0
}
fn default_growth_high() -> f64 {
    1.5
}
fn default_fca_optimal_min() -> f64 {
    0.8
}
fn default_fca_optimal_max() -> f64 {
    1.2
}
fn default_density_acceptable() -> f64 {
    15.0
}
fn default_aeration_warning() -> f64 {
    0.8
}
fn default_aeration_critical() -> f64 {
    0.9
}
fn default_feed_ratio_optimal() -> f64 {
    1.5
}
fn default_biomass_acceptable() -> f64 {
    20.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_formats::SettingsFile;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let json = r#"{"thresholds": {"growth_rate": {"low": 0.4}, "fca": {"optimal_max": 1.4}}}"#;
        let file: SettingsFile = serde_json::from_str(json).unwrap();
        let thresholds = file.thresholds;

        assert_eq!(thresholds.growth_rate.low, 0.4);
        assert_eq!(thresholds.growth_rate.high, 1.5);
        assert_eq!(thresholds.fca.optimal_min, 0.8);
        assert_eq!(thresholds.fca.optimal_max, 1.4);
        assert_eq!(thresholds.aeration_capacity, AerationThresholds::default());
        assert_eq!(thresholds.biomass_difference.acceptable, 20.0);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let file: SettingsFile = serde_json::from_str("{}").unwrap();
        assert_eq!(file.thresholds, Thresholds::default());
    }
}
