use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The finalized output of one calculation run, keyed by the names the field
/// client and the spreadsheet use. Values the client reads as numbers are
/// `f64`; values shown verbatim (formatted, grouped, or sentinel) are `String`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "hectareas")]
    pub hectares: f64,
    #[serde(rename = "piscinas")]
    pub pond: String,
    #[serde(rename = "fecha_siembra")]
    pub seeding_date: String,
    #[serde(rename = "fecha_muestreo")]
    pub sampling_date: String,
    #[serde(rename = "edad_cultivo")]
    pub age_days: f64,
    #[serde(rename = "crecim_actual_gdia")]
    pub growth_rate: f64,
    #[serde(rename = "peso_siembra")]
    pub seed_weight: String,
    #[serde(rename = "peso_actual_gdia")]
    pub current_weight: f64,
    #[serde(rename = "peso_proyectado_gdia")]
    pub projected_weight: String,
    #[serde(rename = "crecimiento_esperado_sem")]
    pub expected_growth: String,
    #[serde(rename = "densidad_consumo_im2")]
    pub consumption_density: f64,
    #[serde(rename = "alimento_actual_kg")]
    pub feed_kg: f64,
    #[serde(rename = "kg_100mil")]
    pub kg_per_100k: String,
    #[serde(rename = "sacos_actuales")]
    pub feed_sacks: f64,
    #[serde(rename = "densidad_biologo_indm2")]
    pub biologist_density: f64,
    #[serde(rename = "densidad_atarraya")]
    pub cast_net_density: String,
    #[serde(rename = "lunes_dia1")]
    pub monday: f64,
    #[serde(rename = "martes_dia2")]
    pub tuesday: f64,
    #[serde(rename = "miercoles_dia3")]
    pub wednesday: f64,
    #[serde(rename = "jueves_dia4")]
    pub thursday: f64,
    #[serde(rename = "viernes_dia5")]
    pub friday: f64,
    #[serde(rename = "sabado_dia6")]
    pub saturday: f64,
    #[serde(rename = "domingo_dia7")]
    pub sunday: f64,
    #[serde(rename = "recomendation_semana")]
    pub weekly_average: f64,
    #[serde(rename = "acumulado_semanal")]
    pub weekly_cumulative: f64,
    #[serde(rename = "numero_aa")]
    pub feeder_count: f64,
    #[serde(rename = "h_aireadores_mecanicos")]
    pub mechanical_aerators: f64,
    #[serde(rename = "aireadores_diesel")]
    pub diesel_aerators: String,
    #[serde(rename = "capacidad_carga_aireaccion")]
    pub aeration_capacity: String,
    #[serde(rename = "recomendacion_lbs_ha")]
    pub recommended_lbs: String,
    #[serde(rename = "lbs_ha_actual_campo")]
    pub lbs_ha_field: f64,
    #[serde(rename = "lbs_tolva_segun_consumo")]
    pub tray_lbs_consumption: String,
    #[serde(rename = "lbs_ha_consumo")]
    pub lbs_ha_consumption: f64,
    #[serde(rename = "diferencia_campo_biologo")]
    pub density_difference: String,
    #[serde(rename = "peso_anterior")]
    pub previous_weight: f64,
    #[serde(rename = "incremento_gr")]
    pub weight_increment: f64,
    #[serde(rename = "acumulado_actual_lbs")]
    pub cumulative_feed_lbs: f64,
    #[serde(rename = "fca_campo")]
    pub fca_field: String,
    #[serde(rename = "libras_totales_campo")]
    pub total_lbs_field: String,
    #[serde(rename = "libras_totales_consumo")]
    pub total_lbs_consumption: f64,
    #[serde(rename = "hp_ha")]
    pub hp_per_hectare: String,
    #[serde(rename = "libras_totales_por_aireador")]
    pub lbs_per_aerator: String,
    #[serde(rename = "lbs_tolva_actual_campo")]
    pub tray_lbs_field: String,
    #[serde(rename = "fca_consumo")]
    pub fca_consumption: String,
    #[serde(rename = "rendimiento_lbs_saco")]
    pub yield_lbs_per_sack: String,

    #[serde(flatten)]
    pub client: ClientFields,

    #[serde(rename = "diferencias_flutter_vs_calculado")]
    pub client_deltas: BTreeMap<String, ClientDelta>,
    #[serde(rename = "validaciones_cruzadas")]
    pub cross_validation: CrossValidation,
    #[serde(rename = "metricas_adicionales")]
    pub derived_metrics: DerivedMetrics,
}

/// Auxiliary fields echoed back from the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientFields {
    #[serde(rename = "peso_siembra_flutter")]
    pub seed_weight: Option<f64>,
    #[serde(rename = "densidad_atarraya_flutter")]
    pub cast_net_density: Option<f64>,
    #[serde(rename = "tipo_balanceado")]
    pub feed_type: Option<String>,
    #[serde(rename = "marca_aa")]
    pub feed_brand: Option<String>,
    #[serde(rename = "incremento_gr_flutter")]
    pub weight_increment: Option<f64>,
    #[serde(rename = "crecimiento_actual_flutter")]
    pub growth_rate: Option<f64>,
    #[serde(rename = "peso_proyectado_flutter")]
    pub projected_weight: Option<f64>,
    #[serde(rename = "crecimiento_esperado_flutter")]
    pub expected_growth: Option<f64>,
}

/// Client-supplied value against the pipeline's own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDelta {
    #[serde(rename = "flutter")]
    pub client: f64,
    #[serde(rename = "calculado")]
    pub computed: f64,
    #[serde(rename = "diferencia_abs")]
    pub absolute: f64,
    #[serde(rename = "diferencia_porcentaje")]
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossValidation {
    #[serde(rename = "fechas", skip_serializing_if = "Option::is_none")]
    pub dates: Option<DateCheck>,
    #[serde(rename = "densidades", skip_serializing_if = "Option::is_none")]
    pub densities: Option<DensityCheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateCheck {
    Checked {
        #[serde(rename = "edad_enviada")]
        supplied_age: Option<i64>,
        #[serde(rename = "edad_calculada")]
        computed_age: i64,
        #[serde(rename = "diferencia_dias")]
        difference_days: i64,
        #[serde(rename = "es_consistente")]
        consistent: bool,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityCheck {
    #[serde(rename = "densidad_biologo")]
    pub biologist: f64,
    #[serde(rename = "densidad_atarraya")]
    pub cast_net: f64,
    #[serde(rename = "diferencia_abs")]
    pub absolute: f64,
    #[serde(rename = "diferencia_porcentaje")]
    pub percent: f64,
    #[serde(rename = "diferencia_aceptable")]
    pub acceptable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    #[serde(rename = "eficiencia_aireacion", skip_serializing_if = "Option::is_none")]
    pub aeration: Option<AerationEfficiency>,
    #[serde(rename = "eficiencia_alimenticia", skip_serializing_if = "Option::is_none")]
    pub feeding: Option<FeedingEfficiency>,
    #[serde(rename = "productividad", skip_serializing_if = "Option::is_none")]
    pub productivity: Option<Productivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AerationEfficiency {
    #[serde(rename = "libras_por_aireador")]
    pub lbs_per_aerator: f64,
    #[serde(rename = "aireadores_por_hectarea")]
    pub aerators_per_hectare: f64,
    #[serde(rename = "libras_por_hectarea")]
    pub lbs_per_hectare: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingEfficiency {
    #[serde(rename = "kg_alimento_por_kg_biomasa")]
    pub feed_kg_per_biomass_kg: f64,
    #[serde(rename = "porcentaje_biomasa_alimentacion")]
    pub feed_percent_of_biomass: f64,
    #[serde(rename = "eficiencia_conversion")]
    pub conversion_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Productivity {
    #[serde(rename = "gramos_por_m2")]
    pub grams_per_m2: f64,
    #[serde(rename = "kg_por_hectarea")]
    pub kg_per_hectare: f64,
    #[serde(rename = "individuos_por_m2")]
    pub individuals_per_m2: f64,
    #[serde(rename = "peso_promedio_g")]
    pub mean_weight_g: f64,
    #[serde(rename = "rendimiento_esperado_pct", skip_serializing_if = "Option::is_none")]
    pub expected_yield_pct: Option<f64>,
}

/// Per-run data-quality checks reported in the response metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValidations {
    #[serde(rename = "fechas_validas")]
    pub dates: DateValidity,
    #[serde(rename = "valores_numericos_validos")]
    pub numeric_values: BTreeMap<String, RangeCheck>,
    #[serde(rename = "rangos_aceptables")]
    pub ranges: GrowthRanges,
    #[serde(rename = "consistencia_datos")]
    pub consistency: DensityConsistency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValidity {
    #[serde(rename = "valido")]
    pub valid: bool,
    #[serde(rename = "dias_cultivo", skip_serializing_if = "Option::is_none")]
    pub cultivation_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "advertencia", skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeCheck {
    #[serde(rename = "valor")]
    pub value: f64,
    #[serde(rename = "valido")]
    pub valid: bool,
    #[serde(rename = "rango_esperado")]
    pub expected_range: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRanges {
    #[serde(rename = "crecimiento")]
    pub growth: GrowthRangeCheck,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRangeCheck {
    #[serde(rename = "valor")]
    pub value: f64,
    #[serde(rename = "optimo")]
    pub optimal: bool,
    #[serde(rename = "aceptable")]
    pub acceptable: bool,
    #[serde(rename = "rango_optimo")]
    pub optimal_range: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DensityConsistency {
    #[serde(rename = "densidades", skip_serializing_if = "Option::is_none")]
    pub densities: Option<ConsistencyCheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyCheck {
    #[serde(rename = "diferencia_porcentaje")]
    pub percent: f64,
    #[serde(rename = "consistente")]
    pub consistent: bool,
    #[serde(rename = "limite_aceptable")]
    pub limit: String,
}
