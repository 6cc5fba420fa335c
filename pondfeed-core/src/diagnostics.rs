//! Threshold rules over a finished result record.
//!
//! Every rule group reads the record through [`Metrics`], where each value
//! has been reduced to a number (missing or non-numeric values read as 0.0),
//! and appends findings to its own categories only. Groups are independent,
//! so evaluation order does not change the result set.

use crate::normalize;
use pondfeed_schemas::{
    analysis::{Analysis, Finding},
    record::ResultRecord,
    thresholds::Thresholds,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_LBS_TO_KG: f64 = 0.453592;

/// Numeric view of a result record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    values: BTreeMap<String, f64>,
}

impl Metrics {
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let values = map
            .iter()
            .map(|(key, value)| (key.clone(), numeric_value(value)))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }
}

fn numeric_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => normalize::parse_rendered(s),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleGroup {
    Growth,
    FeedConversion,
    Density,
    Aeration,
    Feeding,
    Biomass,
    Environmental,
}

impl RuleGroup {
    pub const ALL: [RuleGroup; 7] = [
        RuleGroup::Growth,
        RuleGroup::FeedConversion,
        RuleGroup::Density,
        RuleGroup::Aeration,
        RuleGroup::Feeding,
        RuleGroup::Biomass,
        RuleGroup::Environmental,
    ];
}

pub struct DiagnosticAnalyzer {
    thresholds: Thresholds,
    lbs_to_kg: f64,
}

impl Default for DiagnosticAnalyzer {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl DiagnosticAnalyzer {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            lbs_to_kg: DEFAULT_LBS_TO_KG,
        }
    }

    /// Conversion used to turn field biomass into kilograms for the feed
    /// ratio. Should match the pipeline's `CalculationOptions::lbs_to_kg`.
    pub fn with_lbs_to_kg(mut self, lbs_to_kg: f64) -> Self {
        self.lbs_to_kg = lbs_to_kg;
        self
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn analyze(&self, record: &ResultRecord) -> Analysis {
        match serde_json::to_value(record) {
            Ok(Value::Object(map)) => self.analyze_map(&map),
            _ => Analysis::default(),
        }
    }

    /// Analyzes any key/value rendering of a result record, such as one
    /// read back from a saved analysis file.
    pub fn analyze_map(&self, map: &Map<String, Value>) -> Analysis {
        self.analyze_metrics(&Metrics::from_map(map))
    }

    pub fn analyze_metrics(&self, metrics: &Metrics) -> Analysis {
        let mut analysis = Analysis::default();
        for group in RuleGroup::ALL {
            let findings = self.evaluate(group, metrics);
            debug!(?group, findings = findings.len(), "rule group evaluated");
            analysis.extend(findings);
        }
        analysis
    }

    pub fn evaluate(&self, group: RuleGroup, metrics: &Metrics) -> Vec<Finding> {
        match group {
            RuleGroup::Growth => self.growth(metrics),
            RuleGroup::FeedConversion => self.feed_conversion(metrics),
            RuleGroup::Density => self.density(metrics),
            RuleGroup::Aeration => self.aeration(metrics),
            RuleGroup::Feeding => self.feeding(metrics),
            RuleGroup::Biomass => self.biomass(metrics),
            RuleGroup::Environmental => self.environmental(metrics),
        }
    }

    fn growth(&self, m: &Metrics) -> Vec<Finding> {
        let t = &self.thresholds.growth_rate;
        let growth = m.get("crecim_actual_gdia");
        let weight = m.get("peso_actual_gdia");
        let age = m.get("edad_cultivo");

        if growth < t.low {
            vec![
                Finding::problem(format!(
                    "CRECIMIENTO LENTO ({growth:.2} g/día):\n\
                     El crecimiento actual está por debajo del umbral mínimo esperado ({} g/día). \
                     Esto puede deberse a múltiples factores:\n\
                     - Temperatura del agua subóptima (ideal: 28-30°C)\n\
                     - Niveles de oxígeno disuelto insuficientes (<4 mg/L)\n\
                     - Calidad nutricional del alimento inadecuada\n\
                     - Estrés por manejo, enfermedades o parásitos\n\
                     - Densidad de siembra demasiado alta\n\n\
                     El peso actual es de {weight:.2} g a los {age:.0} días, lo que representa un crecimiento \
                     más lento de lo esperado para esta etapa.",
                    t.low
                )),
                Finding::recommendation(
                    "MEJORAR TASA DE CRECIMIENTO:\n\
                     1. Verificar y ajustar temperatura del agua (óptima: 28-30°C)\n\
                     2. Aumentar oxigenación (mantener >5 mg/L)\n\
                     3. Revisar calidad del alimento (proteína >35%, lípidos <10%)\n\
                     4. Realizar muestreo de salud para descartar enfermedades\n\
                     5. Considerar ajustar densidad si es demasiado alta\n\
                     6. Implementar protocolos de alimentación con bandejas para monitorear consumo real",
                ),
            ]
        } else if growth > t.high {
            vec![Finding::observation(format!(
                "CRECIMIENTO ACELERADO ({growth:.2} g/día):\n\
                 La tasa de crecimiento es superior al rango esperado. Esto puede ser positivo pero requiere \
                 monitorización para asegurar que no hay estrés metabólico o problemas de calidad de agua."
            ))]
        } else {
            Vec::new()
        }
    }

    fn feed_conversion(&self, m: &Metrics) -> Vec<Finding> {
        let t = &self.thresholds.fca;
        let field = m.get("fca_campo");
        let consumption = m.get("fca_consumo");
        let fed = m.get("acumulado_actual_lbs");
        let produced = m.get("libras_totales_campo");
        let mut findings = Vec::new();

        if field < t.optimal_min {
            findings.push(Finding::observation(format!(
                "FCA CAMPO EXCELENTE ({field:.2}):\n\
                 El factor de conversión alimenticia calculado por el método de campo es excelente, \
                 indicando una alta eficiencia en la conversión del alimento a biomasa."
            )));
        } else if field > t.optimal_max {
            findings.push(Finding::problem(format!(
                "FCA CAMPO ELEVADO ({field:.2}):\n\
                 El factor de conversión alimenticia por campo está por encima del rango óptimo ({}-{}). \
                 Esto indica ineficiencia en la conversión del alimento, que puede deberse a:\n\
                 - Sobrealimentación\n\
                 - Pérdida de alimento (no consumido)\n\
                 - Condiciones ambientales subóptimas\n\
                 - Estrés en los organismos\n\n\
                 Se han utilizado {fed:.0} lbs de alimento para producir {produced:.0} lbs de biomasa.",
                t.optimal_min, t.optimal_max
            )));
            findings.push(Finding::recommendation(
                "OPTIMIZAR FCA CAMPO:\n\
                 1. Ajustar ración alimenticia (reducir 5-10% y monitorizar consumo)\n\
                 2. Implementar bandejas de alimentación para verificar consumo real\n\
                 3. Verificar calidad del alimento y condiciones de almacenamiento\n\
                 4. Revisar parámetros de calidad de agua (oxígeno, temperatura, amonio)",
            ));
        }

        if consumption > t.optimal_max {
            findings.push(Finding::problem(format!(
                "FCA CONSUMO ELEVADO ({consumption:.2}):\n\
                 El factor de conversión alimenticia por consumo está por encima del rango óptimo, \
                 lo que sugiere que el alimento no se está convirtiendo eficientemente en biomasa. \
                 Posibles causas:\n\
                 - Método de cálculo de densidad por consumo inexacto\n\
                 - Pérdidas significativas de alimento\n\
                 - Condiciones ambientales que afectan el metabolismo\n\
                 - Problemas de salud en la población"
            )));
        }

        findings
    }

    fn density(&self, m: &Metrics) -> Vec<Finding> {
        let difference = m.get("diferencia_campo_biologo");
        if difference.abs() <= self.thresholds.density_difference.acceptable {
            return Vec::new();
        }

        let biologist = m.get("densidad_biologo_indm2");
        let consumption = m.get("densidad_consumo_im2");
        vec![
            Finding::problem(format!(
                "DIFERENCIA SIGNIFICATIVA ENTRE DENSIDADES ({difference:.0}%):\n\
                 Existe una discrepancia importante entre la densidad estimada por el biólogo \
                 ({biologist:.2} ind/m²) y la calculada por consumo ({consumption:.2} ind/m²).\n\n\
                 Posibles causas:\n\
                 1. Error en el muestreo biológico (subestimación o sobrestimación)\n\
                 2. Cálculo incorrecto de la biomasa por consumo\n\
                 3. Distribución desigual de la población en el estanque\n\
                 4. Mortalidad no contabilizada\n\
                 5. Alimento no consumido que afecta el cálculo por consumo"
            )),
            Finding::recommendation(
                "VALIDAR DENSIDADES:\n\
                 1. Realizar un nuevo muestreo biológico con metodología estandarizada\n\
                 2. Verificar los cálculos de alimento consumido y conversión\n\
                 3. Considerar realizar un conteo directo en áreas representativas\n\
                 4. Revisar la uniformidad de distribución del alimento\n\
                 5. Evaluar posibles mortalidades no registradas",
            ),
        ]
    }

    fn aeration(&self, m: &Metrics) -> Vec<Finding> {
        let t = &self.thresholds.aeration_capacity;
        let biomass = m.get("libras_totales_campo");
        let capacity = m.get("capacidad_carga_aireaccion");
        if capacity <= 0.0 {
            return Vec::new();
        }

        let ratio = biomass / capacity;
        let pct = ratio * 100.0;
        if ratio > t.critical {
            let aerators = m.get("h_aireadores_mecanicos");
            let hectares = m.get("hectareas");
            let per_hectare = if hectares > 0.0 { aerators / hectares } else { 0.0 };
            vec![
                Finding::problem(format!(
                    "CAPACIDAD DE AIREACIÓN CRÍTICA ({pct:.1}%):\n\
                     La biomasa actual ({biomass:.0} lbs) está utilizando el {pct:.1}% \
                     de la capacidad de aireación disponible ({capacity:.0} lbs).\n\n\
                     Esto representa un riesgo significativo para la oxigenación del agua, especialmente \
                     durante la noche cuando disminuye la producción de oxígeno por fotosíntesis.\n\n\
                     Con {aerators:.0} aireadores en {hectares:.2} ha, la relación actual es de \
                     {per_hectare:.2} aireadores por hectárea."
                )),
                Finding::recommendation(
                    "MEJORAR CAPACIDAD DE AIREACIÓN:\n\
                     1. Añadir aireadores adicionales inmediatamente (ideal: 1-1.5 por hectárea)\n\
                     2. Optimizar la distribución de los aireadores existentes\n\
                     3. Implementar monitoreo continuo de oxígeno disuelto\n\
                     4. Considerar reducir la biomasa mediante cosecha parcial\n\
                     5. Revisar el mantenimiento y funcionamiento de los aireadores actuales",
                ),
            ]
        } else if ratio > t.warning {
            vec![Finding::observation(format!(
                "CAPACIDAD DE AIREACIÓN ALERTA ({pct:.1}%):\n\
                 La biomasa está utilizando el {pct:.1}% de la capacidad de aireación. \
                 Se recomienda monitorizar estrechamente los niveles de oxígeno, especialmente en horas \
                 de la madrugada."
            ))]
        } else {
            Vec::new()
        }
    }

    fn feeding(&self, m: &Metrics) -> Vec<Finding> {
        let optimal = self.thresholds.feed_ratio.optimal;
        let biomass_lbs = m.get("libras_totales_campo");
        if biomass_lbs <= 0.0 {
            return Vec::new();
        }

        let feed = m.get("alimento_actual_kg");
        let ratio = feed / (biomass_lbs * self.lbs_to_kg) * 100.0;
        if ratio <= optimal * 1.2 {
            return Vec::new();
        }

        let weight = m.get("peso_actual_gdia");
        vec![
            Finding::problem(format!(
                "SOBREALIMENTACIÓN DETECTADA ({ratio:.1}% de biomasa):\n\
                 La ración alimenticia actual representa el {ratio:.1}% de la biomasa estimada, \
                 lo que excede el rango recomendado (1-3% dependiendo del tamaño de los organismos).\n\n\
                 Para organismos de {weight:.1} g, la ración debería estar alrededor del {optimal}% de la biomasa.\n\n\
                 La sobrealimentación puede causar:\n\
                 - Deterioro de la calidad del agua\n\
                 - Aumento del FCA y costos de producción\n\
                 - Problemas de salud en los organismos"
            )),
            Finding::recommendation(format!(
                "AJUSTAR ALIMENTACIÓN:\n\
                 1. Reducir la ración al {optimal}% de la biomasa estimada\n\
                 2. Implementar protocolos de alimentación con bandejas de consumo\n\
                 3. Ajustar frecuencia de alimentación (4-5 veces/día)\n\
                 4. Monitorizar consumo real y ajustar según necesidad"
            )),
        ]
    }

    fn biomass(&self, m: &Metrics) -> Vec<Finding> {
        let field = m.get("libras_totales_campo");
        let consumption = m.get("libras_totales_consumo");
        if field <= 0.0 || consumption <= 0.0 {
            return Vec::new();
        }

        let difference = (field - consumption).abs() / field * 100.0;
        if difference <= self.thresholds.biomass_difference.acceptable {
            return Vec::new();
        }

        vec![Finding::problem(format!(
            "DISCREPANCIA EN ESTIMACIONES DE BIOMASA ({difference:.1}%):\n\
             Existe una diferencia significativa entre la biomasa estimada por campo \
             ({field:.0} lbs) y la calculada por consumo ({consumption:.0} lbs).\n\n\
             Esta discrepancia indica posibles problemas en:\n\
             1. Exactitud del muestreo biológico\n\
             2. Cálculo de la conversión alimenticia\n\
             3. Estimación de la densidad poblacional\n\
             4. Registro del alimento suministrado\n\n\
             Es fundamental resolver esta discrepancia para una gestión adecuada."
        ))]
    }

    fn environmental(&self, m: &Metrics) -> Vec<Finding> {
        let slow = m.get("crecim_actual_gdia") < self.thresholds.growth_rate.low;
        let inefficient = m.get("fca_campo") > self.thresholds.fca.optimal_max;
        if !(slow && inefficient) {
            return Vec::new();
        }

        vec![Finding::observation(
            "PATRÓN DE CRECIMIENTO LENTO CON FCA ELEVADO:\n\
             La combinación de crecimiento lento y FCA elevado sugiere fuertemente \
             problemas ambientales o de salud que están afectando el metabolismo y \
             la conversión alimenticia. Se recomienda realizar urgentemente:\n\
             1. Análisis completo de calidad de agua (oxígeno, amonio, nitritos, pH, alcalinidad)\n\
             2. Evaluación de salud de los organismos (branquias, hepatopáncreas, apéndices)\n\
             3. Revisión del sistema de aireación y circulación de agua",
        )]
    }
}
