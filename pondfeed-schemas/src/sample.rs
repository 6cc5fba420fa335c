use serde::{Deserialize, Serialize};

/// A raw input value as it arrives from a field client: either already numeric
/// or free text such as `"7,8"` or `"55,042.0"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// One weekly pond measurement submitted for a feeding calculation.
///
/// Field names on the wire follow the mobile client's request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "finca")]
    pub farm: String,
    #[serde(rename = "Hectareas", default)]
    pub hectares: Option<FieldValue>,
    #[serde(rename = "Piscinas", default)]
    pub pond: Option<FieldValue>,
    #[serde(rename = "Fechadesiembra", default)]
    pub seeding_date: Option<String>,
    #[serde(rename = "Fechademuestreo", default)]
    pub sampling_date: Option<String>,
    #[serde(rename = "Edaddelcultivo", default)]
    pub age_days: Option<FieldValue>,
    #[serde(rename = "Pesoanterior", default)]
    pub previous_weight_g: Option<FieldValue>,
    #[serde(rename = "Pesoactualgdia", default)]
    pub current_weight_g: Option<FieldValue>,
    #[serde(rename = "Densidadbiologoindm2", default)]
    pub biologist_density: Option<FieldValue>,
    #[serde(rename = "AcumuladoactualLBS", default)]
    pub cumulative_feed_lbs: Option<FieldValue>,
    #[serde(rename = "numeroAA", default)]
    pub feeder_count: Option<FieldValue>,
    #[serde(rename = "Aireadores", default)]
    pub mechanical_aerators: Option<FieldValue>,
    #[serde(rename = "Alimentoactualkg", default)]
    pub feed_kg: Option<FieldValue>,

    #[serde(flatten)]
    pub auxiliary: AuxiliaryFields,
}

/// Optional fields a client may send alongside the main measurement. The
/// pre-computed values are only compared against the pipeline's own output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryFields {
    #[serde(rename = "Pesosiembra", default, skip_serializing_if = "Option::is_none")]
    pub seed_weight_g: Option<FieldValue>,
    #[serde(rename = "Densidadatarraya", default, skip_serializing_if = "Option::is_none")]
    pub cast_net_density: Option<FieldValue>,
    #[serde(rename = "TipoBalanceado", default, skip_serializing_if = "Option::is_none")]
    pub feed_type: Option<String>,
    #[serde(rename = "MarcaAA", default, skip_serializing_if = "Option::is_none")]
    pub feed_brand: Option<String>,
    #[serde(rename = "Incrementogr", default, skip_serializing_if = "Option::is_none")]
    pub client_increment_g: Option<FieldValue>,
    #[serde(rename = "Crecimientoactualgdia", default, skip_serializing_if = "Option::is_none")]
    pub client_growth_rate: Option<FieldValue>,
    #[serde(rename = "Pesoproyectadogdia", default, skip_serializing_if = "Option::is_none")]
    pub client_projected_weight_g: Option<FieldValue>,
    #[serde(rename = "Crecimientoesperadosem", default, skip_serializing_if = "Option::is_none")]
    pub client_expected_growth_g: Option<FieldValue>,
    #[serde(rename = "VersionApp", default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(rename = "DispositivoId", default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

/// A CLI input file holds either a single sample or a batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SampleFile {
    Batch { samples: Vec<Sample> },
    Single(Box<Sample>),
}

impl SampleFile {
    pub fn into_samples(self) -> Vec<Sample> {
        match self {
            SampleFile::Batch { samples } => samples,
            SampleFile::Single(sample) => vec![*sample],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_mobile_request_body() {
        let body = r#"{
            "finca": "CAMANOVILLO",
            "Hectareas": 7.8,
            "Piscinas": 5,
            "Fechadesiembra": "10/10/2024",
            "Fechademuestreo": "10/12/2024",
            "Edaddelcultivo": 62,
            "Pesoanterior": "23,33",
            "Pesoactualgdia": 30,
            "Densidadbiologoindm2": 11,
            "AcumuladoactualLBS": "55,042",
            "numeroAA": 4,
            "Aireadores": 8,
            "Alimentoactualkg": 614,
            "Densidadatarraya": 12.5,
            "VersionApp": "2.1.0"
        }"#;

        let sample: Sample = serde_json::from_str(body).unwrap();
        assert_eq!(sample.farm, "CAMANOVILLO");
        assert_eq!(sample.hectares, Some(FieldValue::Number(7.8)));
        assert_eq!(sample.age_days, Some(FieldValue::Number(62.0)));
        assert_eq!(sample.cumulative_feed_lbs, Some(FieldValue::Text("55,042".into())));
        assert_eq!(sample.auxiliary.cast_net_density, Some(FieldValue::Number(12.5)));
        assert_eq!(sample.auxiliary.app_version.as_deref(), Some("2.1.0"));
        assert_eq!(sample.auxiliary.seed_weight_g, None);
    }

    #[test]
    fn sample_file_accepts_single_or_batch() {
        let single: SampleFile = serde_json::from_str(r#"{"finca": "SUFAAZA"}"#).unwrap();
        assert_eq!(single.into_samples().len(), 1);

        let batch: SampleFile =
            serde_json::from_str(r#"{"samples": [{"finca": "A"}, {"finca": "B"}]}"#).unwrap();
        let samples = batch.into_samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].farm, "B");
    }
}
