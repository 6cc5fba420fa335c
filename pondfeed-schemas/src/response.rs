use crate::analysis::Analysis;
use crate::record::{DataValidations, ResultRecord};
use crate::sample::Sample;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The envelope returned for every sample, discriminated by `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FeedingResponse {
    Success(Box<FeedingReport>),
    Error(FeedingFailure),
}

impl FeedingResponse {
    pub fn farm(&self) -> &str {
        match self {
            FeedingResponse::Success(report) => &report.farm,
            FeedingResponse::Error(failure) => &failure.farm,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FeedingResponse::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingReport {
    #[serde(rename = "finca")]
    pub farm: String,
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "datos_enviados")]
    pub submitted: Sample,
    #[serde(rename = "resultados")]
    pub results: ResultRecord,
    #[serde(rename = "analisis")]
    pub analysis: Analysis,
    #[serde(rename = "metadatos")]
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingFailure {
    #[serde(rename = "finca")]
    pub farm: String,
    #[serde(rename = "mensaje")]
    pub message: String,
    pub error: String,
    #[serde(rename = "datos_recibidos")]
    pub received: Option<Sample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub version_app: Option<String>,
    pub dispositivo_id: Option<String>,
    pub timestamp: String,
    /// Rendered value of every derived key, sentinels included.
    #[serde(rename = "campos_calculados")]
    pub calculated_fields: BTreeMap<String, String>,
    #[serde(rename = "validaciones")]
    pub validations: DataValidations,
}
