use thiserror::Error;

#[derive(Debug, Error)]
pub enum PondfeedError {
    #[error("Invalid sample for farm '{farm}': {reason}")]
    InvalidSample { farm: String, reason: String },

    #[error("Step '{step}' reads '{key}' before any earlier step or the sample provides it")]
    PipelineOrder { step: String, key: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}

/// Why a single pipeline step could not produce a number. Rendered as the
/// legacy sentinel strings only at the output boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("Datos inválidos")]
    InvalidInput,

    #[error("No hay datos")]
    NoReferenceData,

    #[error("Error")]
    LookupMiss,

    #[error("Error")]
    DivisionByZero,

    #[error("Error")]
    NonFinite,
}

impl StepError {
    pub fn sentinel(&self) -> &'static str {
        match self {
            StepError::InvalidInput => "Datos inválidos",
            StepError::NoReferenceData => "No hay datos",
            StepError::LookupMiss | StepError::DivisionByZero | StepError::NonFinite => "Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_errors_render_legacy_sentinels() {
        assert_eq!(StepError::InvalidInput.to_string(), "Datos inválidos");
        assert_eq!(StepError::NoReferenceData.sentinel(), "No hay datos");
        assert_eq!(StepError::LookupMiss.sentinel(), "Error");
        assert_eq!(StepError::DivisionByZero.to_string(), "Error");
    }
}
