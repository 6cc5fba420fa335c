//! Per-sample orchestration: seed a store, run the pipeline, assemble the
//! record, analyze it and wrap everything in a response envelope.

use crate::{
    assembler::{calculated_fields, ResultAssembler},
    diagnostics::DiagnosticAnalyzer,
    error::PondfeedError,
    normalize,
    pipeline::{CalculationPipeline, PipelineBuilder, RunTrace},
    reference::{ReferenceData, Terrain, YieldTable},
    store::ValueStore,
    validation,
};
use chrono::Local;
use pondfeed_schemas::{
    options::CalculationOptions,
    response::{FeedingFailure, FeedingReport, FeedingResponse, ResponseMetadata},
    sample::{FieldValue, Sample},
    thresholds::Thresholds,
};
use tracing::{info, warn};

pub const SUCCESS_MESSAGE: &str = "Predicción de alimentación calculada exitosamente";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Shared read-only state for processing any number of samples.
pub struct FeedingService {
    pipeline: CalculationPipeline,
    terrain: Terrain,
    yields: YieldTable,
    analyzer: DiagnosticAnalyzer,
}

impl FeedingService {
    pub fn new(
        reference: ReferenceData,
        thresholds: Thresholds,
        options: CalculationOptions,
    ) -> Result<Self, PondfeedError> {
        let ReferenceData { harvest, terrain, yields } = reference;
        let analyzer = DiagnosticAnalyzer::new(thresholds).with_lbs_to_kg(options.lbs_to_kg);
        let pipeline = PipelineBuilder::new()
            .with_reference_table(harvest)
            .with_options(options)
            .build()?;

        Ok(Self {
            pipeline,
            terrain,
            yields,
            analyzer,
        })
    }

    /// Built-in reference data with default thresholds and constants.
    pub fn with_defaults() -> Result<Self, PondfeedError> {
        Self::new(
            ReferenceData::fallback(),
            Thresholds::default(),
            CalculationOptions::default(),
        )
    }

    pub fn analyzer(&self) -> &DiagnosticAnalyzer {
        &self.analyzer
    }

    pub fn process(&self, sample: &Sample) -> FeedingResponse {
        self.process_traced(sample).0
    }

    /// Like [`process`](Self::process), also returning the step trace. The
    /// trace is empty when the sample is rejected before the pipeline runs.
    pub fn process_traced(&self, sample: &Sample) -> (FeedingResponse, RunTrace) {
        match self.compute(sample) {
            Ok((report, trace)) => {
                info!(
                    farm = %report.farm,
                    failed_steps = trace.failures().count(),
                    findings = report.analysis.len(),
                    "feeding calculation completed"
                );
                (FeedingResponse::Success(Box::new(report)), trace)
            }
            Err(err) => {
                warn!(farm = %sample.farm, error = %err, "feeding calculation rejected");
                let failure = FeedingFailure {
                    farm: sample.farm.clone(),
                    message: format!("Error en el cálculo de alimentación: {err}"),
                    error: err.to_string(),
                    received: Some(sample.clone()),
                };
                (FeedingResponse::Error(failure), RunTrace::default())
            }
        }
    }

    fn compute(&self, sample: &Sample) -> Result<(FeedingReport, RunTrace), PondfeedError> {
        check_sample(sample)?;
        let resolved = self.resolve_hectares(sample);

        let mut store = ValueStore::from_sample(&resolved);
        let trace = self.pipeline.run(&mut store);

        let results = ResultAssembler::new(&self.yields, self.pipeline.options()).assemble(&resolved, &store);
        let analysis = self.analyzer.analyze(&results);

        let metadata = ResponseMetadata {
            version_app: sample.auxiliary.app_version.clone(),
            dispositivo_id: sample.auxiliary.device_id.clone(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            calculated_fields: calculated_fields(&store),
            validations: validation::validate(&store),
        };

        let report = FeedingReport {
            farm: sample.farm.clone(),
            message: SUCCESS_MESSAGE.to_string(),
            submitted: sample.clone(),
            results,
            analysis,
            metadata,
        };
        Ok((report, trace))
    }

    /// Fills in the pond area from the terrain table when the sample
    /// carries none.
    fn resolve_hectares(&self, sample: &Sample) -> Sample {
        let supplied = normalize::normalize(sample.hectares.as_ref());
        if supplied > 0.0 {
            return sample.clone();
        }

        let mut resolved = sample.clone();
        if let Some(pond) = &sample.pond {
            match self.terrain.hectares(&sample.farm, pond) {
                Some(hectares) => {
                    info!(farm = %sample.farm, hectares, "pond area resolved from terrain");
                    resolved.hectares = Some(FieldValue::Number(hectares));
                }
                None => warn!(farm = %sample.farm, "pond not found in terrain data"),
            }
        }
        resolved
    }
}

fn check_sample(sample: &Sample) -> Result<(), PondfeedError> {
    if sample.farm.trim().is_empty() {
        return Err(PondfeedError::InvalidSample {
            farm: sample.farm.clone(),
            reason: "farm name is empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_sample() -> Sample {
        Sample {
            farm: "CAMANOVILLO".into(),
            pond: Some(FieldValue::Number(5.0)),
            current_weight_g: Some(FieldValue::Number(20.0)),
            biologist_density: Some(FieldValue::Number(10.0)),
            feed_kg: Some(FieldValue::Number(300.0)),
            ..Default::default()
        }
    }

    #[test]
    fn missing_hectares_come_from_terrain() {
        let service = FeedingService::with_defaults().unwrap();
        let response = service.process(&create_test_sample());

        let FeedingResponse::Success(report) = response else {
            panic!("expected success");
        };
        let expected = ReferenceData::fallback()
            .terrain
            .hectares("CAMANOVILLO", &FieldValue::Number(5.0))
            .unwrap();
        assert_relative_eq!(report.results.hectares, expected);
        assert!(report.submitted.hectares.is_none());
    }

    #[test]
    fn empty_farm_yields_error_envelope() {
        let service = FeedingService::with_defaults().unwrap();
        let mut sample = create_test_sample();
        sample.farm = "  ".into();

        let (response, trace) = service.process_traced(&sample);
        assert!(trace.is_empty());
        match response {
            FeedingResponse::Error(failure) => {
                assert!(failure.message.starts_with("Error en el cálculo de alimentación: "));
                assert_eq!(failure.received, Some(sample));
            }
            FeedingResponse::Success(_) => panic!("expected error envelope"),
        }
    }

    #[test]
    fn unusable_options_fail_construction() {
        let options = CalculationOptions {
            sack_weight_kg: 0.0,
            ..Default::default()
        };
        let result = FeedingService::new(ReferenceData::fallback(), Thresholds::default(), options);
        assert!(matches!(result, Err(PondfeedError::ConfigError(_))));
    }

    #[test]
    fn non_positive_lbs_to_kg_is_rejected() {
        let options = CalculationOptions {
            lbs_to_kg: 0.0,
            ..Default::default()
        };
        let result = FeedingService::new(ReferenceData::fallback(), Thresholds::default(), options);
        assert!(matches!(result, Err(PondfeedError::ConfigError(_))));
    }

    #[test]
    fn lbs_to_kg_override_reaches_metrics_and_diagnosis() {
        let options = CalculationOptions {
            lbs_to_kg: 0.5,
            ..Default::default()
        };
        let service = FeedingService::new(ReferenceData::fallback(), Thresholds::default(), options).unwrap();
        let mut sample = create_test_sample();
        sample.feed_kg = Some(FieldValue::Number(5000.0));

        let FeedingResponse::Success(report) = service.process(&sample) else {
            panic!("expected success");
        };
        let feeding = report.results.derived_metrics.feeding.as_ref().unwrap();
        assert_relative_eq!(feeding.feed_kg_per_biomass_kg * 100.0, feeding.feed_percent_of_biomass);

        let headline = format!(
            "SOBREALIMENTACIÓN DETECTADA ({:.1}% de biomasa)",
            feeding.feed_percent_of_biomass
        );
        assert!(
            report.analysis.problems.iter().any(|p| p.starts_with(&headline)),
            "no problem starts with {headline:?}: {:?}",
            report.analysis.problems
        );
    }

    #[test]
    fn metadata_carries_client_identity() {
        let service = FeedingService::with_defaults().unwrap();
        let mut sample = create_test_sample();
        sample.auxiliary.app_version = Some("2.1.0".into());
        sample.auxiliary.device_id = Some("tablet-7".into());

        let FeedingResponse::Success(report) = service.process(&sample) else {
            panic!("expected success");
        };
        assert_eq!(report.metadata.version_app.as_deref(), Some("2.1.0"));
        assert_eq!(report.metadata.dispositivo_id.as_deref(), Some("tablet-7"));
        assert!(report.metadata.calculated_fields.contains_key("lunes_dia1"));
    }
}
