use super::{
    engine::CalculationPipeline,
    steps::{Step, STEPS},
};
use crate::{error::PondfeedError, reference::ReferenceTable};
use pondfeed_schemas::options::CalculationOptions;

/// A fluent builder for constructing a `CalculationPipeline`.
#[derive(Default)]
pub struct PipelineBuilder {
    reference: Option<ReferenceTable>,
    options: Option<CalculationOptions>,
    steps: Option<Vec<Step>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the harvest table consulted by the density and ration steps.
    pub fn with_reference_table(mut self, table: ReferenceTable) -> Self {
        self.reference = Some(table);
        self
    }

    pub fn with_options(mut self, options: CalculationOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Replaces the standard step table.
    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Consumes the builder and returns a pipeline ready to run.
    ///
    /// # Errors
    ///
    /// Returns `PondfeedError::PipelineOrder` if a step reads a key that
    /// neither the sample nor an earlier step provides, and
    /// `PondfeedError::ConfigError` for unusable calculation constants.
    pub fn build(self) -> Result<CalculationPipeline, PondfeedError> {
        let options = self.options.unwrap_or_default();
        if options.density_calibration_divisor == 0.0 || options.sack_weight_kg == 0.0 {
            return Err(PondfeedError::ConfigError(
                "calibration divisor and sack weight must be non-zero".to_string(),
            ));
        }
        if options.lbs_to_kg <= 0.0 {
            return Err(PondfeedError::ConfigError(
                "pound to kilogram factor must be positive".to_string(),
            ));
        }
        if options.feed_rounding_step <= 0.0 {
            return Err(PondfeedError::ConfigError(
                "feed rounding step must be positive".to_string(),
            ));
        }

        let pipeline = CalculationPipeline {
            steps: self.steps.unwrap_or_else(|| STEPS.to_vec()),
            reference: self.reference.unwrap_or_default(),
            options,
        };
        pipeline.validate_order()?;
        Ok(pipeline)
    }
}
