use super::steps::{Step, StepContext, StepOutcome, SEEDED_KEYS};
use crate::{
    error::{PondfeedError, StepError},
    reference::ReferenceTable,
    store::{Entry, Key, ValueStore},
};
use pondfeed_schemas::options::CalculationOptions;
use std::collections::BTreeSet;
use tracing::debug;

pub struct CalculationPipeline {
    pub(super) steps: Vec<Step>,
    pub(super) reference: ReferenceTable,
    pub(super) options: CalculationOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Computed,
    Failed(StepError),
    Skipped,
}

/// One executed step, as recorded in a run trace.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub order: usize,
    pub name: &'static str,
    pub key: Key,
    pub status: StepStatus,
    pub rendered: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunTrace {
    pub records: Vec<StepRecord>,
}

impl RunTrace {
    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.status, StepStatus::Failed(_)))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CalculationPipeline {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn options(&self) -> &CalculationOptions {
        &self.options
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    /// Checks that every step only reads keys the sample seeds or an earlier
    /// step writes.
    pub fn validate_order(&self) -> Result<(), PondfeedError> {
        let mut available: BTreeSet<Key> = SEEDED_KEYS.iter().copied().collect();
        for step in &self.steps {
            if let Some(missing) = step.inputs.iter().find(|key| !available.contains(*key)) {
                return Err(PondfeedError::PipelineOrder {
                    step: step.name.to_string(),
                    key: missing.to_string(),
                });
            }
            available.insert(step.output);
        }
        Ok(())
    }

    /// Runs every step in order against `store`. A failing step records its
    /// error under its key and the run continues.
    pub fn run(&self, store: &mut ValueStore) -> RunTrace {
        let ctx = StepContext {
            reference: &self.reference,
            options: &self.options,
        };

        let mut trace = RunTrace::default();
        for (order, step) in self.steps.iter().enumerate() {
            let status = match (step.compute)(&ctx, store) {
                StepOutcome::Write(Ok(quantity)) => {
                    store.set_number(step.output, quantity);
                    StepStatus::Computed
                }
                StepOutcome::Write(Err(err)) => {
                    store.set(step.output, Entry::Failed(err));
                    StepStatus::Failed(err)
                }
                StepOutcome::Skip => StepStatus::Skipped,
            };

            let rendered = store.get(step.output);
            debug!(step = step.name, key = %step.output, value = %rendered, ?status, "pipeline step");
            trace.records.push(StepRecord {
                order: order + 1,
                name: step.name,
                key: step.output,
                status,
                rendered,
            });
        }
        trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{builder::PipelineBuilder, steps::STEPS};
    use crate::reference::ReferenceData;

    #[test]
    fn step_order_is_pinned() {
        let names: Vec<&str> = STEPS.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "age",
                "weight_increment",
                "growth_rate",
                "projected_weight",
                "expected_growth",
                "consumption_density",
                "kg_per_100k",
                "feed_sacks",
                "sunday",
                "monday",
                "tuesday",
                "wednesday",
                "thursday",
                "friday",
                "saturday",
                "weekly_average",
                "weekly_cumulative",
                "diesel_aerators",
                "aeration_capacity",
                "lbs_ha_field",
                "lbs_ha_consumption",
                "total_lbs_field",
                "total_lbs_consumption",
                "tray_lbs_field",
                "tray_lbs_consumption",
                "hp_per_hectare",
                "fca_field",
                "fca_consumption",
                "yield_lbs_per_sack",
                "recommended_lbs",
                "density_difference",
                "lbs_per_aerator",
            ]
        );
    }

    #[test]
    fn standard_table_is_well_ordered() {
        let pipeline = PipelineBuilder::new().build().unwrap();
        assert!(pipeline.validate_order().is_ok());
        assert_eq!(pipeline.steps().len(), 32);
    }

    #[test]
    fn reordered_table_is_rejected() {
        let mut steps = STEPS.to_vec();
        // Move the FCA step ahead of the totals it divides by.
        let fca = steps.remove(26);
        steps.insert(0, fca);

        let err = PipelineBuilder::new().with_steps(steps).build().err().unwrap();
        match err {
            PondfeedError::PipelineOrder { step, key } => {
                assert_eq!(step, "fca_field");
                assert_eq!(key, "libras_totales_campo");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_calibration_divisor_is_a_config_error() {
        let options = CalculationOptions {
            density_calibration_divisor: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            PipelineBuilder::new().with_options(options).build(),
            Err(PondfeedError::ConfigError(_))
        ));
    }

    #[test]
    fn empty_store_still_completes() {
        let pipeline = PipelineBuilder::new()
            .with_reference_table(ReferenceData::fallback().harvest)
            .build()
            .unwrap();
        let mut store = ValueStore::new();
        let trace = pipeline.run(&mut store);

        assert_eq!(trace.len(), 32);
        assert_eq!(store.get(Key::ConsumptionDensity), "Datos inválidos");
        assert_eq!(store.get(Key::DieselAerators), "Error");
        assert!(!store.contains(Key::AgeDays));
        assert_eq!(trace.records[0].status, StepStatus::Skipped);
    }
}
