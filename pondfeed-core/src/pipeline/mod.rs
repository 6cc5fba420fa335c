//! The ordered feeding calculation.
//!
//! Each [`Step`] reads earlier values from the [`ValueStore`](crate::store::ValueStore)
//! and writes exactly one key. Order is data: [`steps::STEPS`] is the single
//! source of truth, and [`CalculationPipeline::validate_order`] rejects a
//! table in which a step reads a key nothing has produced yet.

pub mod builder;
pub mod engine;
pub mod steps;

pub use builder::PipelineBuilder;
pub use engine::{CalculationPipeline, RunTrace, StepRecord, StepStatus};
pub use steps::{Step, StepContext, StepOutcome, StepValue};
