//! Serde data contracts shared by the feeding pipeline, the analyzer and the CLI.

pub mod analysis;
pub mod file_formats;
pub mod options;
pub mod record;
pub mod reference;
pub mod response;
pub mod sample;
pub mod thresholds;
