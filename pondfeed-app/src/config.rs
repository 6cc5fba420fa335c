use anyhow::{Context, Result};
use pondfeed_core::{config, reference::ReferenceData};
use pondfeed_schemas::{
    file_formats::SettingsFile,
    sample::{Sample, SampleFile},
};
use std::path::Path;
use tracing::{info, warn};

/// Everything loaded from disk before any sample is processed.
pub struct AppConfig {
    pub reference: ReferenceData,
    pub settings: SettingsFile,
}

impl AppConfig {
    pub fn load(reference_dir: Option<&Path>, settings: Option<&Path>) -> Result<Self> {
        let reference = match reference_dir {
            Some(dir) => config::load_reference_dir(dir)
                .with_context(|| format!("Failed to load reference data from {:?}", dir))?,
            None => {
                warn!("no reference directory given, using built-in example tables");
                ReferenceData::fallback()
            }
        };

        Ok(Self {
            reference,
            settings: load_settings(settings)?,
        })
    }
}

/// Defaults when no settings file is given.
pub fn load_settings(path: Option<&Path>) -> Result<SettingsFile> {
    match path {
        Some(path) => config::load_settings(path)
            .with_context(|| format!("Failed to load settings from {:?}", path)),
        None => Ok(SettingsFile::default()),
    }
}

pub fn load_samples(path: &Path) -> Result<Vec<Sample>> {
    let file: SampleFile = config::load_document(path)
        .with_context(|| format!("Failed to read samples from {:?}", path))?;
    let samples = file.into_samples();
    info!(count = samples.len(), "samples loaded");
    Ok(samples)
}
