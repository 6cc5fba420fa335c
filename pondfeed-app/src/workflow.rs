use crate::plotting;
use anyhow::{Context, Result};
use chrono::Local;
use pondfeed_core::{diagnostics::DiagnosticAnalyzer, logger::StepTraceLogger, report, FeedingService};
use pondfeed_schemas::{
    analysis::Analysis,
    record::ResultRecord,
    response::{FeedingReport, FeedingResponse},
    sample::Sample,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub struct RunOptions {
    pub output_dir: PathBuf,
    pub trace: bool,
    pub plots: bool,
}

#[derive(Debug)]
pub struct RunSummary {
    pub run_dir: PathBuf,
    pub succeeded: usize,
    pub failed: usize,
}

/// On-disk form of one analysis.
#[derive(Serialize)]
struct SavedAnalysis<'a> {
    fecha_analisis: String,
    resultados: &'a ResultRecord,
    analisis: &'a Analysis,
}

/// Processes every sample, printing each report and saving its artifacts in
/// a fresh timestamped folder under the output directory.
pub fn run_samples(service: &FeedingService, samples: &[Sample], options: &RunOptions) -> Result<RunSummary> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let run_dir = options.output_dir.join(format!("run_{stamp}"));
    fs::create_dir_all(&run_dir).with_context(|| format!("Failed to create output directory: {:?}", run_dir))?;

    let mut trace_logger = if options.trace {
        let path = run_dir.join("step_trace.csv");
        let path_str = path.to_str().context("Output path is not valid UTF-8")?;
        Some(StepTraceLogger::new(path_str).with_context(|| format!("Failed to create trace file {:?}", path))?)
    } else {
        None
    };

    let mut summary = RunSummary {
        run_dir: run_dir.clone(),
        succeeded: 0,
        failed: 0,
    };

    for (index, sample) in samples.iter().enumerate() {
        let (response, trace) = service.process_traced(sample);
        if let Some(logger) = trace_logger.as_mut() {
            logger.log_trace(&sample.farm, &trace)?;
        }

        let response_path = run_dir.join(format!("respuesta_{index:02}.json"));
        fs::write(&response_path, serde_json::to_string_pretty(&response)?)
            .with_context(|| format!("Failed to write {:?}", response_path))?;

        match response {
            FeedingResponse::Success(feeding) => {
                print_report(&feeding);
                save_analysis(&run_dir, &stamp, index, &feeding)?;
                if options.plots {
                    let prefix = format!("{index:02}");
                    plotting::generate_all_plots(&run_dir, &prefix, &feeding.results)?;
                }
                summary.succeeded += 1;
            }
            FeedingResponse::Error(failure) => {
                warn!(farm = %failure.farm, error = %failure.error, "sample skipped");
                println!("{}", failure.message);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

fn print_report(feeding: &FeedingReport) {
    let r = &feeding.results;
    println!("\n=== {} / piscina {} ===", feeding.farm, r.pond);
    println!(
        "Edad: {} días | Peso: {:.2} g | Crecimiento: {:.2} g/día",
        r.age_days, r.current_weight, r.growth_rate
    );
    println!(
        "Ración semanal (kg): L {} M {} X {} J {} V {} S {} D {}",
        r.monday, r.tuesday, r.wednesday, r.thursday, r.friday, r.saturday, r.sunday
    );
    println!("Biomasa campo: {} lbs | FCA campo: {}", r.total_lbs_field, r.fca_field);

    let text = report::generate_report(&feeding.analysis);
    if text.is_empty() {
        println!("\nSin hallazgos.");
    } else {
        println!("\n{text}");
    }
}

fn save_analysis(run_dir: &Path, stamp: &str, index: usize, feeding: &FeedingReport) -> Result<PathBuf> {
    let saved = SavedAnalysis {
        fecha_analisis: Local::now().to_rfc3339(),
        resultados: &feeding.results,
        analisis: &feeding.analysis,
    };
    let path = run_dir.join(format!("analisis_{stamp}_{index:02}.json"));
    fs::write(&path, serde_json::to_string_pretty(&saved)?).with_context(|| format!("Failed to write {:?}", path))?;
    info!(path = %path.display(), "analysis saved");
    Ok(path)
}

/// Analyzes a previously saved record. Accepts a saved analysis or a
/// response envelope (both keep the record under `resultados`) or a bare
/// record.
pub fn analyze_saved(path: &Path, analyzer: &DiagnosticAnalyzer) -> Result<Analysis> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let value: Value = serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON from {:?}", path))?;
    let record = extract_record(&value).with_context(|| format!("No result record found in {:?}", path))?;
    Ok(analyzer.analyze_map(record))
}

fn extract_record(value: &Value) -> Option<&Map<String, Value>> {
    let map = value.as_object()?;
    match map.get("resultados") {
        Some(Value::Object(inner)) => Some(inner),
        _ => Some(map),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn create_test_sample() -> Sample {
        serde_json::from_value(json!({
            "finca": "CAMANOVILLO",
            "Hectareas": 7.8,
            "Piscinas": 5,
            "Fechadesiembra": "10/10/2024",
            "Fechademuestreo": "10/12/2024",
            "Pesoanterior": 23.33,
            "Pesoactualgdia": 30,
            "Densidadbiologoindm2": 11,
            "AcumuladoactualLBS": 55042,
            "numeroAA": 4,
            "Aireadores": 8,
            "Alimentoactualkg": 614
        }))
        .unwrap()
    }

    #[test]
    fn run_writes_analysis_response_and_trace() {
        let dir = tempdir().unwrap();
        let service = FeedingService::with_defaults().unwrap();
        let options = RunOptions {
            output_dir: dir.path().to_path_buf(),
            trace: true,
            plots: false,
        };

        let mut rejected = create_test_sample();
        rejected.farm = String::new();
        let summary = run_samples(&service, &[create_test_sample(), rejected], &options).unwrap();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);

        let names: Vec<String> = fs::read_dir(&summary.run_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().any(|n| n.starts_with("analisis_") && n.ends_with("_00.json")));
        assert!(names.contains(&"respuesta_01.json".to_string()));

        let trace = fs::read_to_string(summary.run_dir.join("step_trace.csv")).unwrap();
        assert_eq!(trace.lines().count(), 33);
    }

    #[test]
    fn saved_analysis_can_be_reanalyzed() {
        let dir = tempdir().unwrap();
        let service = FeedingService::with_defaults().unwrap();
        let FeedingResponse::Success(feeding) = service.process(&create_test_sample()) else {
            panic!("expected success");
        };

        let path = save_analysis(dir.path(), "20241210_120000", 0, &feeding).unwrap();
        let analysis = analyze_saved(&path, service.analyzer()).unwrap();
        assert_eq!(analysis, feeding.analysis);
    }

    #[test]
    fn bare_record_is_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("record.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(br#"{"crecim_actual_gdia": 0.3, "fca_campo": "1.00"}"#).unwrap();

        let analysis = analyze_saved(&path, &DiagnosticAnalyzer::default()).unwrap();
        assert_eq!(analysis.problems.len(), 1);
        assert_eq!(analysis.recommendations.len(), 1);
    }
}
