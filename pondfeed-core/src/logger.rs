use crate::{
    error::PondfeedError,
    pipeline::{RunTrace, StepStatus},
};
use csv::Writer;
use serde::Serialize;
use std::fs;
use std::io;

#[derive(Debug, Serialize)]
struct TraceEntry<'a> {
    farm: &'a str,
    order: usize,
    step: &'a str,
    key: &'a str,
    status: &'static str,
    value: &'a str,
}

/// Appends one CSV row per executed pipeline step.
pub struct StepTraceLogger {
    path: String,
    writer: Writer<fs::File>,
}

impl StepTraceLogger {
    pub fn new(path: &str) -> Result<Self, io::Error> {
        let writer = Writer::from_path(path)?;
        Ok(Self {
            path: path.to_string(),
            writer,
        })
    }

    pub fn log_trace(&mut self, farm: &str, trace: &RunTrace) -> Result<(), PondfeedError> {
        for record in &trace.records {
            let entry = TraceEntry {
                farm,
                order: record.order,
                step: record.name,
                key: record.key.as_str(),
                status: status_label(record.status),
                value: &record.rendered,
            };
            self.writer
                .serialize(entry)
                .map_err(|e| PondfeedError::CsvError(self.path.clone(), e))?;
        }
        self.writer
            .flush()
            .map_err(|e| PondfeedError::FileIO(self.path.clone(), e))?;
        Ok(())
    }
}

fn status_label(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Computed => "computed",
        StepStatus::Failed(_) => "failed",
        StepStatus::Skipped => "skipped",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StepError;
    use crate::pipeline::StepRecord;
    use crate::store::Key;
    use tempfile::tempdir;

    fn create_test_trace() -> RunTrace {
        RunTrace {
            records: vec![
                StepRecord {
                    order: 1,
                    name: "age",
                    key: Key::AgeDays,
                    status: StepStatus::Computed,
                    rendered: "62".to_string(),
                },
                StepRecord {
                    order: 2,
                    name: "weekly_cumulative",
                    key: Key::WeeklyCumulative,
                    status: StepStatus::Failed(StepError::InvalidInput),
                    rendered: "Datos inválidos".to_string(),
                },
            ],
        }
    }

    #[test]
    fn writes_header_and_one_row_per_step() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trace.csv");
        let path_str = path.to_str().unwrap();

        let mut logger = StepTraceLogger::new(path_str).unwrap();
        logger.log_trace("CAMANOVILLO", &create_test_trace()).unwrap();
        logger.log_trace("OTRA", &create_test_trace()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "farm,order,step,key,status,value");
        assert_eq!(lines[1], "CAMANOVILLO,1,age,edad_cultivo,computed,62");
        assert!(lines[2].ends_with("failed,Datos inválidos"));
        assert!(lines[3].starts_with("OTRA,1,"));
    }
}
