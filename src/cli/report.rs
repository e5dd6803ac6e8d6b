//! Run report formatting

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::jobs::{ImageJob, JobReport, RunSummary};

pub fn threads_line(threads: usize) -> String {
    format!("Laplacian threads: {threads}")
}

pub fn outcome_line(job: &ImageJob, report: &JobReport) -> String {
    format!(
        "Input image: {}, Output image: {}, Elapsed time: {:.4}",
        job.input.display(),
        job.output.display(),
        report.elapsed.as_secs_f64()
    )
}

pub fn total_line(total: Duration) -> String {
    format!("Total elapsed time: {:.4}", total.as_secs_f64())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    Ok,
    Failed,
}

/// Machine-readable report for `--format json`.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub threads: usize,
    pub images: Vec<ImageEntry>,
    pub total_elapsed_seconds: f64,
}

#[derive(Debug, Serialize)]
pub struct ImageEntry {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: ImageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    pub elapsed_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JsonReport {
    pub fn new(threads: usize, summary: &RunSummary) -> Self {
        let images = summary
            .outcomes
            .iter()
            .map(|outcome| {
                let (status, report, error) = match &outcome.result {
                    Ok(report) => (ImageStatus::Ok, Some(report), None),
                    Err(err) => (ImageStatus::Failed, None, Some(err.to_string())),
                };
                ImageEntry {
                    input: outcome.job.input.clone(),
                    output: outcome.job.output.clone(),
                    status,
                    width: report.map(|r| r.width),
                    height: report.map(|r| r.height),
                    workers: report.map(|r| r.workers),
                    elapsed_seconds: outcome.elapsed().as_secs_f64(),
                    error,
                }
            })
            .collect();

        Self {
            threads,
            images,
            total_elapsed_seconds: summary.total_elapsed.as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, JobError};
    use crate::jobs::JobOutcome;

    fn job(index: usize) -> ImageJob {
        ImageJob {
            index,
            input: PathBuf::from(format!("in{index}.ppm")),
            output: PathBuf::from(format!("laplacian{index}.ppm")),
        }
    }

    #[test]
    fn test_text_lines() {
        assert_eq!(threads_line(4), "Laplacian threads: 4");
        let report = JobReport {
            width: 2,
            height: 2,
            workers: 2,
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(
            outcome_line(&job(1), &report),
            "Input image: in1.ppm, Output image: laplacian1.ppm, Elapsed time: 1.5000"
        );
        assert_eq!(
            total_line(Duration::from_micros(12_345)),
            "Total elapsed time: 0.0123"
        );
    }

    #[test]
    fn test_json_report_marks_failures() {
        let summary = RunSummary {
            outcomes: vec![
                JobOutcome {
                    job: job(1),
                    result: Ok(JobReport {
                        width: 3,
                        height: 4,
                        workers: 4,
                        elapsed: Duration::from_millis(250),
                    }),
                },
                JobOutcome {
                    job: job(2),
                    result: Err(JobError::Decode {
                        path: PathBuf::from("in2.ppm"),
                        source: DecodeError::UnsupportedMaxValue(65535),
                    }),
                },
            ],
            total_elapsed: Duration::from_millis(250),
        };

        let value = serde_json::to_value(JsonReport::new(4, &summary)).unwrap();
        assert_eq!(value["threads"], 4);
        assert_eq!(value["total_elapsed_seconds"], 0.25);
        assert_eq!(value["images"][0]["status"], "ok");
        assert_eq!(value["images"][0]["height"], 4);
        assert!(value["images"][0].get("error").is_none());
        assert_eq!(value["images"][1]["status"], "failed");
        assert_eq!(value["images"][1]["elapsed_seconds"], 0.0);
        assert!(
            value["images"][1]["error"]
                .as_str()
                .unwrap()
                .contains("in2.ppm")
        );
    }
}
