//! Per-file image jobs
//!
//! Every input file gets its own runner thread that decodes it, filters it
//! with the shared [`ParallelConvolutionEngine`](crate::filter::ParallelConvolutionEngine)
//! and writes the result. Failures stay local to their file; the run total
//! only counts time from jobs that produced a filtered image.

pub mod aggregate;
pub mod runner;

pub use aggregate::{RunSummary, run_jobs};
pub use runner::{ImageJob, JobOutcome, JobReport, JobRunner, OutputNaming};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JobError;
    use crate::filter::ParallelConvolutionEngine;
    use crate::image::{Pixel, PixelBuffer, read_image, write_image};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_checker(path: &Path, width: usize, height: usize) {
        let image = PixelBuffer::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Pixel::gray(200)
            } else {
                Pixel::gray(30)
            }
        })
        .unwrap();
        write_image(&image, None, path).unwrap();
    }

    #[test]
    fn test_failed_file_is_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let valid = temp_dir.path().join("valid.ppm");
        let missing = temp_dir.path().join("missing.ppm");
        let valid2 = temp_dir.path().join("valid2.ppm");
        write_checker(&valid, 8, 6);
        write_checker(&valid2, 5, 9);

        let naming = OutputNaming {
            directory: temp_dir.path().to_path_buf(),
            prefix: "laplacian".to_string(),
        };
        let jobs = naming.jobs([&valid, &missing, &valid2]);
        let runner = JobRunner::new(ParallelConvolutionEngine::new(3));

        let mut seen = 0;
        let summary = run_jobs(jobs, &runner, |_| seen += 1);

        assert_eq!(seen, 3);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);

        let indices: Vec<usize> = summary.outcomes.iter().map(|o| o.job.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);

        assert!(temp_dir.path().join("laplacian1.ppm").exists());
        assert!(!temp_dir.path().join("laplacian2.ppm").exists());
        assert!(temp_dir.path().join("laplacian3.ppm").exists());

        match &summary.outcomes[1].result {
            Err(err @ JobError::Decode { .. }) => {
                assert_eq!(err.path(), missing.as_path());
                assert!(err.to_string().contains("missing.ppm"));
            }
            other => panic!("expected decode failure, got {other:?}"),
        }

        let successful: std::time::Duration = summary
            .outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.elapsed)
            .sum();
        assert_eq!(summary.total_elapsed, successful);
    }

    #[test]
    fn test_concurrent_jobs_match_single_threaded_output() {
        let temp_dir = TempDir::new().unwrap();
        let inputs: Vec<_> = (0..4)
            .map(|i| {
                let path = temp_dir.path().join(format!("in{i}.ppm"));
                write_checker(&path, 7 + i, 5 + 2 * i);
                path
            })
            .collect();

        let naming = OutputNaming {
            directory: temp_dir.path().to_path_buf(),
            prefix: "out".to_string(),
        };
        let runner = JobRunner::new(ParallelConvolutionEngine::new(4));
        let summary = run_jobs(naming.jobs(&inputs), &runner, |_| {});
        assert_eq!(summary.succeeded(), 4);

        let serial = ParallelConvolutionEngine::new(1);
        for outcome in &summary.outcomes {
            let source = read_image(&outcome.job.input).unwrap();
            let expected = serial.apply(&source).unwrap().image;
            assert_eq!(read_image(&outcome.job.output).unwrap(), expected);
        }
    }

    #[test]
    fn test_no_jobs() {
        let summary = run_jobs(Vec::new(), &JobRunner::default(), |_| {});
        assert!(summary.outcomes.is_empty());
        assert_eq!(summary.total_elapsed, std::time::Duration::ZERO);
    }
}
