use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::JobError;
use crate::filter::ParallelConvolutionEngine;
use crate::image::{read_image, write_image};

/// One input file and where its filtered copy goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    /// 1-based position of the file on the command line.
    pub index: usize,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Derives output paths as `<directory>/<prefix><index>.ppm`.
#[derive(Debug, Clone)]
pub struct OutputNaming {
    pub directory: PathBuf,
    pub prefix: String,
}

impl Default for OutputNaming {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            prefix: "laplacian".to_string(),
        }
    }
}

impl OutputNaming {
    pub fn output_for(&self, index: usize) -> PathBuf {
        self.directory.join(format!("{}{}.ppm", self.prefix, index))
    }

    /// Jobs for `inputs`, numbered from 1 in argument order.
    pub fn jobs<I, P>(&self, inputs: I) -> Vec<ImageJob>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        inputs
            .into_iter()
            .enumerate()
            .map(|(i, input)| ImageJob {
                index: i + 1,
                input: input.as_ref().to_path_buf(),
                output: self.output_for(i + 1),
            })
            .collect()
    }
}

/// Result of a job that filtered its image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub width: usize,
    pub height: usize,
    pub workers: usize,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct JobOutcome {
    pub job: ImageJob,
    pub result: Result<JobReport, JobError>,
}

impl JobOutcome {
    /// Time this job adds to the run total.
    ///
    /// A decode or resource failure adds nothing; a job whose image was
    /// filtered adds its engine time even if writing the result failed.
    pub fn elapsed(&self) -> Duration {
        match &self.result {
            Ok(report) => report.elapsed,
            Err(err) => err.elapsed(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Decodes, filters and writes one image.
#[derive(Debug, Clone, Default)]
pub struct JobRunner {
    engine: ParallelConvolutionEngine,
    comment: Option<String>,
}

impl JobRunner {
    pub fn new(engine: ParallelConvolutionEngine) -> Self {
        Self {
            engine,
            comment: None,
        }
    }

    /// Comment line written into every output header.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = (!comment.is_empty()).then_some(comment);
        self
    }

    pub fn run(&self, job: ImageJob) -> JobOutcome {
        let result = self.process(&job);
        if let Err(err) = &result {
            debug!("job {} failed: {}", job.index, err);
        }
        JobOutcome { job, result }
    }

    fn process(&self, job: &ImageJob) -> Result<JobReport, JobError> {
        debug!("decoding {}", job.input.display());
        let source = read_image(&job.input).map_err(|source| JobError::Decode {
            path: job.input.clone(),
            source,
        })?;

        let filtered = self
            .engine
            .apply(&source)
            .map_err(|source| JobError::Resource {
                path: job.input.clone(),
                source,
            })?;
        drop(source);

        debug!(
            "writing {} ({:.4}s in {} workers)",
            job.output.display(),
            filtered.elapsed.as_secs_f64(),
            filtered.workers
        );
        write_image(&filtered.image, self.comment.as_deref(), &job.output).map_err(|source| {
            JobError::Encode {
                path: job.output.clone(),
                elapsed: filtered.elapsed,
                source,
            }
        })?;

        Ok(JobReport {
            width: filtered.image.width(),
            height: filtered.image.height(),
            workers: filtered.workers,
            elapsed: filtered.elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, EncodeError};
    use crate::image::{Pixel, PixelBuffer};
    use tempfile::TempDir;

    fn write_gray(path: &Path, width: usize, height: usize, value: u8) {
        let image = PixelBuffer::filled(width, height, Pixel::gray(value)).unwrap();
        write_image(&image, None, path).unwrap();
    }

    #[test]
    fn test_output_naming() {
        let naming = OutputNaming {
            directory: PathBuf::from("out"),
            prefix: "edge".to_string(),
        };
        let jobs = naming.jobs(["a.ppm", "b.ppm"]);
        assert_eq!(jobs[0].index, 1);
        assert_eq!(jobs[1].output, PathBuf::from("out").join("edge2.ppm"));
        assert_eq!(jobs[1].input, PathBuf::from("b.ppm"));
    }

    #[test]
    fn test_successful_job_writes_filtered_image() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("gray.ppm");
        write_gray(&input, 4, 4, 128);
        let job = ImageJob {
            index: 1,
            input,
            output: temp_dir.path().join("laplacian1.ppm"),
        };

        let outcome = JobRunner::new(ParallelConvolutionEngine::new(4)).run(job);
        let report = outcome.result.as_ref().unwrap();
        assert_eq!((report.width, report.height, report.workers), (4, 4, 4));
        assert_eq!(outcome.elapsed(), report.elapsed);

        let written = read_image(&outcome.job.output).unwrap();
        assert!(written.pixels().iter().all(|p| *p == Pixel::BLACK));
    }

    #[test]
    fn test_missing_input_contributes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let job = ImageJob {
            index: 2,
            input: temp_dir.path().join("missing.ppm"),
            output: temp_dir.path().join("laplacian2.ppm"),
        };

        let outcome = JobRunner::default().run(job);
        assert!(matches!(
            outcome.result,
            Err(JobError::Decode {
                source: DecodeError::Io(_),
                ..
            })
        ));
        assert_eq!(outcome.elapsed(), Duration::ZERO);
        assert!(!outcome.job.output.exists());
    }

    #[test]
    fn test_encode_failure_keeps_elapsed_time() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in.ppm");
        write_gray(&input, 3, 3, 10);
        let job = ImageJob {
            index: 1,
            input,
            output: temp_dir.path().join("no-such-dir").join("out.ppm"),
        };

        let outcome = JobRunner::default().with_comment("x").run(job);
        match &outcome.result {
            Err(JobError::Encode {
                path,
                elapsed,
                source: EncodeError::Create(_),
            }) => {
                assert_eq!(path, &outcome.job.output);
                assert_eq!(outcome.elapsed(), *elapsed);
            }
            other => panic!("expected encode failure, got {other:?}"),
        }
    }
}
