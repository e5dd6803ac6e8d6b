use std::time::Duration;

use crossbeam::channel::unbounded;
use tracing::debug;

use super::runner::{ImageJob, JobOutcome, JobRunner};
use crate::error::{JobError, ResourceError};
use crate::parallel::run_scoped;

/// Outcomes of a run plus the summed elapsed time.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One entry per job, ordered by job index.
    pub outcomes: Vec<JobOutcome>,
    pub total_elapsed: Duration,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Run every job on its own thread and gather the outcomes.
///
/// Runners report back over a channel; the calling thread is the only one
/// that touches the running total. `on_outcome` sees each outcome as it
/// arrives, in completion order. One job failing, panicking or failing to
/// start never affects the others.
pub fn run_jobs<F>(jobs: Vec<ImageJob>, runner: &JobRunner, mut on_outcome: F) -> RunSummary
where
    F: FnMut(&JobOutcome),
{
    let total_jobs = jobs.len();
    if total_jobs == 0 {
        return RunSummary::default();
    }

    let (outcome_tx, outcome_rx) = unbounded::<JobOutcome>();
    let pending = jobs.clone();
    let mut expected: Vec<ImageJob> = jobs.clone();

    let collected = crossbeam::thread::scope(|s| {
        // Producer: fan out one runner per job, then report the runners that
        // never produced an outcome.
        let producer = s.spawn(move |_| {
            let tx = &outcome_tx;
            let results = run_scoped("laplace-job", jobs, |job| {
                // The collector outlives every runner, so a send cannot fail.
                let _ = tx.send(runner.run(job));
            });
            for (job, result) in pending.into_iter().zip(results) {
                if let Err(source) = result {
                    let _ = tx.send(JobOutcome {
                        result: Err(JobError::Resource {
                            path: job.input.clone(),
                            source,
                        }),
                        job,
                    });
                }
            }
        });

        // Collector: owns the total
        let mut total_elapsed = Duration::ZERO;
        let mut outcomes = Vec::with_capacity(total_jobs);
        for outcome in outcome_rx.iter() {
            on_outcome(&outcome);
            total_elapsed += outcome.elapsed();
            outcomes.push(outcome);
        }

        if producer.join().is_err() {
            debug!("job producer thread panicked");
        }
        (outcomes, total_elapsed)
    });

    let (mut outcomes, total_elapsed) = collected.unwrap_or_default();

    // Anything still missing lost its runner without a word.
    expected.retain(|job| !outcomes.iter().any(|o| o.job.index == job.index));
    for job in expected {
        let outcome = JobOutcome {
            result: Err(JobError::Resource {
                path: job.input.clone(),
                source: ResourceError::Join {
                    worker: job.index - 1,
                },
            }),
            job,
        };
        on_outcome(&outcome);
        outcomes.push(outcome);
    }
    outcomes.sort_by_key(|o| o.job.index);

    RunSummary {
        outcomes,
        total_elapsed,
    }
}
