//! Command-line interface for laplace
//!
//! This module provides the CLI definition and drives a run: it sets up
//! logging, resolves configuration, hands the files to the job layer and
//! reports what happened. Per-file failures are reported, not returned, so a
//! run that started always exits successfully.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::config::{ConfigOverrides, LaplaceConfig};
use crate::filter::ParallelConvolutionEngine;
use crate::jobs::{JobOutcome, JobRunner, run_jobs};
use crate::parallel::resolve_thread_count;

mod output;
pub mod report;

pub use output::Output;

/// Laplacian edge detection for P6 images
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input images (binary P6 PPM)
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Worker threads per image (0 = one per CPU core)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Directory to write filtered images to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output file name prefix
    #[arg(long, value_name = "NAME")]
    pub prefix: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors and the final total
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Execute a run over every input file
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        let overrides = ConfigOverrides {
            threads: self.threads,
            output_dir: self.output_dir.clone(),
            prefix: self.prefix.clone(),
        };
        let config = LaplaceConfig::load_with(self.config.as_deref(), overrides)?;

        let threads = resolve_thread_count(config.filter.threads);
        let naming = config.naming();
        std::fs::create_dir_all(&naming.directory).with_context(|| {
            format!(
                "Failed to create output directory {}",
                naming.directory.display()
            )
        })?;

        let mut runner = JobRunner::new(ParallelConvolutionEngine::new(threads));
        if let Some(comment) = config.comment() {
            runner = runner.with_comment(comment);
        }
        let jobs = naming.jobs(&self.files);
        tracing::info!("processing {} file(s) with {} thread(s)", jobs.len(), threads);

        let format = self.format;
        if format == OutputFormat::Text {
            output.line(&report::threads_line(threads));
        }

        let summary = tokio::task::spawn_blocking(move || {
            run_jobs(jobs, &runner, |outcome| {
                if format == OutputFormat::Text {
                    print_outcome(&output, outcome);
                }
            })
        })
        .await
        .context("Image jobs did not complete")?;

        match format {
            OutputFormat::Text => {
                output.verbose(&format!(
                    "{} succeeded, {} failed",
                    summary.succeeded(),
                    summary.failed()
                ));
                output.always(&report::total_line(summary.total_elapsed));
            }
            OutputFormat::Json => {
                let document = report::JsonReport::new(threads, &summary);
                let json = serde_json::to_string_pretty(&document)
                    .context("Failed to serialize report")?;
                output.always(&json);
            }
        }

        Ok(())
    }
}

fn print_outcome(output: &Output, outcome: &JobOutcome) {
    match &outcome.result {
        Ok(report) => output.line(&report::outcome_line(&outcome.job, report)),
        Err(err) => output.error(&err.to_string()),
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Results own stdout; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
