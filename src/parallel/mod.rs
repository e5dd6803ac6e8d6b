//! Structured parallel execution
//!
//! This module provides the thread plumbing shared by the convolution engine
//! (one worker per row range) and the job layer (one runner per input file).
//!
//! # Architecture Responsibilities
//!
//! ## What This Module Does:
//! - **Resource Discovery**: Resolves a configured thread count, using `num_cpus::get()` when it is 0
//! - **Fan-out**: Runs one named scoped thread per work item with `crossbeam::thread::scope`
//! - **Barrier**: Joins every thread before returning, so nothing outlives the call
//! - **Isolation**: Turns spawn failures and panics into per-item `ResourceError`s
//!
//! ## What This Module Does NOT Do:
//! - **Domain Logic**: Does not know about images, rows, or files
//! - **Work Splitting**: Callers decide how many items there are and what each one covers
//!
//! # Example Usage
//!
//! ```rust
//! use laplace::parallel::run_scoped;
//!
//! let mut data = vec![0u32; 4];
//! let (left, right) = data.split_at_mut(2);
//! let results = run_scoped("fill", vec![(1, left), (2, right)], |(value, chunk)| {
//!     chunk.fill(value);
//! });
//! assert!(results.iter().all(Result::is_ok));
//! assert_eq!(data, vec![1, 1, 2, 2]);
//! ```

pub mod processor;

pub use processor::{resolve_thread_count, run_scoped};
