//! # laplace - parallel Laplacian edge detection
//!
//! Applies the 3×3 Laplacian kernel to binary P6 images. Each image's rows
//! are split into contiguous slices that worker threads filter in parallel,
//! and several input files are processed at the same time.
//!
//! ## Features
//!
//! - **Deterministic output**: results are bit-identical for any thread count
//! - **Wrap-around edges**: border pixels sample the opposite edge
//! - **Per-file isolation**: one bad file never stops the others
//! - **Layered configuration**: defaults, config files, environment, flags
//!
//! ## Quick Start
//!
//! ```bash
//! # Filter two images with 8 workers each
//! laplace -t 8 photo.ppm scan.ppm
//!
//! # Write results elsewhere and get a JSON report
//! laplace -o out --format json photo.ppm
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod image;
pub mod jobs;
pub mod parallel;

pub use cli::{Cli, Output};
pub use config::LaplaceConfig;
pub use error::{BufferError, DecodeError, EncodeError, JobError, ResourceError};
pub use filter::{Filtered, LAPLACIAN, ParallelConvolutionEngine};
pub use image::{Pixel, PixelBuffer};
pub use jobs::{RunSummary, run_jobs};

/// Result type alias for laplace operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
