//! Parallel Laplacian convolution
//!
//! The engine splits an image's rows into contiguous ranges
//! ([`partition_rows`]), runs [`convolve_rows`] for each range on its own
//! thread against the shared read-only source, and joins them before
//! handing back the filtered image. Each worker owns a disjoint slice of the
//! destination, so no locking is involved and the output does not depend on
//! how many workers ran.

pub mod engine;
pub mod kernel;
pub mod partition;
pub mod worker;

pub use engine::{DEFAULT_THREADS, Filtered, ParallelConvolutionEngine};
pub use kernel::{Kernel, LAPLACIAN};
pub use partition::{RowRange, effective_threads, partition_rows};
pub use worker::convolve_rows;
