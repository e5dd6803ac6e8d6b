use std::time::{Duration, Instant};

use tracing::debug;

use super::kernel::{Kernel, LAPLACIAN};
use super::partition::{RowRange, partition_rows};
use super::worker::convolve_rows;
use crate::error::ResourceError;
use crate::image::{Pixel, PixelBuffer};
use crate::parallel::run_scoped;

/// Default number of row workers per image.
pub const DEFAULT_THREADS: usize = 4;

/// Output of one engine run.
#[derive(Debug, Clone)]
pub struct Filtered {
    pub image: PixelBuffer,
    /// Wall-clock time from start of `apply` until all workers joined.
    pub elapsed: Duration,
    /// Number of row workers that ran.
    pub workers: usize,
}

/// Applies the Laplacian kernel to an image with a fixed pool of row workers.
#[derive(Debug, Clone)]
pub struct ParallelConvolutionEngine {
    threads: usize,
    kernel: Kernel,
}

impl Default for ParallelConvolutionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_THREADS)
    }
}

impl ParallelConvolutionEngine {
    /// Engine using up to `threads` workers per image (at least one).
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
            kernel: LAPLACIAN,
        }
    }

    /// Configured thread count; an image with fewer rows uses fewer workers.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Filter `source`, splitting its rows between workers.
    ///
    /// Returns only once every worker has finished. If any worker fails to
    /// start or panics the whole image is abandoned and no partial buffer
    /// is returned.
    pub fn apply(&self, source: &PixelBuffer) -> Result<Filtered, ResourceError> {
        let start = Instant::now();
        let (width, height) = (source.width(), source.height());

        let mut pixels = vec![Pixel::BLACK; source.len()];
        let ranges = partition_rows(height, self.threads);
        let workers = ranges.len();
        debug!(
            "filtering {}x{} image with {} workers: {:?}",
            width, height, workers, ranges
        );

        let slices = split_by_ranges(&mut pixels, width, &ranges);
        let kernel = &self.kernel;
        run_scoped("laplace-worker", slices, |(range, rows)| {
            convolve_rows(kernel, source, range, rows)
        })
        .into_iter()
        .collect::<Result<Vec<()>, ResourceError>>()?;

        let elapsed = start.elapsed();
        Ok(Filtered {
            image: PixelBuffer::from_parts(width, height, pixels),
            elapsed,
            workers,
        })
    }
}

/// Carve the destination into one disjoint mutable slice per range.
fn split_by_ranges<'a>(
    mut pixels: &'a mut [Pixel],
    width: usize,
    ranges: &[RowRange],
) -> Vec<(RowRange, &'a mut [Pixel])> {
    let mut slices = Vec::with_capacity(ranges.len());
    for &range in ranges {
        let (rows, rest) = std::mem::take(&mut pixels).split_at_mut(range.count * width);
        slices.push((range, rows));
        pixels = rest;
    }
    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct transcription of the per-pixel rule with signed wrap-around.
    fn reference(source: &PixelBuffer) -> PixelBuffer {
        let (w, h) = (source.width() as i64, source.height() as i64);
        let weights = [[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]];
        PixelBuffer::from_fn(source.width(), source.height(), |x, y| {
            let mut sum = [0i64; 3];
            for fy in 0..3i64 {
                for fx in 0..3i64 {
                    let sx = (x as i64 - 1 + fx).rem_euclid(w) as usize;
                    let sy = (y as i64 - 1 + fy).rem_euclid(h) as usize;
                    let p = source.at(sx, sy);
                    let k = weights[fy as usize][fx as usize];
                    sum[0] += i64::from(p.r) * k;
                    sum[1] += i64::from(p.g) * k;
                    sum[2] += i64::from(p.b) * k;
                }
            }
            let c = |v: i64| v.clamp(0, 255) as u8;
            Pixel::new(c(sum[0]), c(sum[1]), c(sum[2]))
        })
        .unwrap()
    }

    fn textured(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            let seed = (x * 7919 + y * 104_729) ^ (x * y * 31);
            Pixel::new(
                (seed % 251) as u8,
                ((seed / 3) % 256) as u8,
                ((x * 37 + y * 11) % 256) as u8,
            )
        })
        .unwrap()
    }

    #[test]
    fn test_uniform_gray_is_black_for_any_thread_count() {
        let source = PixelBuffer::filled(4, 4, Pixel::gray(128)).unwrap();
        for threads in 1..=4 {
            let filtered = ParallelConvolutionEngine::new(threads).apply(&source).unwrap();
            assert!(
                filtered.image.pixels().iter().all(|p| *p == Pixel::BLACK),
                "non-black output with {threads} threads"
            );
            assert_eq!(filtered.workers, threads);
        }
    }

    #[test]
    fn test_output_independent_of_thread_count() {
        let source = textured(9, 13);
        let expected = reference(&source);
        for threads in 1..=source.height() {
            let filtered = ParallelConvolutionEngine::new(threads).apply(&source).unwrap();
            assert_eq!(filtered.image, expected, "mismatch with {threads} threads");
        }
    }

    #[test]
    fn test_workers_capped_at_height() {
        let source = textured(5, 2);
        let filtered = ParallelConvolutionEngine::new(16).apply(&source).unwrap();
        assert_eq!(filtered.workers, 2);
        assert_eq!(filtered.image, reference(&source));
    }

    #[test]
    fn test_thread_count_is_at_least_one() {
        assert_eq!(ParallelConvolutionEngine::new(0).threads(), 1);
        assert_eq!(ParallelConvolutionEngine::default().threads(), DEFAULT_THREADS);
    }

    #[test]
    fn test_preserves_dimensions() {
        let source = textured(1, 7);
        let filtered = ParallelConvolutionEngine::default().apply(&source).unwrap();
        assert_eq!((filtered.image.width(), filtered.image.height()), (1, 7));
        assert_eq!(filtered.image, reference(&source));
    }

    #[test]
    fn test_split_by_ranges_is_disjoint_and_complete() {
        let mut pixels = vec![Pixel::BLACK; 3 * 10];
        let ranges = partition_rows(10, 4);
        let slices = split_by_ranges(&mut pixels, 3, &ranges);
        let lens: Vec<usize> = slices.iter().map(|(_, s)| s.len()).collect();
        assert_eq!(lens, vec![6, 6, 6, 12]);
    }
}
