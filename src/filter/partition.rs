//! Splitting an image's rows between workers.

use std::ops::Range;

/// A contiguous run of rows handed to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub count: usize,
}

impl RowRange {
    /// One past the last row.
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Number of workers actually used for an image of `height` rows.
///
/// Never more workers than rows, so every worker gets at least one row.
pub fn effective_threads(height: usize, configured_threads: usize) -> usize {
    configured_threads.max(1).min(height)
}

/// Partition `0..height` into `effective_threads(height, configured_threads)`
/// ranges.
///
/// Every range but the last gets exactly `height / workers` rows, starting
/// from row 0. The last range starts where the previous one ended and takes
/// everything that is left, including the remainder of the division.
pub fn partition_rows(height: usize, configured_threads: usize) -> Vec<RowRange> {
    let workers = effective_threads(height, configured_threads);
    if workers == 0 {
        return Vec::new();
    }

    let share = height / workers;
    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for _ in 0..workers - 1 {
        ranges.push(RowRange {
            start,
            count: share,
        });
        start += share;
    }
    ranges.push(RowRange {
        start,
        count: height - start,
    });
    ranges
}
