use tracing::trace;

use super::kernel::{Kernel, KERNEL_SIZE, wrapped_neighbors};
use super::partition::RowRange;
use crate::image::{Pixel, PixelBuffer};

/// Filter the rows in `range` of `source` into `out`.
///
/// `out` holds exactly those rows of the destination image, in scanline
/// order, so `out.len() == range.count * source.width()`. `source` is only
/// read; nothing but `out` is written.
pub fn convolve_rows(kernel: &Kernel, source: &PixelBuffer, range: RowRange, out: &mut [Pixel]) {
    let width = source.width();
    let height = source.height();
    debug_assert_eq!(out.len(), range.count * width);
    debug_assert!(range.end() <= height);

    trace!(
        "convolving rows {}..{} of {}x{}",
        range.start,
        range.end(),
        width,
        height
    );

    // Column taps are the same for every row, so resolve the wrap once.
    let columns: Vec<[usize; KERNEL_SIZE]> =
        (0..width).map(|x| wrapped_neighbors(x, width)).collect();

    for (y, row_out) in range.rows().zip(out.chunks_exact_mut(width)) {
        let rows = wrapped_neighbors(y, height);
        for (pixel, &cols) in row_out.iter_mut().zip(&columns) {
            *pixel = kernel.accumulate(source, rows, cols);
        }
    }
}
