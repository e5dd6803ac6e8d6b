//! The fixed 3x3 Laplacian kernel and the per-pixel convolution rule.

use crate::image::{Pixel, PixelBuffer};

pub const KERNEL_SIZE: usize = 3;

/// A 3x3 integer kernel, indexed `weights[fy][fx]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    weights: [[i32; KERNEL_SIZE]; KERNEL_SIZE],
}

/// Laplacian edge detection kernel.
pub const LAPLACIAN: Kernel = Kernel::new([[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]]);

impl Kernel {
    pub const fn new(weights: [[i32; KERNEL_SIZE]; KERNEL_SIZE]) -> Self {
        Self { weights }
    }

    /// Filtered value of the pixel at `(x, y)`.
    ///
    /// Taps past an edge wrap around to the opposite side of the image.
    /// Each channel is summed in `i32` and clamped to `[0, 255]` once, after
    /// all nine taps.
    pub fn apply_at(&self, source: &PixelBuffer, x: usize, y: usize) -> Pixel {
        let rows = wrapped_neighbors(y, source.height());
        let cols = wrapped_neighbors(x, source.width());
        self.accumulate(source, rows, cols)
    }

    /// Sum the nine taps selected by the given source rows and columns.
    #[inline]
    pub(crate) fn accumulate(
        &self,
        source: &PixelBuffer,
        rows: [usize; KERNEL_SIZE],
        cols: [usize; KERNEL_SIZE],
    ) -> Pixel {
        let (mut red, mut green, mut blue) = (0i32, 0i32, 0i32);
        for (fy, &sy) in rows.iter().enumerate() {
            let row = source.row(sy);
            for (fx, &sx) in cols.iter().enumerate() {
                let weight = self.weights[fy][fx];
                let tap = row[sx];
                red += i32::from(tap.r) * weight;
                green += i32::from(tap.g) * weight;
                blue += i32::from(tap.b) * weight;
            }
        }
        Pixel::new(clamp_channel(red), clamp_channel(green), clamp_channel(blue))
    }
}

/// Indices of `i - 1`, `i`, `i + 1` modulo `len`.
#[inline]
pub(crate) fn wrapped_neighbors(i: usize, len: usize) -> [usize; KERNEL_SIZE] {
    let half = KERNEL_SIZE / 2;
    std::array::from_fn(|offset| (i + len - half % len + offset) % len)
}

#[inline]
fn clamp_channel(sum: i32) -> u8 {
    sum.clamp(0, i32::from(u8::MAX)) as u8
}
