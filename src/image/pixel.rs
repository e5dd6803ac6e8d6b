use crate::error::BufferError;

/// One RGB pixel, 8 bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pixel with the same value on all three channels.
    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }
}

/// Owned `width * height` grid of pixels in scanline order.
///
/// Both dimensions are at least 1 and the pixel count always equals
/// `width * height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    /// Wrap scanline-ordered pixels, checking the shape.
    pub fn new(width: usize, height: usize, pixels: Vec<Pixel>) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::EmptyDimensions { width, height });
        }
        let expected = width.checked_mul(height);
        if expected != Some(pixels.len()) {
            return Err(BufferError::LengthMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Buffer where every pixel is `pixel`.
    pub fn filled(width: usize, height: usize, pixel: Pixel) -> Result<Self, BufferError> {
        let count = width
            .checked_mul(height)
            .ok_or(BufferError::LengthMismatch {
                width,
                height,
                actual: 0,
            })?;
        Self::new(width, height, vec![pixel; count])
    }

    /// Buffer built by evaluating `f(x, y)` for every cell.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, BufferError>
    where
        F: FnMut(usize, usize) -> Pixel,
    {
        let mut pixels = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    /// Assemble a buffer whose shape the caller has already established.
    pub(crate) fn from_parts(width: usize, height: usize, pixels: Vec<Pixel>) -> Self {
        debug_assert!(width > 0 && height > 0);
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels (`width * height`).
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always false for a constructed buffer; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`. Panics when out of bounds.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> Pixel {
        self.pixels[y * self.width + x]
    }

    /// One scanline.
    #[inline]
    pub fn row(&self, y: usize) -> &[Pixel] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }
}
