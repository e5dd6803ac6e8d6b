//! Pixel storage and the P6 codec.

mod pixel;
pub mod ppm;

pub use pixel::{Pixel, PixelBuffer};
pub use ppm::{read_image, write_image};
