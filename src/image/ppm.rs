//! Binary PPM (P6) reading and writing
//!
//! Only the subset the filter needs is supported: magic `P6`, a positive
//! width and height, and a max channel value of exactly 255. Header tokens
//! are separated by whitespace and `#` comments that run to end of line.
//! A single whitespace byte separates the header from the raw RGB triples.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{Pixel, PixelBuffer};
use crate::error::{DecodeError, EncodeError, HeaderField};

pub const MAGIC: &str = "P6";
pub const MAX_CHANNEL_VALUE: u64 = 255;

/// Cursor over the header bytes.
struct HeaderReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HeaderReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Skip whitespace and comment lines, then return the next token.
    fn next_token(&mut self) -> Option<&'a [u8]> {
        loop {
            match self.bytes.get(self.pos)? {
                b'#' => {
                    while let Some(&c) = self.bytes.get(self.pos) {
                        self.pos += 1;
                        if c == b'\n' {
                            break;
                        }
                    }
                }
                c if c.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }

        let start = self.pos;
        while let Some(c) = self.bytes.get(self.pos) {
            if c.is_ascii_whitespace() || *c == b'#' {
                break;
            }
            self.pos += 1;
        }
        Some(&self.bytes[start..self.pos])
    }

    fn number(&mut self, field: HeaderField) -> Result<u64, DecodeError> {
        let token = self
            .next_token()
            .ok_or(DecodeError::MissingField(field))?;
        let text = String::from_utf8_lossy(token);
        text.parse::<u64>().map_err(|_| DecodeError::MalformedField {
            field,
            token: text.into_owned(),
        })
    }

    fn dimension(&mut self, field: HeaderField) -> Result<usize, DecodeError> {
        let value = self.number(field)?;
        if value == 0 {
            return Err(DecodeError::ZeroDimension(field));
        }
        usize::try_from(value).map_err(|_| DecodeError::MalformedField {
            field,
            token: value.to_string(),
        })
    }

    /// Pixel data begins after exactly one whitespace byte.
    fn data(&self) -> &'a [u8] {
        let start = match self.bytes.get(self.pos) {
            Some(c) if c.is_ascii_whitespace() => self.pos + 1,
            _ => self.pos,
        };
        &self.bytes[start.min(self.bytes.len())..]
    }
}

/// Decode an in-memory P6 image.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    let mut header = HeaderReader::new(bytes);

    let magic = header
        .next_token()
        .ok_or(DecodeError::MissingField(HeaderField::Magic))?;
    if magic != MAGIC.as_bytes() {
        return Err(DecodeError::BadMagic {
            found: String::from_utf8_lossy(magic).into_owned(),
        });
    }

    let width = header.dimension(HeaderField::Width)?;
    let height = header.dimension(HeaderField::Height)?;
    let max_value = header.number(HeaderField::MaxValue)?;
    if max_value != MAX_CHANNEL_VALUE {
        return Err(DecodeError::UnsupportedMaxValue(max_value));
    }

    let expected = width
        .checked_mul(height)
        .filter(|count| count.checked_mul(3).is_some())
        .ok_or(DecodeError::TooLarge { width, height })?;

    let data = header.data();
    let available = data.len() / 3;
    if available < expected {
        return Err(DecodeError::Truncated {
            expected,
            actual: available,
        });
    }

    let pixels = data[..expected * 3]
        .chunks_exact(3)
        .map(|rgb| Pixel::new(rgb[0], rgb[1], rgb[2]))
        .collect();
    Ok(PixelBuffer::new(width, height, pixels)?)
}

/// Read and decode the image at `path`.
pub fn read_image(path: &Path) -> Result<PixelBuffer, DecodeError> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Write `image` as P6 to `out`, with an optional header comment line.
pub fn encode<W: Write>(
    image: &PixelBuffer,
    comment: Option<&str>,
    out: &mut W,
) -> Result<(), EncodeError> {
    writeln!(out, "{MAGIC}").map_err(EncodeError::Write)?;
    if let Some(comment) = comment {
        for line in comment.lines() {
            writeln!(out, "# {line}").map_err(EncodeError::Write)?;
        }
    }
    writeln!(
        out,
        "{} {}\n{}",
        image.width(),
        image.height(),
        MAX_CHANNEL_VALUE
    )
    .map_err(EncodeError::Write)?;

    let mut data = Vec::with_capacity(image.len() * 3);
    for pixel in image.pixels() {
        data.extend_from_slice(&[pixel.r, pixel.g, pixel.b]);
    }
    out.write_all(&data).map_err(EncodeError::Write)?;
    out.flush().map_err(EncodeError::Write)
}

/// Create (or truncate) `path` and write `image` to it.
pub fn write_image(
    image: &PixelBuffer,
    comment: Option<&str>,
    path: &Path,
) -> Result<(), EncodeError> {
    let file = File::create(path).map_err(EncodeError::Create)?;
    let mut writer = BufWriter::new(file);
    encode(image, comment, &mut writer)
}
