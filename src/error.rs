//! Error types for the image pipeline
//!
//! Library code returns these typed errors; the CLI wraps them with `anyhow`
//! context where it needs to.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Header fields of a P6 image, used to say which one was bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Magic,
    Width,
    Height,
    MaxValue,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeaderField::Magic => "magic number",
            HeaderField::Width => "width",
            HeaderField::Height => "height",
            HeaderField::MaxValue => "max rgb color value",
        };
        f.write_str(name)
    }
}

/// Invalid pixel buffer shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("image dimensions must be at least 1x1 (got {width}x{height})")]
    EmptyDimensions { width: usize, height: usize },

    #[error("pixel count {actual} does not match {width}x{height}")]
    LengthMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("image header read error: {0}")]
    Io(#[from] io::Error),

    #[error("image header read error: magic number does not match P6 (found {found:?})")]
    BadMagic { found: String },

    #[error("image header read error: missing {0}")]
    MissingField(HeaderField),

    #[error("image header read error: no digits found for {field} (found {token:?})")]
    MalformedField { field: HeaderField, token: String },

    #[error("image header read error: {0} must be positive")]
    ZeroDimension(HeaderField),

    #[error("image header read error: maximum rgb color value must be 255 (found {0})")]
    UnsupportedMaxValue(u64),

    #[error("image header read error: {width}x{height} image is too large")]
    TooLarge { width: usize, height: usize },

    #[error("input image read error: expected pixels: {expected}, pixels read: {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot create output file: {0}")]
    Create(#[source] io::Error),

    #[error("error writing image data: {0}")]
    Write(#[source] io::Error),
}

/// A worker or runner thread could not be started or did not finish cleanly.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to spawn worker thread {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker thread {worker} panicked before completing")]
    Join { worker: usize },
}

/// Failure of one image job, tagged with the file it concerns.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("\"{}\": {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("\"{}\": {source}", .path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: ResourceError,
    },

    /// The image was filtered but the result could not be written.
    #[error("\"{}\": {source}", .path.display())]
    Encode {
        path: PathBuf,
        elapsed: Duration,
        #[source]
        source: EncodeError,
    },
}

impl JobError {
    /// Engine time spent before the failure; only an encode failure has any.
    pub fn elapsed(&self) -> Duration {
        match self {
            JobError::Encode { elapsed, .. } => *elapsed,
            JobError::Decode { .. } | JobError::Resource { .. } => Duration::ZERO,
        }
    }

    /// Path of the file the error concerns.
    pub fn path(&self) -> &Path {
        match self {
            JobError::Decode { path, .. }
            | JobError::Resource { path, .. }
            | JobError::Encode { path, .. } => path,
        }
    }
}
