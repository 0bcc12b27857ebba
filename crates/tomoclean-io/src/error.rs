//! I/O error types
//!
//! Provides a unified error type for frame and slice I/O. The TIFF module
//! maps decoder and encoder failures into `IoError` variants so that
//! callers only need to handle one error type.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for image I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific file
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<IoError>,
    },

    /// The image layout is not a single-channel grayscale image
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The image data is structurally invalid
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// The TIFF decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// The TIFF encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// An error from the core library (e.g. shape mismatch)
    #[error("core error: {0}")]
    Core(#[from] tomoclean_core::Error),
}

impl IoError {
    /// Attach the path being read or written.
    pub fn at(self, path: impl Into<PathBuf>) -> IoError {
        IoError::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
