//! Error types for tomoclean-core
//!
//! Provides the error taxonomy shared by every crate in the workspace.
//! Domain crates wrap [`Error`] in their own error enums via `#[from]`.
//!
//! Three kinds of failure matter to the correction pipeline:
//!
//! - [`Error::ShapeMismatch`]: projection, flat-field or volume shapes
//!   disagree. Fatal; the run is aborted.
//! - [`Error::InvalidParameter`]: a radius, sigma, threshold or window size
//!   is out of range. Reported when a component is constructed, never
//!   mid-pipeline.
//! - [`Error::DegenerateInput`]: the data leaves a stage nothing to do
//!   (zero variance, no positive pixel). Per-frame stages recover from it
//!   locally and fall back to a no-op.

use thiserror::Error;

/// tomoclean error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Two images (or an image and a stack) have different shapes
    #[error("shape mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    ShapeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Input carries no information for the requested operation
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Operation requires at least one image in the stack
    #[error("empty image stack")]
    EmptyStack,
}

/// Result type alias for tomoclean operations
pub type Result<T> = std::result::Result<T, Error>;
