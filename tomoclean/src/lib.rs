//! tomoclean - Artifact correction for X-ray tomography
//!
//! Cleans raw projection images and reconstructed slices of detector
//! artifacts, then fuses two differently filtered reconstructions into one
//! volume.
//!
//! # Overview
//!
//! - Per-projection normalization: dark subtraction, gamma spike removal,
//!   flat-field division, stripe and bad-pixel removal, smoothing
//! - Ring-artifact soft-mask blending of reconstructed slices
//! - Radial soft-mask fusion of two reconstructions
//! - A configurable [`Pipeline`] wiring the stages around injected
//!   reconstruction, stripe and ring engines
//!
//! # Example
//!
//! ```
//! use tomoclean::Image;
//! use tomoclean::filter::{FlatField, normalize_projection};
//!
//! let flat = FlatField::prepare(&Image::new_with_value(16, 16, 1000.0).unwrap(), 600.0).unwrap();
//! let raw = Image::new_with_value(16, 16, 1000.0).unwrap();
//! let projection = normalize_projection(&raw, &flat, 600.0).unwrap();
//! assert!((projection.mean() - 1.0).abs() < 1e-4);
//! ```

pub mod config;
mod error;
pub mod logging;
pub mod pipeline;
pub mod reduce;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::Pipeline;
pub use reduce::PairwiseReducer;

// Re-export core types (primary data structures used everywhere)
pub use tomoclean_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use tomoclean_filter as filter;
pub use tomoclean_io as io;
pub use tomoclean_recon as recon;
