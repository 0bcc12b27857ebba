//! tomoclean Core - Basic data structures for tomographic image correction
//!
//! This crate provides the data structures shared by every stage of the
//! projection-correction and slice-blending pipeline:
//!
//! - [`Image`] - Floating-point grayscale image (projection, flat field, slice)
//! - [`ImageStack`] - Ordered same-shape images, aliased as
//!   [`ProjectionStack`] and [`Volume`]
//! - [`Roi`] - Rectangular crop region
//! - [`SoftMask`] - Blend weights in `[0, 1]`
//! - [`Error`] - Error taxonomy used across the workspace

pub mod error;
pub mod image;
pub mod mask;
pub mod stack;

pub use error::{Error, Result};
pub use image::Image;
pub use image::clip::Roi;
pub use mask::SoftMask;
pub use stack::{ImageStack, ProjectionStack, Volume};
