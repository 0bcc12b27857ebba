//! tomoclean-filter - Projection filtering and normalization
//!
//! This crate provides the per-projection correction stages:
//!
//! - Rank and median filtering with edge reflection
//! - Separable convolution and Gaussian smoothing
//! - Gamma spike removal
//! - Directional stripe and bad-pixel removal
//! - Flat-field preparation and full projection normalization

pub mod border;
pub mod convolve;
mod error;
pub mod flat;
pub mod kernel;
pub mod normalize;
pub mod outlier;
pub mod rank;
pub mod spike;
pub mod stripe;

pub use error::{FilterError, FilterResult};
pub use flat::FlatField;
pub use kernel::Kernel;

// Re-export commonly used functions
pub use convolve::{convolve_cols, convolve_rows, convolve_sep, gaussian_filter};
pub use normalize::{
    DEFAULT_DARK_VALUE, NormalizerParams, ProjectionNormalizer, normalize_projection,
};
pub use outlier::{OutlierSide, replace_outliers};
pub use rank::{median_filter, rank_filter};
pub use spike::{SpikeFilter, spike_filter};
pub use stripe::{StripeFilter2D, stripe_filter};
