//! tomoclean-recon - Reconstruction-side processing
//!
//! Everything that happens around the (external) tomographic inversion:
//!
//! - Angle arrays and rotation-center calibration
//! - Log transform of normalized projections
//! - Ring-artifact soft-mask blending of reconstructed slices
//! - Radial fusion of two reconstructed volumes
//! - Traits for the injected reconstruction, stripe and ring engines

pub mod angles;
pub mod center;
mod error;
pub mod fusion;
pub mod mask;
pub mod ring;
pub mod traits;
pub mod transform;

pub use error::{ReconError, ReconResult};
pub use traits::{
    DEFAULT_RING_RWIDTH, DEFAULT_RING_THRESH, DEFAULT_STRIPE_LEVEL, DEFAULT_STRIPE_SIGMA,
    DEFAULT_STRIPE_WAVELET, Reconstructor, RingRemovalParams, RingRemover, StripeRemovalParams,
    StripeRemover,
};

pub use angles::angles_linspace;
pub use center::{CenterCalibration, DEFAULT_CENTER_POINTS, DEFAULT_REFERENCE_ROW};
pub use fusion::{DEFAULT_FUSION_RADIUS, DEFAULT_FUSION_SIGMA, FusionBlender, fuse};
pub use mask::{fusion_mask, ring_mask};
pub use ring::{DEFAULT_RING_RADIUS, DEFAULT_RING_SIGMA, RingMaskBlender, blend_ring};
pub use transform::{finish_volume, log_transform, log_transform_stack};
