//! Injected external engines
//!
//! Tomographic inversion, wavelet stripe removal and polar ring removal
//! live outside this workspace. The pipeline only sees them through these
//! traits, so any engine (or a test double) can be plugged in.

use crate::ReconResult;
use tomoclean_core::{Error, Image, ProjectionStack, Result, Volume};

/// Default ring-removal filter window, in pixels.
pub const DEFAULT_RING_RWIDTH: u32 = 15;
/// Default ring-removal detection threshold.
pub const DEFAULT_RING_THRESH: f32 = 0.0044;
/// Default wavelet decomposition level for stripe removal.
pub const DEFAULT_STRIPE_LEVEL: u32 = 5;
/// Default wavelet family for stripe removal.
pub const DEFAULT_STRIPE_WAVELET: &str = "db5";
/// Default Fourier damping width for stripe removal.
pub const DEFAULT_STRIPE_SIGMA: f32 = 1.0;

/// Settings handed to a [`RingRemover`] with every slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingRemovalParams {
    /// Median filter window across the ring profile
    pub rwidth: u32,
    /// Minimum ring amplitude that gets corrected
    pub thresh: f32,
}

impl Default for RingRemovalParams {
    fn default() -> Self {
        RingRemovalParams {
            rwidth: DEFAULT_RING_RWIDTH,
            thresh: DEFAULT_RING_THRESH,
        }
    }
}

impl RingRemovalParams {
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for a zero window or a negative
    /// or non-finite threshold.
    pub fn validate(&self) -> Result<()> {
        if self.rwidth == 0 {
            return Err(Error::InvalidParameter(
                "ring removal window must be >= 1".to_string(),
            ));
        }
        if !self.thresh.is_finite() || self.thresh < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "ring removal threshold must be >= 0, got {}",
                self.thresh
            )));
        }
        Ok(())
    }
}

/// Settings handed to a [`StripeRemover`] with every stack
#[derive(Debug, Clone, PartialEq)]
pub struct StripeRemovalParams {
    /// Wavelet decomposition level
    pub level: u32,
    /// Wavelet family name, e.g. `db5`
    pub wavelet: String,
    /// Damping width of the Fourier filter
    pub sigma: f32,
}

impl Default for StripeRemovalParams {
    fn default() -> Self {
        StripeRemovalParams {
            level: DEFAULT_STRIPE_LEVEL,
            wavelet: DEFAULT_STRIPE_WAVELET.to_string(),
            sigma: DEFAULT_STRIPE_SIGMA,
        }
    }
}

impl StripeRemovalParams {
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for a zero level, an empty wavelet
    /// name or a non-positive sigma.
    pub fn validate(&self) -> Result<()> {
        if self.level == 0 {
            return Err(Error::InvalidParameter(
                "stripe removal level must be >= 1".to_string(),
            ));
        }
        if self.wavelet.trim().is_empty() {
            return Err(Error::InvalidParameter(
                "stripe removal wavelet is empty".to_string(),
            ));
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "stripe removal sigma must be > 0, got {}",
                self.sigma
            )));
        }
        Ok(())
    }
}

/// Reconstructs a volume from log-transformed projections.
pub trait Reconstructor: Send + Sync {
    /// `angles` are in radians, one per projection; `center` is the
    /// rotation axis position in detector columns.
    fn reconstruct(
        &self,
        projections: &ProjectionStack,
        angles: &[f32],
        center: f32,
    ) -> ReconResult<Volume>;
}

/// Removes stripe artifacts from a whole projection stack.
pub trait StripeRemover: Send + Sync {
    fn remove_stripe(
        &self,
        projections: &ProjectionStack,
        params: &StripeRemovalParams,
    ) -> ReconResult<ProjectionStack>;
}

/// Removes ring artifacts from one reconstructed slice.
pub trait RingRemover: Send + Sync {
    fn remove_ring(&self, slice: &Image, params: &RingRemovalParams) -> ReconResult<Image>;
}

impl<T: Reconstructor + ?Sized> Reconstructor for Box<T> {
    fn reconstruct(
        &self,
        projections: &ProjectionStack,
        angles: &[f32],
        center: f32,
    ) -> ReconResult<Volume> {
        (**self).reconstruct(projections, angles, center)
    }
}

impl<T: StripeRemover + ?Sized> StripeRemover for Box<T> {
    fn remove_stripe(
        &self,
        projections: &ProjectionStack,
        params: &StripeRemovalParams,
    ) -> ReconResult<ProjectionStack> {
        (**self).remove_stripe(projections, params)
    }
}

impl<T: RingRemover + ?Sized> RingRemover for Box<T> {
    fn remove_ring(&self, slice: &Image, params: &RingRemovalParams) -> ReconResult<Image> {
        (**self).remove_ring(slice, params)
    }
}
