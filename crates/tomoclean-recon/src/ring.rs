//! Ring-artifact blending
//!
//! Ring removal engines work well near the rim of a slice but smear the
//! centre. [`RingMaskBlender`] keeps the original slice inside `radius`
//! and fades to the ring-filtered slice outside it.

use crate::mask::ring_mask;
use crate::traits::{RingRemovalParams, RingRemover};
use crate::{ReconError, ReconResult};
use tomoclean_core::{Error, Image, SoftMask, Volume};
use tracing::info;

/// Default protected radius, in pixels.
pub const DEFAULT_RING_RADIUS: f32 = 40.0;
/// Default transition width, in pixels.
pub const DEFAULT_RING_SIGMA: f32 = 10.0;

/// Radial blender between a slice and its ring-filtered version
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingMaskBlender {
    radius: f32,
    sigma: f32,
}

impl Default for RingMaskBlender {
    fn default() -> Self {
        RingMaskBlender {
            radius: DEFAULT_RING_RADIUS,
            sigma: DEFAULT_RING_SIGMA,
        }
    }
}

impl RingMaskBlender {
    /// Create a blender.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` unless `radius >= 0` and
    /// `sigma > 0`.
    pub fn new(radius: f32, sigma: f32) -> ReconResult<Self> {
        // Validate through the mask builder on a 1x1 grid
        ring_mask(1, 1, radius, sigma)?;
        Ok(RingMaskBlender { radius, sigma })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Build the blend mask for slices of the given size.
    pub fn mask(&self, width: u32, height: u32) -> ReconResult<SoftMask> {
        ring_mask(width, height, self.radius, self.sigma)
    }

    /// Blend one slice with its ring-filtered version.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if the two slices differ in shape.
    pub fn blend_slice(&self, slice: &Image, filtered: &Image) -> ReconResult<Image> {
        slice.check_same_size(filtered)?;
        let mask = self.mask(slice.width(), slice.height())?;
        Ok(mask.blend(slice, filtered)?)
    }

    /// Blend two volumes slice by slice.
    ///
    /// The mask is built once and shared by every slice.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for different slice counts and
    /// `Error::ShapeMismatch` for different slice shapes.
    pub fn blend_volumes(&self, plain: &Volume, filtered: &Volume) -> ReconResult<Volume> {
        let Some((w, h)) = plain.dimensions() else {
            return Err(Error::EmptyStack.into());
        };
        let mask = self.mask(w, h)?;
        plain.try_zip_map(filtered, |_, s, f| -> ReconResult<Image> { Ok(mask.blend(s, f)?) })
    }

    /// Run `remover` on every slice of `volume` and blend the result back.
    ///
    /// Slices are processed in parallel; the mask is built once and
    /// `params` is passed unchanged to every `remove_ring` call.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyStack` for an empty volume and propagates
    /// collaborator failures.
    pub fn blend_volume<R>(
        &self,
        volume: &Volume,
        remover: &R,
        params: &RingRemovalParams,
    ) -> ReconResult<Volume>
    where
        R: RingRemover + ?Sized,
    {
        let Some((w, h)) = volume.dimensions() else {
            return Err(Error::EmptyStack.into());
        };
        params.validate()?;
        let mask = self.mask(w, h)?;
        info!(
            slices = volume.len(),
            radius = self.radius,
            sigma = self.sigma,
            rwidth = params.rwidth,
            thresh = params.thresh,
            "ring blending"
        );
        volume.try_map(|i, slice| {
            let filtered = remover.remove_ring(slice, params)?;
            if filtered.dimensions() != slice.dimensions() {
                return Err(ReconError::collaborator(
                    "ring removal",
                    format!("slice {i} changed shape"),
                ));
            }
            Ok(mask.blend(slice, &filtered)?)
        })
    }
}

/// Blend a slice with its ring-filtered version using a radial mask.
///
/// Convenience wrapper for [`RingMaskBlender`].
pub fn blend_ring(slice: &Image, filtered: &Image, radius: f32, sigma: f32) -> ReconResult<Image> {
    RingMaskBlender::new(radius, sigma)?.blend_slice(slice, filtered)
}
