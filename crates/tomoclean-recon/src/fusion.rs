//! Radial fusion of two reconstructions
//!
//! The stripe-filtered reconstruction is trusted near the rotation axis
//! and the ring-corrected one towards the rim. The two are combined
//! through a blurred disk mask, so every output voxel lies between its two
//! inputs.

use crate::ReconResult;
use crate::mask::fusion_mask;
use tomoclean_core::{Error, Image, SoftMask, Volume};
use tracing::{info, warn};

/// Default interior disk radius, in pixels.
pub const DEFAULT_FUSION_RADIUS: f32 = 70.0;
/// Default edge blur sigma, in pixels.
pub const DEFAULT_FUSION_SIGMA: f32 = 20.0;

/// Fusion of an interior volume `a` with an exterior volume `b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionBlender {
    radius_cut: f32,
    sigma_blur: f32,
    depth: Option<usize>,
}

impl Default for FusionBlender {
    fn default() -> Self {
        FusionBlender {
            radius_cut: DEFAULT_FUSION_RADIUS,
            sigma_blur: DEFAULT_FUSION_SIGMA,
            depth: None,
        }
    }
}

impl FusionBlender {
    /// Create a blender.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for a negative radius or sigma.
    pub fn new(radius_cut: f32, sigma_blur: f32) -> ReconResult<Self> {
        fusion_mask(1, 1, radius_cut, sigma_blur)?;
        Ok(FusionBlender {
            radius_cut,
            sigma_blur,
            depth: None,
        })
    }

    /// Limit the number of fused slices.
    pub fn with_depth(mut self, depth: Option<usize>) -> Self {
        self.depth = depth;
        self
    }

    pub fn radius_cut(&self) -> f32 {
        self.radius_cut
    }

    pub fn sigma_blur(&self) -> f32 {
        self.sigma_blur
    }

    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    /// Build the fusion mask for slices of the given size.
    pub fn mask(&self, width: u32, height: u32) -> ReconResult<SoftMask> {
        fusion_mask(width, height, self.radius_cut, self.sigma_blur)
    }

    /// Fuse two volumes: `a * mask + b * (1 - mask)` per voxel.
    ///
    /// The output has `min(len_a, len_b)` slices, or the configured depth
    /// if that is smaller.
    ///
    /// # Errors
    ///
    /// - `Error::EmptyStack` if either volume is empty.
    /// - `Error::ShapeMismatch` if the slice shapes differ.
    pub fn fuse(&self, a: &Volume, b: &Volume) -> ReconResult<Volume> {
        let (Some(dims_a), Some(dims_b)) = (a.dimensions(), b.dimensions()) else {
            return Err(Error::EmptyStack.into());
        };
        if dims_a != dims_b {
            return Err(Error::ShapeMismatch {
                expected: dims_a,
                actual: dims_b,
            }
            .into());
        }

        let available = a.len().min(b.len());
        let depth = match self.depth {
            Some(d) if d > available => {
                warn!(requested = d, available, "fusion depth clamped");
                available
            }
            Some(d) => d,
            None => available,
        };

        let mask = self.mask(dims_a.0, dims_a.1)?;
        info!(
            slices = depth,
            radius_cut = self.radius_cut,
            sigma_blur = self.sigma_blur,
            "fusing volumes"
        );
        a.truncated(depth)
            .try_zip_map(&b.truncated(depth), |_, interior, exterior| -> ReconResult<Image> {
                Ok(mask.blend(exterior, interior)?)
            })
    }
}

/// Fuse two volumes with a blurred disk mask.
///
/// Convenience wrapper for [`FusionBlender`].
pub fn fuse(
    a: &Volume,
    b: &Volume,
    radius_cut: f32,
    sigma_blur: f32,
    depth: Option<usize>,
) -> ReconResult<Volume> {
    FusionBlender::new(radius_cut, sigma_blur)?
        .with_depth(depth)
        .fuse(a, b)
}
