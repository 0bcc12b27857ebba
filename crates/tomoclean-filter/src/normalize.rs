//! Projection normalization
//!
//! Turns a raw detector frame into a flat-field corrected transmission
//! image. The stages run in a fixed order:
//!
//! 1. subtract the dark value
//! 2. clamp negatives to 0
//! 3. remove gamma spikes
//! 4. divide by the flat field (0 where the flat field is not positive)
//! 5. remove stripes and bad pixels
//! 6. clip to `[clip_min, clip_max]`
//! 7. 3x3 median smoothing
//! 8. Gaussian smoothing
//!
//! Steps 7 and 8 are convex, so the clip bounds still hold on output.

use crate::convolve::gaussian_filter;
use crate::flat::FlatField;
use crate::rank::median_filter;
use crate::spike::{DEFAULT_SPIKE_SIGMA, SpikeFilter};
use crate::stripe::StripeFilter2D;
use crate::{FilterError, FilterResult};
use tomoclean_core::{Error, Image, ProjectionStack};
use tracing::debug;

/// Dark-current offset of the detector used for the reference data sets.
pub const DEFAULT_DARK_VALUE: f32 = 600.0;

/// Normalization parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizerParams {
    /// Constant dark-current offset subtracted from raw counts
    pub dark_value: f32,
    /// Spike threshold, in global standard deviations
    pub spike_sigma: f32,
    /// Stripe window along the row axis
    pub stripe_v_size: u32,
    /// Stripe window along the column axis
    pub stripe_h_size: u32,
    /// Bad-pixel threshold, in global standard deviations
    pub bad_pixel_sigma: f32,
    /// Lower clip bound (must stay > 0 for the later log transform)
    pub clip_min: f32,
    /// Upper clip bound
    pub clip_max: f32,
    /// Side of the square median smoothing window
    pub median_size: u32,
    /// Gaussian smoothing sigma (0 disables)
    pub smooth_sigma: f32,
}

impl Default for NormalizerParams {
    fn default() -> Self {
        let stripe = StripeFilter2D::default();
        NormalizerParams {
            dark_value: DEFAULT_DARK_VALUE,
            spike_sigma: DEFAULT_SPIKE_SIGMA,
            stripe_v_size: stripe.v_size(),
            stripe_h_size: stripe.h_size(),
            bad_pixel_sigma: stripe.bad_pixel_sigma(),
            clip_min: 1e-3,
            clip_max: 10.0,
            median_size: 3,
            smooth_sigma: 0.5,
        }
    }
}

/// Validated projection normalizer
#[derive(Debug, Clone)]
pub struct ProjectionNormalizer {
    params: NormalizerParams,
    spike: SpikeFilter,
    stripe: StripeFilter2D,
}

impl ProjectionNormalizer {
    /// Create a normalizer.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if any parameter is out of range:
    /// non-finite dark value, non-positive sigmas or windows, clip bounds
    /// with `clip_min <= 0` or `clip_min >= clip_max`, negative smoothing.
    pub fn new(params: NormalizerParams) -> FilterResult<Self> {
        if !params.dark_value.is_finite() {
            return Err(invalid(format!(
                "dark value must be finite, got {}",
                params.dark_value
            )));
        }
        let (lo, hi) = (params.clip_min, params.clip_max);
        if !(lo > 0.0 && lo < hi && hi.is_finite()) {
            return Err(invalid(format!(
                "clip bounds must satisfy 0 < min < max, got [{}, {}]",
                params.clip_min, params.clip_max
            )));
        }
        if params.median_size == 0 {
            return Err(invalid("median window must be >= 1".to_string()));
        }
        if !(params.smooth_sigma >= 0.0 && params.smooth_sigma.is_finite()) {
            return Err(invalid(format!(
                "smoothing sigma must be >= 0, got {}",
                params.smooth_sigma
            )));
        }
        let spike = SpikeFilter::new(params.spike_sigma)?;
        let stripe = StripeFilter2D::new(
            params.stripe_v_size,
            params.stripe_h_size,
            params.bad_pixel_sigma,
        )?;
        Ok(ProjectionNormalizer {
            params,
            spike,
            stripe,
        })
    }

    pub fn params(&self) -> &NormalizerParams {
        &self.params
    }

    /// Normalize one raw projection against `flat`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if `raw` and `flat` differ in shape.
    pub fn normalize(&self, raw: &Image, flat: &FlatField) -> FilterResult<Image> {
        raw.check_same_size(flat.image())?;
        let p = &self.params;

        let counts = raw.sub_constant(p.dark_value).clamp_min(0.0);
        let despiked = self.spike.apply(&counts)?;
        let transmission = despiked.div_guarded(flat.image())?;
        let destriped = self.stripe.apply(&transmission)?;
        let clipped = destriped.clip(p.clip_min, p.clip_max);
        let median = median_filter(&clipped, p.median_size, p.median_size)?;
        gaussian_filter(&median, p.smooth_sigma)
    }

    /// Normalize every projection of a stack in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first per-image error encountered.
    pub fn normalize_stack(
        &self,
        stack: &ProjectionStack,
        flat: &FlatField,
    ) -> FilterResult<ProjectionStack> {
        debug!(frames = stack.len(), "normalizing projection stack");
        stack.try_map(|_, raw| self.normalize(raw, flat))
    }
}

impl Default for ProjectionNormalizer {
    fn default() -> Self {
        let params = NormalizerParams::default();
        ProjectionNormalizer {
            params,
            spike: SpikeFilter::default(),
            stripe: StripeFilter2D::default(),
        }
    }
}

/// Normalize one projection with default stage parameters and the given
/// dark value.
pub fn normalize_projection(raw: &Image, flat: &FlatField, dark_value: f32) -> FilterResult<Image> {
    ProjectionNormalizer::new(NormalizerParams {
        dark_value,
        ..NormalizerParams::default()
    })?
    .normalize(raw, flat)
}

fn invalid(message: String) -> FilterError {
    Error::InvalidParameter(message).into()
}
