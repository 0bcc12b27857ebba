//! Gamma spike removal
//!
//! Isolated bright pixels caused by gamma hits are detected against the
//! 3x3 local median and replaced by it. Only positive deviations count; a
//! spike is always brighter than its surroundings.

use crate::FilterResult;
use crate::outlier::{OutlierSide, replace_outliers};
use crate::rank::median_filter;
use tomoclean_core::{Error, Image};
use tracing::{debug, trace};

/// Default spike threshold, in global standard deviations.
pub const DEFAULT_SPIKE_SIGMA: f32 = 3.0;

/// Spike filter with a fixed threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeFilter {
    threshold_sigma: f32,
}

impl Default for SpikeFilter {
    fn default() -> Self {
        SpikeFilter {
            threshold_sigma: DEFAULT_SPIKE_SIGMA,
        }
    }
}

impl SpikeFilter {
    /// Create a spike filter.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` unless `threshold_sigma > 0`.
    pub fn new(threshold_sigma: f32) -> FilterResult<Self> {
        if !(threshold_sigma > 0.0 && threshold_sigma.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "spike threshold must be > 0, got {threshold_sigma}"
            ))
            .into());
        }
        Ok(SpikeFilter { threshold_sigma })
    }

    /// Threshold in global standard deviations
    pub fn threshold_sigma(&self) -> f32 {
        self.threshold_sigma
    }

    /// Remove positive spikes from `image`.
    ///
    /// A uniform image has no residual spread and is returned unchanged.
    pub fn apply(&self, image: &Image) -> FilterResult<Image> {
        let median = median_filter(image, 3, 3)?;
        match replace_outliers(image, &median, self.threshold_sigma, OutlierSide::Positive) {
            Ok((out, replaced)) => {
                trace!(replaced, "spike filter");
                Ok(out)
            }
            Err(Error::DegenerateInput(reason)) => {
                debug!(%reason, "spike filter skipped");
                Ok(image.clone())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Remove gamma spikes with the given threshold.
///
/// Convenience wrapper for [`SpikeFilter`].
pub fn spike_filter(image: &Image, threshold_sigma: f32) -> FilterResult<Image> {
    SpikeFilter::new(threshold_sigma)?.apply(image)
}
