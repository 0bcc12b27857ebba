//! Directional stripe and bad-pixel removal
//!
//! Detector column defects show up as vertical stripes, read-out defects as
//! horizontal ones. Two 1-D medians knock both down, then residual hot and
//! dead pixels are caught by a two-sided outlier pass against a 3x3 median.

use crate::FilterResult;
use crate::outlier::{OutlierSide, replace_outliers};
use crate::rank::median_filter;
use tomoclean_core::{Error, Image};
use tracing::{debug, trace};

/// Two-pass directional median filter with bad-pixel cleanup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripeFilter2D {
    /// Window length along the row axis (columns)
    v_size: u32,
    /// Window length along the column axis (rows)
    h_size: u32,
    /// Bad-pixel threshold, in global standard deviations
    bad_pixel_sigma: f32,
}

impl Default for StripeFilter2D {
    fn default() -> Self {
        StripeFilter2D {
            v_size: 3,
            h_size: 3,
            bad_pixel_sigma: 6.0,
        }
    }
}

impl StripeFilter2D {
    /// Create a stripe filter.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for a zero window size or a
    /// non-positive sigma.
    pub fn new(v_size: u32, h_size: u32, bad_pixel_sigma: f32) -> FilterResult<Self> {
        if v_size == 0 || h_size == 0 {
            return Err(Error::InvalidParameter(format!(
                "stripe window sizes must be >= 1, got v={v_size} h={h_size}"
            ))
            .into());
        }
        if !(bad_pixel_sigma > 0.0 && bad_pixel_sigma.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "bad pixel sigma must be > 0, got {bad_pixel_sigma}"
            ))
            .into());
        }
        Ok(StripeFilter2D {
            v_size,
            h_size,
            bad_pixel_sigma,
        })
    }

    pub fn v_size(&self) -> u32 {
        self.v_size
    }

    pub fn h_size(&self) -> u32 {
        self.h_size
    }

    pub fn bad_pixel_sigma(&self) -> f32 {
        self.bad_pixel_sigma
    }

    /// Filter `image`.
    ///
    /// When the residual after directional filtering has no spread, the
    /// directionally filtered image is returned as is.
    pub fn apply(&self, image: &Image) -> FilterResult<Image> {
        let along_rows = median_filter(image, self.v_size, 1)?;
        let filtered = median_filter(&along_rows, 1, self.h_size)?;
        let reference = median_filter(&filtered, 3, 3)?;

        match replace_outliers(&filtered, &reference, self.bad_pixel_sigma, OutlierSide::Both) {
            Ok((out, replaced)) => {
                trace!(replaced, "stripe filter bad pixels");
                Ok(out)
            }
            Err(Error::DegenerateInput(reason)) => {
                debug!(%reason, "stripe filter bad-pixel pass skipped");
                Ok(filtered)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Remove directional stripes and bad pixels.
///
/// Convenience wrapper for [`StripeFilter2D`].
pub fn stripe_filter(
    image: &Image,
    v_size: u32,
    h_size: u32,
    bad_pixel_sigma: f32,
) -> FilterResult<Image> {
    StripeFilter2D::new(v_size, h_size, bad_pixel_sigma)?.apply(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_stripe_removed() {
        let image = Image::from_fn(12, 10, |x, _| if x == 5 { 40.0 } else { 10.0 }).unwrap();
        let out = stripe_filter(&image, 3, 3, 6.0).unwrap();
        assert!(out.data().iter().all(|&v| v == 10.0));
    }

    #[test]
    fn test_horizontal_stripe_removed() {
        let image = Image::from_fn(12, 10, |_, y| if y == 4 { 40.0 } else { 10.0 }).unwrap();
        let out = stripe_filter(&image, 3, 3, 6.0).unwrap();
        assert!(out.data().iter().all(|&v| v == 10.0));
    }

    #[test]
    fn test_uniform_unchanged() {
        let image = Image::new_with_value(9, 9, 1.5).unwrap();
        assert_eq!(StripeFilter2D::default().apply(&image).unwrap(), image);
    }

    #[test]
    fn test_smooth_gradient_preserved() {
        // A 1-D ramp is a fixed point of every median window used here.
        let image = Image::from_fn(10, 8, |x, _| 2.0 * x as f32).unwrap();
        let out = StripeFilter2D::default().apply(&image).unwrap();
        assert_eq!(out.dimensions(), image.dimensions());
        for (a, b) in out.data().iter().zip(image.data()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(StripeFilter2D::new(0, 3, 6.0).is_err());
        assert!(StripeFilter2D::new(3, 0, 6.0).is_err());
        assert!(StripeFilter2D::new(3, 3, 0.0).is_err());
        assert!(stripe_filter(&Image::new(3, 3).unwrap(), 3, 3, -1.0).is_err());
    }
}
