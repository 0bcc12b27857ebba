//! Convolution kernels
//!
//! Only separable smoothing is needed by the correction pipeline, so a
//! kernel is a 1-D row of weights with an origin. 2-D smoothing applies the
//! same kernel along rows and then along columns.

use crate::FilterResult;
use tomoclean_core::Error;

/// Default Gaussian truncation, in standard deviations.
pub const GAUSSIAN_TRUNCATE: f32 = 4.0;

/// A 1-D convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Index of the origin within `data`
    center: usize,
    /// Kernel weights
    data: Vec<f32>,
}

impl Kernel {
    /// The identity kernel `[1]`.
    pub fn identity() -> Self {
        Kernel {
            center: 0,
            data: vec![1.0],
        }
    }

    /// Create a normalized Gaussian kernel.
    ///
    /// The kernel radius is `floor(truncate * sigma + 0.5)`, so sigma 0.5
    /// with the default truncation gives a 5-tap kernel. A sigma of 0
    /// returns the identity kernel.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for negative or non-finite sigma.
    ///
    /// # Examples
    ///
    /// ```
    /// use tomoclean_filter::Kernel;
    ///
    /// let k = Kernel::gaussian(0.5, 4.0).unwrap();
    /// assert_eq!(k.len(), 5);
    /// assert!((k.sum() - 1.0).abs() < 1e-6);
    /// ```
    pub fn gaussian(sigma: f32, truncate: f32) -> FilterResult<Self> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "gaussian sigma must be >= 0, got {sigma}"
            ))
            .into());
        }
        if sigma == 0.0 {
            return Ok(Self::identity());
        }

        let radius = (truncate * sigma + 0.5).floor() as isize;
        let two_sigma2 = 2.0 * sigma * sigma;
        let mut data: Vec<f32> = (-radius..=radius)
            .map(|i| (-((i * i) as f32) / two_sigma2).exp())
            .collect();
        let sum: f32 = data.iter().sum();
        for v in &mut data {
            *v /= sum;
        }

        Ok(Kernel {
            center: radius as usize,
            data,
        })
    }

    /// Number of taps
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Never true for a constructed kernel
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Index of the origin
    #[inline]
    pub fn center(&self) -> usize {
        self.center
    }

    /// Samples before the origin
    #[inline]
    pub fn before(&self) -> usize {
        self.center
    }

    /// Samples after the origin
    #[inline]
    pub fn after(&self) -> usize {
        self.data.len() - self.center - 1
    }

    /// Get the kernel weights
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Sum of all weights
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}
