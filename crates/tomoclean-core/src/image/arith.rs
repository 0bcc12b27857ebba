//! Element-wise arithmetic on images
//!
//! All operations return a new [`Image`]; the receiver is left untouched.
//! Binary operations require both operands to share one shape and return
//! `Error::ShapeMismatch` otherwise.

use super::Image;
use crate::error::Result;

impl Image {
    /// Apply `f` to every pixel.
    pub fn map<F>(&self, f: F) -> Image
    where
        F: Fn(f32) -> f32,
    {
        let mut result = self.create_template();
        for (dst, &src) in result.data_mut().iter_mut().zip(self.data()) {
            *dst = f(src);
        }
        result
    }

    /// Combine two images pixel by pixel with `f(self, other)`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if dimensions don't match.
    pub fn zip_map<F>(&self, other: &Image, f: F) -> Result<Image>
    where
        F: Fn(f32, f32) -> f32,
    {
        self.check_same_size(other)?;
        let mut result = self.create_template();
        for ((dst, &a), &b) in result
            .data_mut()
            .iter_mut()
            .zip(self.data())
            .zip(other.data())
        {
            *dst = f(a, b);
        }
        Ok(result)
    }

    /// Subtract a constant offset from every pixel.
    pub fn sub_constant(&self, value: f32) -> Image {
        self.map(|v| v - value)
    }

    /// Replace every value below `min` with `min`.
    pub fn clamp_min(&self, min: f32) -> Image {
        self.map(|v| v.max(min))
    }

    /// Clip every value into `[lo, hi]`.
    ///
    /// NaN pixels are mapped to `lo`.
    pub fn clip(&self, lo: f32, hi: f32) -> Image {
        self.map(|v| if v.is_nan() { lo } else { v.clamp(lo, hi) })
    }

    /// Element-wise minimum of two images.
    ///
    /// # Examples
    ///
    /// ```
    /// use tomoclean_core::Image;
    ///
    /// let a = Image::from_data(2, 1, vec![1.0, 5.0]).unwrap();
    /// let b = Image::from_data(2, 1, vec![3.0, 2.0]).unwrap();
    /// assert_eq!(a.minimum(&b).unwrap().data(), &[1.0, 2.0]);
    /// ```
    pub fn minimum(&self, other: &Image) -> Result<Image> {
        self.zip_map(other, f32::min)
    }

    /// Divide by `denominator` element-wise, producing 0 wherever the
    /// denominator is not strictly positive.
    pub fn div_guarded(&self, denominator: &Image) -> Result<Image> {
        self.zip_map(denominator, |a, b| if b > 0.0 { a / b } else { 0.0 })
    }
}
