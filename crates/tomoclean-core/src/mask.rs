//! SoftMask - Weight field for blending two image variants
//!
//! A soft mask assigns every pixel a weight in `[0, 1]`. Blending with a
//! mask replaces a hard cutoff between two versions of the same data with
//! a smooth transition.
//!
//! The `[0, 1]` invariant is established at construction, so consumers
//! never need to clamp again.

use crate::error::Result;
use crate::image::Image;

/// Image of blend weights, each in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftMask {
    weights: Image,
}

impl SoftMask {
    /// Wrap an image as a mask, clamping every weight into `[0, 1]`.
    ///
    /// NaN weights become 0.
    pub fn from_image(image: &Image) -> Self {
        SoftMask {
            weights: image.clip(0.0, 1.0),
        }
    }

    /// Build a mask by evaluating `f(x, y)` at every pixel, then clamping.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Result<Self>
    where
        F: Fn(u32, u32) -> f32,
    {
        Ok(Self::from_image(&Image::from_fn(width, height, f)?))
    }

    /// Get the weights as an image
    pub fn image(&self) -> &Image {
        &self.weights
    }

    /// Mask dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.weights.dimensions()
    }

    /// Weight at (x, y)
    pub fn weight(&self, x: u32, y: u32) -> Result<f32> {
        self.weights.get_pixel(x, y)
    }

    /// Blend two images: `base * (1 - mask) + overlay * mask`.
    ///
    /// Where the mask is 0 the result is `base`; where it is 1 the result is
    /// `overlay`. Every output pixel lies between the two inputs.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if either image differs in shape from
    /// the mask.
    ///
    /// # Examples
    ///
    /// ```
    /// use tomoclean_core::{Image, SoftMask};
    ///
    /// let mask = SoftMask::from_fn(2, 1, |x, _| x as f32).unwrap();
    /// let base = Image::new_with_value(2, 1, 10.0).unwrap();
    /// let overlay = Image::new_with_value(2, 1, 20.0).unwrap();
    /// assert_eq!(mask.blend(&base, &overlay).unwrap().data(), &[10.0, 20.0]);
    /// ```
    pub fn blend(&self, base: &Image, overlay: &Image) -> Result<Image> {
        self.weights.check_same_size(base)?;
        self.weights.check_same_size(overlay)?;
        let mut result = self.weights.create_template();
        for ((dst, &m), (&b, &o)) in result
            .data_mut()
            .iter_mut()
            .zip(self.weights.data())
            .zip(base.data().iter().zip(overlay.data()))
        {
            *dst = b * (1.0 - m) + o * m;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_from_image_clamps() {
        let image = Image::from_data(4, 1, vec![-0.5, 0.25, 1.5, f32::NAN]).unwrap();
        let mask = SoftMask::from_image(&image);
        assert_eq!(mask.image().data(), &[0.0, 0.25, 1.0, 0.0]);
    }

    #[test]
    fn test_blend_is_convex() {
        let mask = SoftMask::from_fn(5, 5, |x, y| (x + y) as f32 / 8.0).unwrap();
        let base = Image::from_fn(5, 5, |x, _| x as f32 * 3.0).unwrap();
        let overlay = Image::from_fn(5, 5, |_, y| 10.0 - y as f32).unwrap();
        let out = mask.blend(&base, &overlay).unwrap();
        for i in 0..out.len() {
            let (b, o) = (base.data()[i], overlay.data()[i]);
            let v = out.data()[i];
            assert!(v >= b.min(o) - 1e-5 && v <= b.max(o) + 1e-5);
        }
    }

    #[test]
    fn test_blend_shape_mismatch() {
        let mask = SoftMask::from_fn(3, 3, |_, _| 0.5).unwrap();
        let a = Image::new(3, 3).unwrap();
        let b = Image::new(4, 3).unwrap();
        assert!(matches!(mask.blend(&b, &a), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(mask.blend(&a, &b), Err(Error::ShapeMismatch { .. })));
    }
}
