//! Image - Floating-point grayscale image
//!
//! `Image` is a 2D array of `f32` intensities. Projections, flat fields,
//! reconstructed slices and soft masks are all stored as `Image`.
//!
//! Every operation in this workspace treats `Image` as a value: filters
//! borrow their input and return a new image of identical shape.
//!
//! See [`arith`], [`statistics`] and [`clip`] for the element-wise,
//! reduction and cropping operations.
//!
//! # Examples
//!
//! ```
//! use tomoclean_core::Image;
//!
//! // Create a 100x100 image
//! let mut image = Image::new(100, 100).unwrap();
//!
//! // Set and get pixel values
//! image.set_pixel(10, 20, 0.5).unwrap();
//! assert_eq!(image.get_pixel(10, 20).unwrap(), 0.5);
//!
//! // Get statistics
//! let (max_val, max_x, max_y) = image.max().unwrap();
//! assert_eq!((max_val, max_x, max_y), (0.5, 10, 20));
//! ```

pub mod arith;
pub mod clip;
pub mod statistics;

use crate::error::{Error, Result};

/// Floating-point image
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding. The pixel at (x, y)
/// is at index `y * width + x`; `x` is the column and `y` the row.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Width in pixels (number of columns)
    width: u32,
    /// Height in pixels (number of rows)
    height: u32,
    /// Pixel data (row-major, no padding)
    data: Vec<f32>,
}

impl Image {
    /// Create a new image with all pixels set to zero
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels (must be > 0)
    /// * `height` - Height in pixels (must be > 0)
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use tomoclean_core::Image;
    ///
    /// let image = Image::new(640, 480).unwrap();
    /// assert_eq!(image.width(), 640);
    /// assert_eq!(image.height(), 480);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, 0.0)
    }

    /// Create a new image with all pixels set to the specified value
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new_with_value(width: u32, height: u32, value: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let size = (width as usize) * (height as usize);
        Ok(Image {
            width,
            height,
            data: vec![value; size],
        })
    }

    /// Create an image from raw row-major data
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let expected_size = (width as usize) * (height as usize);
        if data.len() != expected_size {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected_size
            )));
        }

        Ok(Image {
            width,
            height,
            data,
        })
    }

    /// Create an image by evaluating `f(x, y)` at every pixel
    ///
    /// # Examples
    ///
    /// ```
    /// use tomoclean_core::Image;
    ///
    /// let ramp = Image::from_fn(4, 2, |x, y| (x + 10 * y) as f32).unwrap();
    /// assert_eq!(ramp.get_pixel(3, 1).unwrap(), 13.0);
    /// ```
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Result<Self>
    where
        F: Fn(u32, u32) -> f32,
    {
        let mut image = Self::new(width, height)?;
        for y in 0..height {
            let row = image.row_mut(y);
            for (x, v) in row.iter_mut().enumerate() {
                *v = f(x as u32, y);
            }
        }
        Ok(image)
    }

    /// Get the image width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the image dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed image; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the pixel value at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<f32> {
        let idx = self.checked_index(x, y)?;
        Ok(self.data[idx])
    }

    /// Set the pixel value at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: f32) -> Result<()> {
        let idx = self.checked_index(x, y)?;
        self.data[idx] = value;
        Ok(())
    }

    fn checked_index(&self, x: u32, y: u32) -> Result<usize> {
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: idx,
                len: self.data.len(),
            });
        }
        Ok(idx)
    }

    /// Get raw access to the pixel data
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable access to the pixel data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Get a row of pixel data
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[f32] {
        let start = (y as usize) * (self.width as usize);
        &self.data[start..start + self.width as usize]
    }

    /// Get a mutable row of pixel data
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [f32] {
        let start = (y as usize) * (self.width as usize);
        let end = start + self.width as usize;
        &mut self.data[start..end]
    }

    /// Create a zeroed image with the same dimensions.
    pub fn create_template(&self) -> Image {
        Image {
            width: self.width,
            height: self.height,
            data: vec![0.0; self.data.len()],
        }
    }

    /// Check that two images have the same dimensions
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` with `self` as the expected shape.
    pub fn check_same_size(&self, other: &Image) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::ShapeMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_dimension() {
        assert!(matches!(
            Image::new(0, 5),
            Err(Error::InvalidDimension {
                width: 0,
                height: 5
            })
        ));
        assert!(Image::new_with_value(5, 0, 1.0).is_err());
    }

    #[test]
    fn test_from_data_length_mismatch() {
        let result = Image::from_data(3, 2, vec![0.0; 5]);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_row_major_layout() {
        let image = Image::from_fn(3, 2, |x, y| (y * 3 + x) as f32).unwrap();
        assert_eq!(image.data(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(image.row(1), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut image = Image::new(4, 4).unwrap();
        assert!(image.get_pixel(4, 0).is_err());
        assert!(image.set_pixel(0, 4, 1.0).is_err());
    }

    #[test]
    fn test_check_same_size() {
        let a = Image::new(4, 3).unwrap();
        let b = Image::new(3, 4).unwrap();
        match a.check_same_size(&b) {
            Err(Error::ShapeMismatch { expected, actual }) => {
                assert_eq!(expected, (4, 3));
                assert_eq!(actual, (3, 4));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(a.check_same_size(&a.create_template()).is_ok());
    }
}
