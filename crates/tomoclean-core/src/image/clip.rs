//! Rectangular region extraction
//!
//! Detector frames are usually cropped to the region that contains the
//! sample before any correction is applied. [`Roi`] holds that region as
//! half-open row and column ranges.

use super::Image;
use crate::error::{Error, Result};
use std::ops::Range;

/// Rectangular region of interest.
///
/// `rows` selects image rows (`y`), `cols` selects columns (`x`); both
/// ranges are half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roi {
    rows: Range<u32>,
    cols: Range<u32>,
}

impl Roi {
    /// Create a region from row and column ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if either range is empty.
    pub fn new(rows: Range<u32>, cols: Range<u32>) -> Result<Self> {
        if rows.is_empty() || cols.is_empty() {
            return Err(Error::InvalidParameter(format!(
                "empty crop region: rows {rows:?}, cols {cols:?}"
            )));
        }
        Ok(Roi { rows, cols })
    }

    /// Row range
    pub fn rows(&self) -> Range<u32> {
        self.rows.clone()
    }

    /// Column range
    pub fn cols(&self) -> Range<u32> {
        self.cols.clone()
    }

    /// Width of the region (number of columns)
    pub fn width(&self) -> u32 {
        self.cols.end - self.cols.start
    }

    /// Height of the region (number of rows)
    pub fn height(&self) -> u32 {
        self.rows.end - self.rows.start
    }

    /// Whether the region lies inside an image of the given size.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.rows.end <= height && self.cols.end <= width
    }
}

impl Image {
    /// Extract the pixels inside `roi` as a new image.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the region extends past the
    /// image boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// use tomoclean_core::{Image, Roi};
    ///
    /// let image = Image::from_fn(6, 4, |x, y| (10 * y + x) as f32).unwrap();
    /// let roi = Roi::new(1..3, 2..5).unwrap();
    /// let cropped = image.crop(&roi).unwrap();
    /// assert_eq!(cropped.dimensions(), (3, 2));
    /// assert_eq!(cropped.get_pixel(0, 0).unwrap(), 12.0);
    /// ```
    pub fn crop(&self, roi: &Roi) -> Result<Image> {
        if !roi.fits(self.width(), self.height()) {
            return Err(Error::InvalidParameter(format!(
                "crop region rows {:?}, cols {:?} exceeds {}x{} image",
                roi.rows,
                roi.cols,
                self.width(),
                self.height()
            )));
        }

        let mut data = Vec::with_capacity((roi.width() as usize) * (roi.height() as usize));
        let (c0, c1) = (roi.cols.start as usize, roi.cols.end as usize);
        for y in roi.rows() {
            data.extend_from_slice(&self.row(y)[c0..c1]);
        }
        Image::from_data(roi.width(), roi.height(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roi_rejects_empty_range() {
        assert!(Roi::new(3..3, 0..4).is_err());
        assert!(Roi::new(0..4, 5..2).is_err());
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let image = Image::new(10, 10).unwrap();
        let roi = Roi::new(0..11, 0..10).unwrap();
        assert!(matches!(image.crop(&roi), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_crop_full_image_is_identity() {
        let image = Image::from_fn(5, 3, |x, y| (x * y) as f32).unwrap();
        let roi = Roi::new(0..3, 0..5).unwrap();
        assert_eq!(image.crop(&roi).unwrap(), image);
    }
}
