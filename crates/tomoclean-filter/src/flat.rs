//! Flat-field preparation

use tomoclean_core::{Error, Image, Result};
use tracing::debug;

/// Dark-corrected flat-field image, strictly positive everywhere
#[derive(Debug, Clone, PartialEq)]
pub struct FlatField {
    image: Image,
}

impl FlatField {
    /// Prepare a raw flat-field acquisition.
    ///
    /// Subtracts `dark_value`, then replaces every pixel `<= 0` with the
    /// smallest positive pixel so that later division is well defined.
    ///
    /// # Errors
    ///
    /// Returns `Error::DegenerateInput` if no pixel is positive after dark
    /// subtraction.
    ///
    /// # Examples
    ///
    /// ```
    /// use tomoclean_core::Image;
    /// use tomoclean_filter::FlatField;
    ///
    /// let raw = Image::from_data(3, 1, vec![500.0, 700.0, 1600.0]).unwrap();
    /// let flat = FlatField::prepare(&raw, 600.0).unwrap();
    /// assert_eq!(flat.image().data(), &[100.0, 100.0, 1000.0]);
    /// ```
    pub fn prepare(raw: &Image, dark_value: f32) -> Result<Self> {
        let corrected = raw.sub_constant(dark_value);
        let floor = corrected.min_positive().ok_or_else(|| {
            Error::DegenerateInput(format!(
                "flat field has no positive pixel after subtracting dark value {dark_value}"
            ))
        })?;

        let substituted = corrected.data().iter().filter(|&&v| !(v > 0.0)).count();
        let image = corrected.map(|v| if v > 0.0 { v } else { floor });
        debug!(floor, substituted, "prepared flat field");
        Ok(FlatField { image })
    }

    /// The corrected flat-field image
    pub fn image(&self) -> &Image {
        &self.image
    }
}
