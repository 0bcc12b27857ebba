//! Global-variance outlier replacement
//!
//! Shared by the spike and stripe filters: pixels that stand out from a
//! reference (usually their local median) by more than `sigma` global
//! standard deviations of the residual are replaced by the reference.

use tomoclean_core::{Error, Image, Result};

/// Which residuals count as outliers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlierSide {
    /// Only `image - reference > threshold` (bright spikes)
    Positive,
    /// `|image - reference| > threshold` (hot and dead pixels)
    Both,
}

/// Replace outliers of `image` with the corresponding `reference` pixels.
///
/// The threshold is `sigma * std(image - reference)`, with the standard
/// deviation taken over the whole image.
///
/// Returns the corrected image and the number of pixels replaced.
///
/// # Errors
///
/// - `Error::ShapeMismatch` if the images differ in shape.
/// - `Error::DegenerateInput` if the residual has zero (or non-finite)
///   spread, in which case no pixel can be an outlier.
pub fn replace_outliers(
    image: &Image,
    reference: &Image,
    sigma: f32,
    side: OutlierSide,
) -> Result<(Image, usize)> {
    let diff = image.zip_map(reference, |a, b| a - b)?;
    let std = diff.std();
    if !std.is_finite() || std == 0.0 {
        return Err(Error::DegenerateInput(format!(
            "residual standard deviation is {std}"
        )));
    }

    let threshold = sigma as f64 * std;
    let mut out = image.clone();
    let mut replaced = 0usize;
    for ((dst, &d), &r) in out
        .data_mut()
        .iter_mut()
        .zip(diff.data())
        .zip(reference.data())
    {
        let d = d as f64;
        let flagged = match side {
            OutlierSide::Positive => d > threshold,
            OutlierSide::Both => d.abs() > threshold,
        };
        if flagged {
            *dst = r;
            replaced += 1;
        }
    }
    Ok((out, replaced))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_with(x0: u32, y0: u32, v: f32) -> Image {
        let mut image = Image::from_fn(9, 9, |x, y| 0.1 * (x + y) as f32).unwrap();
        image.set_pixel(x0, y0, v).unwrap();
        image
    }

    #[test]
    fn test_positive_side_ignores_dark_pixel() {
        let image = ramp_with(4, 4, -50.0);
        let reference = Image::from_fn(9, 9, |x, y| 0.1 * (x + y) as f32).unwrap();
        let (out, n) = replace_outliers(&image, &reference, 3.0, OutlierSide::Positive).unwrap();
        assert_eq!(n, 0);
        assert_eq!(out.get_pixel(4, 4).unwrap(), -50.0);

        let (out, n) = replace_outliers(&image, &reference, 3.0, OutlierSide::Both).unwrap();
        assert_eq!(n, 1);
        assert!((out.get_pixel(4, 4).unwrap() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_zero_spread_is_degenerate() {
        let image = Image::new_with_value(4, 4, 7.0).unwrap();
        let result = replace_outliers(&image, &image, 3.0, OutlierSide::Both);
        assert!(matches!(result, Err(Error::DegenerateInput(_))));
    }
}
