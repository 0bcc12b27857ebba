//! Convolution operations
//!
//! Separable convolution of an [`Image`] with a 1-D [`Kernel`], and the
//! Gaussian smoothing built on it. Borders use edge reflection.

use crate::border::{fill_padded, reflect_index};
use crate::kernel::GAUSSIAN_TRUNCATE;
use crate::{FilterResult, Kernel};
use rayon::prelude::*;
use tomoclean_core::Image;

/// Convolve every row of `image` with `kernel` (horizontal pass).
pub fn convolve_rows(image: &Image, kernel: &Kernel) -> Image {
    let w = image.width() as usize;
    let (before, after) = (kernel.before(), kernel.after());
    let kdata = kernel.data();

    let mut out = image.create_template();
    out.data_mut()
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, out_row)| {
            let mut padded = Vec::new();
            fill_padded(image.row(y as u32), before, after, &mut padded);
            for (x, dst) in out_row.iter_mut().enumerate() {
                *dst = padded[x..x + kdata.len()]
                    .iter()
                    .zip(kdata)
                    .map(|(&v, &k)| v * k)
                    .sum();
            }
        });
    out
}

/// Convolve every column of `image` with `kernel` (vertical pass).
pub fn convolve_cols(image: &Image, kernel: &Kernel) -> Image {
    let w = image.width() as usize;
    let h = image.height() as usize;
    let before = kernel.before() as isize;
    let kdata = kernel.data();

    let mut out = image.create_template();
    out.data_mut()
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, out_row)| {
            out_row.fill(0.0);
            for (k, &weight) in kdata.iter().enumerate() {
                let sy = reflect_index(y as isize + k as isize - before, h);
                for (dst, &v) in out_row.iter_mut().zip(image.row(sy as u32)) {
                    *dst += weight * v;
                }
            }
        });
    out
}

/// Convolve with the same 1-D kernel along rows, then along columns.
pub fn convolve_sep(image: &Image, kernel: &Kernel) -> Image {
    convolve_cols(&convolve_rows(image, kernel), kernel)
}

/// Apply isotropic Gaussian smoothing.
///
/// The kernel is truncated at four standard deviations. `sigma == 0`
/// returns a copy of the input.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` for negative sigma.
///
/// # Examples
///
/// ```
/// use tomoclean_core::Image;
/// use tomoclean_filter::gaussian_filter;
///
/// let flat = Image::new_with_value(8, 8, 3.0).unwrap();
/// let smoothed = gaussian_filter(&flat, 0.5).unwrap();
/// assert!(smoothed.data().iter().all(|&v| (v - 3.0).abs() < 1e-5));
/// ```
pub fn gaussian_filter(image: &Image, sigma: f32) -> FilterResult<Image> {
    let kernel = Kernel::gaussian(sigma, GAUSSIAN_TRUNCATE)?;
    if kernel.len() == 1 {
        return Ok(image.clone());
    }
    Ok(convolve_sep(image, &kernel))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_kernel() {
        let image = Image::from_fn(5, 4, |x, y| (x * 3 + y) as f32).unwrap();
        let out = convolve_sep(&image, &Kernel::identity());
        assert_eq!(out, image);
    }

    #[test]
    fn test_rows_keep_interior_ramp() {
        // A symmetric kernel leaves a linear ramp unchanged away from the
        // edges; at x = 0 the reflected window [3, 0, 0, 3, 6] lifts it.
        let image = Image::from_fn(8, 1, |x, _| (x * 3) as f32).unwrap();
        let k = Kernel::gaussian(0.5, GAUSSIAN_TRUNCATE).unwrap();
        let out = convolve_rows(&image, &k);
        for x in 2..6 {
            assert!((out.data()[x] - (x * 3) as f32).abs() < 1e-4);
        }
        assert!(out.data()[0] > 0.0);
    }

    #[test]
    fn test_cols_matches_transposed_rows() {
        let column = Image::from_fn(1, 9, |_, y| ((y * 5) % 7) as f32).unwrap();
        let row = Image::from_fn(9, 1, |x, _| ((x * 5) % 7) as f32).unwrap();
        let k = Kernel::gaussian(1.0, GAUSSIAN_TRUNCATE).unwrap();
        let by_cols = convolve_cols(&column, &k);
        let by_rows = convolve_rows(&row, &k);
        for (a, b) in by_cols.data().iter().zip(by_rows.data()) {
            assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }
    }

    #[test]
    fn test_gaussian_preserves_mass_and_shape() {
        let mut image = Image::new(21, 21).unwrap();
        image.set_pixel(10, 10, 1.0).unwrap();
        let out = gaussian_filter(&image, 2.0).unwrap();
        assert_eq!(out.dimensions(), (21, 21));
        assert!((out.sum() - 1.0).abs() < 1e-4);
        assert_eq!(out.max().map(|(_, x, y)| (x, y)), Some((10, 10)));
    }

    #[test]
    fn test_gaussian_zero_sigma() {
        let image = Image::from_fn(3, 3, |x, _| x as f32).unwrap();
        assert_eq!(gaussian_filter(&image, 0.0).unwrap(), image);
    }
}
