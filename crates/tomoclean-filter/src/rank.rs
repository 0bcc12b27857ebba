//! Rank filtering operations
//!
//! Order-statistic filters over a rectangular window. The median filter is
//! the workhorse of projection correction: a 3x3 median feeds the outlier
//! detectors, and 1xN / Nx1 medians remove directional stripes.
//!
//! Windows are `width` columns by `height` rows with the origin at
//! `(width / 2, height / 2)`; samples outside the image come from edge
//! reflection (see [`crate::border`]). Output rows are computed in
//! parallel.

use crate::FilterResult;
use crate::border::reflect_index;
use rayon::prelude::*;
use tomoclean_core::{Error, Image};

/// Apply a rank filter.
///
/// # Arguments
/// * `image` - Input image
/// * `width` - Filter window width (columns), >= 1
/// * `height` - Filter window height (rows), >= 1
/// * `rank` - Rank value in [0.0, 1.0] (0.0=min, 0.5=median, 1.0=max)
///
/// # Errors
///
/// Returns `Error::InvalidParameter` for a zero-sized window or a rank
/// outside `[0, 1]`.
pub fn rank_filter(image: &Image, width: u32, height: u32, rank: f32) -> FilterResult<Image> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidParameter(format!(
            "rank filter window must be at least 1x1, got {width}x{height}"
        ))
        .into());
    }
    if !(0.0..=1.0).contains(&rank) {
        return Err(Error::InvalidParameter(format!("rank must be in [0, 1], got {rank}")).into());
    }
    if width == 1 && height == 1 {
        return Ok(image.clone());
    }

    let w = image.width() as usize;
    let h = image.height() as usize;
    let (wf, hf) = (width as isize, height as isize);
    let (x_before, y_before) = (wf / 2, hf / 2);
    let n = (width * height) as usize;
    let select = (rank * (n - 1) as f32 + 0.5).floor() as usize;

    // Reflected column indices for every (x, dx) pair
    let col_index: Vec<usize> = (0..w as isize)
        .flat_map(|x| (0..wf).map(move |dx| reflect_index(x + dx - x_before, w)))
        .collect();

    let mut out = image.create_template();
    out.data_mut()
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, out_row)| {
            let rows: Vec<&[f32]> = (0..hf)
                .map(|dy| image.row(reflect_index(y as isize + dy - y_before, h) as u32))
                .collect();
            let mut window = Vec::with_capacity(n);
            for (x, dst) in out_row.iter_mut().enumerate() {
                window.clear();
                let cols = &col_index[x * width as usize..(x + 1) * width as usize];
                for row in &rows {
                    window.extend(cols.iter().map(|&c| row[c]));
                }
                let (_, v, _) = window.select_nth_unstable_by(select, f32::total_cmp);
                *dst = *v;
            }
        });

    Ok(out)
}

/// Apply median filter (rank = 0.5).
///
/// # Examples
///
/// ```
/// use tomoclean_core::Image;
/// use tomoclean_filter::median_filter;
///
/// let mut image = Image::new_with_value(5, 5, 1.0).unwrap();
/// image.set_pixel(2, 2, 100.0).unwrap();
/// let smoothed = median_filter(&image, 3, 3).unwrap();
/// assert_eq!(smoothed.get_pixel(2, 2).unwrap(), 1.0);
/// ```
pub fn median_filter(image: &Image, width: u32, height: u32) -> FilterResult<Image> {
    rank_filter(image, width, height, 0.5)
}
