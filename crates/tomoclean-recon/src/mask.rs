//! Radial soft masks
//!
//! Both masks are centred on `(width / 2, height / 2)` with integer
//! division, matching the pixel grid the reconstruction engine uses for
//! its rotation axis.

use crate::ReconResult;
use tomoclean_core::{Error, Image, Result, SoftMask};
use tomoclean_filter::gaussian_filter;

fn check_radius(name: &str, radius: f32) -> Result<()> {
    if !(radius >= 0.0 && radius.is_finite()) {
        return Err(Error::InvalidParameter(format!(
            "{name} must be >= 0, got {radius}"
        )));
    }
    Ok(())
}

/// Ring-blend mask: 0 inside `radius`, rising as a Gaussian
/// complement outside it.
///
/// `m(d) = 1 - exp(-(d - radius)^2 / (2 sigma^2))` for `d > radius`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` unless `radius >= 0` and `sigma > 0`,
/// and `Error::InvalidDimension` for a zero-sized mask.
pub fn ring_mask(width: u32, height: u32, radius: f32, sigma: f32) -> ReconResult<SoftMask> {
    check_radius("ring radius", radius)?;
    if !(sigma > 0.0 && sigma.is_finite()) {
        return Err(
            Error::InvalidParameter(format!("ring sigma must be > 0, got {sigma}")).into(),
        );
    }
    let (cx, cy) = ((width / 2) as f32, (height / 2) as f32);
    let two_sigma2 = 2.0 * sigma * sigma;
    Ok(SoftMask::from_fn(width, height, |x, y| {
        let d = (x as f32 - cx).hypot(y as f32 - cy);
        if d <= radius {
            0.0
        } else {
            let t = d - radius;
            1.0 - (-(t * t) / two_sigma2).exp()
        }
    })?)
}

/// Fusion mask: a binary disk of `radius_cut` blurred by `sigma_blur`.
///
/// A pixel is inside the disk when `(x - cx)^2 + (y - cy)^2 <=
/// radius_cut^2`. `sigma_blur == 0` keeps the hard edge.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` for a negative radius or sigma.
pub fn fusion_mask(
    width: u32,
    height: u32,
    radius_cut: f32,
    sigma_blur: f32,
) -> ReconResult<SoftMask> {
    check_radius("fusion radius", radius_cut)?;
    check_radius("fusion blur sigma", sigma_blur)?;
    let (cx, cy) = ((width / 2) as i64, (height / 2) as i64);
    let r2 = radius_cut as f64 * radius_cut as f64;
    let disk = Image::from_fn(width, height, |x, y| {
        let (dx, dy) = (x as i64 - cx, y as i64 - cy);
        if ((dx * dx + dy * dy) as f64) <= r2 { 1.0 } else { 0.0 }
    })?;
    let blurred = gaussian_filter(&disk, sigma_blur)?;
    Ok(SoftMask::from_image(&blurred))
}
