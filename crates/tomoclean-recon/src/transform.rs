//! Transmission-to-attenuation transform and output finishing

use tomoclean_core::{Image, ProjectionStack, Result, Volume};

/// Transmission clip bounds applied before taking the logarithm.
pub const LOG_CLIP_MIN: f32 = 1e-3;
pub const LOG_CLIP_MAX: f32 = 10.0;

/// Attenuation `-ln(clip(p, 1e-3, 10))` of a transmission image.
pub fn log_transform(image: &Image) -> Image {
    image.map(|p| {
        let p = if p.is_nan() {
            LOG_CLIP_MIN
        } else {
            p.clamp(LOG_CLIP_MIN, LOG_CLIP_MAX)
        };
        -p.ln()
    })
}

/// Apply [`log_transform`] to every projection in parallel.
pub fn log_transform_stack(stack: &ProjectionStack) -> Result<ProjectionStack> {
    stack.map(log_transform)
}

/// Clamp negative voxels to 0 and optionally reverse the slice order.
pub fn finish_volume(volume: &Volume, reverse: bool) -> Result<Volume> {
    let clamped = volume.map(|slice| slice.clamp_min(0.0))?;
    Ok(if reverse { clamped.reversed() } else { clamped })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_transform_values() {
        let image = Image::from_data(4, 1, vec![1.0, 0.0, 100.0, f32::NAN]).unwrap();
        let out = log_transform(&image);
        let d = out.data();
        assert_eq!(d[0], 0.0);
        assert!((d[1] - 3.0 * std::f32::consts::LN_10).abs() < 1e-5);
        assert!((d[2] + std::f32::consts::LN_10).abs() < 1e-5);
        assert_eq!(d[3], d[1]);
    }

    #[test]
    fn test_finish_volume() {
        let volume = Volume::from_images(vec![
            Image::from_data(2, 1, vec![-1.0, 2.0]).unwrap(),
            Image::from_data(2, 1, vec![3.0, -4.0]).unwrap(),
        ])
        .unwrap();
        let out = finish_volume(&volume, true).unwrap();
        assert_eq!(out.get(0).unwrap().data(), &[3.0, 0.0]);
        assert_eq!(out.get(1).unwrap().data(), &[0.0, 2.0]);
        let kept = finish_volume(&volume, false).unwrap();
        assert_eq!(kept.get(0).unwrap().data(), &[0.0, 2.0]);
    }
}
