//! Projection angle arrays

use tomoclean_core::{Error, Result};

/// Evenly spaced angles from `start_deg` to `end_deg` inclusive, in
/// radians.
///
/// A single angle is `start_deg`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `count == 0` or an endpoint is not
/// finite.
///
/// # Examples
///
/// ```
/// use tomoclean_recon::angles_linspace;
///
/// let theta = angles_linspace(0.0, 180.0, 3).unwrap();
/// assert!((theta[1] - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
/// ```
pub fn angles_linspace(start_deg: f64, end_deg: f64, count: usize) -> Result<Vec<f32>> {
    if count == 0 {
        return Err(Error::InvalidParameter(
            "angle count must be >= 1".to_string(),
        ));
    }
    if !start_deg.is_finite() || !end_deg.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "angle range must be finite, got {start_deg}..{end_deg}"
        )));
    }
    if count == 1 {
        return Ok(vec![start_deg.to_radians() as f32]);
    }
    let step = (end_deg - start_deg) / (count - 1) as f64;
    Ok((0..count)
        .map(|i| {
            // Pin the last sample to the endpoint exactly
            let deg = if i == count - 1 {
                end_deg
            } else {
                start_deg + step * i as f64
            };
            deg.to_radians() as f32
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_inclusive() {
        let theta = angles_linspace(-240.0, -59.4, 259).unwrap();
        assert_eq!(theta.len(), 259);
        assert!((theta[0] - (-240.0f64).to_radians() as f32).abs() < 1e-6);
        assert!((theta[258] - (-59.4f64).to_radians() as f32).abs() < 1e-6);
        let step = theta[1] - theta[0];
        assert!((step - (180.6f64 / 258.0).to_radians() as f32).abs() < 1e-6);
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(angles_linspace(90.0, 180.0, 1).unwrap().len(), 1);
        assert!(angles_linspace(0.0, 1.0, 0).is_err());
        assert!(angles_linspace(f64::NAN, 1.0, 4).is_err());
    }
}
