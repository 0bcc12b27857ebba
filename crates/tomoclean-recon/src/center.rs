//! Rotation-center calibration
//!
//! The rotation axis drifts slightly across detector rows. An operator
//! reads the centre off two rows by hand; the line through those two
//! points gives the centre for any row.

use tomoclean_core::{Error, Result};

/// Default calibration points `(row, center)` for the reference scanner.
pub const DEFAULT_CENTER_POINTS: [(f64, f64); 2] = [(400.0, 458.0), (1200.0, 453.0)];
/// Default row at which the fixed reconstruction centre is taken.
pub const DEFAULT_REFERENCE_ROW: f64 = 958.0;

/// Linear rotation-centre model `center = slope * row + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterCalibration {
    slope: f64,
    intercept: f64,
}

impl CenterCalibration {
    /// Fit the line through two `(row, center)` points.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if both points share a row or a
    /// coordinate is not finite.
    pub fn from_points(p1: (f64, f64), p2: (f64, f64)) -> Result<Self> {
        let finite = [p1.0, p1.1, p2.0, p2.1].iter().all(|v| v.is_finite());
        if !finite {
            return Err(Error::InvalidParameter(format!(
                "calibration points must be finite, got {p1:?} and {p2:?}"
            )));
        }
        if p1.0 == p2.0 {
            return Err(Error::InvalidParameter(format!(
                "calibration points share row {}",
                p1.0
            )));
        }
        let slope = (p2.1 - p1.1) / (p2.0 - p1.0);
        Ok(CenterCalibration {
            slope,
            intercept: p1.1 - slope * p1.0,
        })
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Rotation centre at detector row `row`.
    pub fn center_at(&self, row: f64) -> f64 {
        self.slope * row + self.intercept
    }
}

impl Default for CenterCalibration {
    fn default() -> Self {
        let [(r1, c1), (r2, c2)] = DEFAULT_CENTER_POINTS;
        let slope = (c2 - c1) / (r2 - r1);
        CenterCalibration {
            slope,
            intercept: c1 - slope * r1,
        }
    }
}
