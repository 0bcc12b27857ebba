//! Image statistics
//!
//! Reductions over all pixels. Sums are accumulated in `f64` so that large
//! detector frames do not lose precision.

use super::Image;

impl Image {
    /// Find the minimum value and its location
    ///
    /// Returns `(min_value, x, y)` where (x, y) is the location of the first
    /// occurrence of the minimum value. NaN pixels are ignored.
    pub fn min(&self) -> Option<(f32, u32, u32)> {
        self.extreme(|candidate, best| candidate < best)
    }

    /// Find the minimum value only
    pub fn min_value(&self) -> Option<f32> {
        self.min().map(|(v, _, _)| v)
    }

    /// Find the maximum value and its location
    ///
    /// Returns `(max_value, x, y)` where (x, y) is the location of the first
    /// occurrence of the maximum value. NaN pixels are ignored.
    pub fn max(&self) -> Option<(f32, u32, u32)> {
        self.extreme(|candidate, best| candidate > best)
    }

    /// Find the maximum value only
    pub fn max_value(&self) -> Option<f32> {
        self.max().map(|(v, _, _)| v)
    }

    fn extreme<F>(&self, better: F) -> Option<(f32, u32, u32)>
    where
        F: Fn(f32, f32) -> bool,
    {
        let w = self.width() as usize;
        let mut best: Option<(f32, u32, u32)> = None;
        for (idx, &v) in self.data().iter().enumerate() {
            if v.is_nan() {
                continue;
            }
            match best {
                Some((b, _, _)) if !better(v, b) => {}
                _ => best = Some((v, (idx % w) as u32, (idx / w) as u32)),
            }
        }
        best
    }

    /// Smallest strictly positive value, if any pixel is positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use tomoclean_core::Image;
    ///
    /// let image = Image::from_data(3, 1, vec![-2.0, 0.0, 7.5]).unwrap();
    /// assert_eq!(image.min_positive(), Some(7.5));
    /// ```
    pub fn min_positive(&self) -> Option<f32> {
        self.data()
            .iter()
            .copied()
            .filter(|&v| v > 0.0)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f32| m.min(v))))
    }

    /// Sum of all pixels
    pub fn sum(&self) -> f64 {
        self.data().iter().map(|&v| v as f64).sum()
    }

    /// Mean pixel value
    pub fn mean(&self) -> f64 {
        self.sum() / self.len() as f64
    }

    /// Population standard deviation (normalized by N, not N - 1).
    pub fn std(&self) -> f64 {
        let mean = self.mean();
        let var = self
            .data()
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / self.len() as f64;
        var.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_location() {
        let image = Image::from_data(3, 2, vec![5.0, 1.0, 3.0, 9.0, 1.0, 2.0]).unwrap();
        assert_eq!(image.min(), Some((1.0, 1, 0)));
        assert_eq!(image.max(), Some((9.0, 0, 1)));
    }

    #[test]
    fn test_extremes_skip_nan() {
        let image = Image::from_data(3, 1, vec![f32::NAN, 4.0, 2.0]).unwrap();
        assert_eq!(image.min_value(), Some(2.0));
        assert_eq!(image.max_value(), Some(4.0));
    }

    #[test]
    fn test_min_positive_none() {
        let image = Image::new_with_value(2, 2, -1.0).unwrap();
        assert_eq!(image.min_positive(), None);
    }

    #[test]
    fn test_population_std() {
        // values 2,4,4,4,5,5,7,9 -> mean 5, population std 2
        let image =
            Image::from_data(4, 2, vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((image.mean() - 5.0).abs() < 1e-12);
        assert!((image.std() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_std_is_zero() {
        let image = Image::new_with_value(8, 8, 3.25).unwrap();
        assert_eq!(image.std(), 0.0);
    }
}
