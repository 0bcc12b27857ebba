//! Pairwise frame reduction
//!
//! The detector records two exposures per angle. Taking their element-wise
//! minimum suppresses spikes present in only one of them. Angle `k` uses
//! frames `2k` and `2k + 1` in acquisition order.

use crate::error::PipelineResult;
use rayon::prelude::*;
use std::path::PathBuf;
use tomoclean_core::{Error, Image, ProjectionStack, Roi};
use tomoclean_io::read_tiff_file;
use tracing::{debug, warn};

/// Reduces frame pairs to one cropped projection per angle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairwiseReducer {
    roi: Option<Roi>,
    n_angles: Option<usize>,
}

impl PairwiseReducer {
    pub fn new(roi: Option<Roi>, n_angles: Option<usize>) -> Self {
        PairwiseReducer { roi, n_angles }
    }

    pub fn roi(&self) -> Option<&Roi> {
        self.roi.as_ref()
    }

    /// Number of angles produced from `frame_count` frames.
    ///
    /// An odd trailing frame is ignored with a warning.
    ///
    /// # Errors
    ///
    /// - `Error::EmptyStack` if fewer than two frames are given.
    /// - `Error::InvalidParameter` if the configured angle count exceeds
    ///   the number of complete pairs, or is 0.
    pub fn pair_count(&self, frame_count: usize) -> PipelineResult<usize> {
        let pairs = frame_count / 2;
        if pairs == 0 {
            return Err(Error::EmptyStack.into());
        }
        if frame_count % 2 == 1 {
            warn!(frame_count, "odd number of frames, ignoring the last one");
        }
        match self.n_angles {
            Some(0) => Err(Error::InvalidParameter("angle count must be >= 1".to_string()).into()),
            Some(n) if n > pairs => Err(Error::InvalidParameter(format!(
                "{n} angles requested but only {pairs} frame pairs available"
            ))
            .into()),
            Some(n) => Ok(n),
            None => Ok(pairs),
        }
    }

    /// Element-wise minimum of two frames, cropped to the region.
    pub fn reduce_pair(&self, first: &Image, second: &Image) -> PipelineResult<Image> {
        let reduced = first.minimum(second)?;
        Ok(match &self.roi {
            Some(roi) => reduced.crop(roi)?,
            None => reduced,
        })
    }

    /// Crop a single image (e.g. the flat field) to the region.
    pub fn crop(&self, image: &Image) -> PipelineResult<Image> {
        Ok(match &self.roi {
            Some(roi) => image.crop(roi)?,
            None => image.clone(),
        })
    }

    /// Reduce in-memory frames to one projection per angle.
    pub fn reduce_frames(&self, frames: &[Image]) -> PipelineResult<ProjectionStack> {
        let n = self.pair_count(frames.len())?;
        let images = (0..n)
            .into_par_iter()
            .map(|k| self.reduce_pair(&frames[2 * k], &frames[2 * k + 1]))
            .collect::<PipelineResult<Vec<Image>>>()?;
        debug!(angles = n, "reduced frame pairs");
        Ok(ProjectionStack::from_images(images)?)
    }

    /// Read and reduce frame files pair by pair.
    ///
    /// Only the two frames of a pair are held in memory per worker.
    pub fn reduce_paths(&self, paths: &[PathBuf]) -> PipelineResult<ProjectionStack> {
        let n = self.pair_count(paths.len())?;
        let images = (0..n)
            .into_par_iter()
            .map(|k| {
                let first = read_tiff_file(&paths[2 * k])?;
                let second = read_tiff_file(&paths[2 * k + 1])?;
                self.reduce_pair(&first, &second)
            })
            .collect::<PipelineResult<Vec<Image>>>()?;
        debug!(angles = n, "reduced frame files");
        Ok(ProjectionStack::from_images(images)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineError;

    fn frame(v: f32) -> Image {
        Image::from_fn(6, 4, |x, y| v + (x + y) as f32).unwrap()
    }

    #[test]
    fn test_pair_minimum_is_commutative() {
        let reducer = PairwiseReducer::default();
        let a = Image::from_fn(5, 5, |x, y| (x * 3 + y) as f32 % 7.0).unwrap();
        let b = Image::from_fn(5, 5, |x, y| (y * 5 + x) as f32 % 4.0).unwrap();
        assert_eq!(
            reducer.reduce_pair(&a, &b).unwrap(),
            reducer.reduce_pair(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_odd_trailing_frame_ignored() {
        let frames = vec![frame(1.0), frame(0.0), frame(5.0), frame(7.0), frame(9.0)];
        let stack = PairwiseReducer::default().reduce_frames(&frames).unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.get(0).unwrap(), &frame(0.0));
        assert_eq!(stack.get(1).unwrap(), &frame(5.0));
    }

    #[test]
    fn test_crop_applied() {
        let roi = Roi::new(1..3, 2..5).unwrap();
        let frames = vec![frame(0.0), frame(1.0)];
        let stack = PairwiseReducer::new(Some(roi), None)
            .reduce_frames(&frames)
            .unwrap();
        assert_eq!(stack.dimensions(), Some((3, 2)));
        assert_eq!(stack.get(0).unwrap().get_pixel(0, 0).unwrap(), 3.0);
    }

    #[test]
    fn test_angle_count_limits() {
        let reducer = PairwiseReducer::new(None, Some(3));
        assert!(matches!(
            reducer.pair_count(5),
            Err(PipelineError::Core(Error::InvalidParameter(_)))
        ));
        assert_eq!(reducer.pair_count(6).unwrap(), 3);
        assert_eq!(PairwiseReducer::new(None, Some(1)).pair_count(6).unwrap(), 1);
        assert!(PairwiseReducer::default().pair_count(1).is_err());
    }
}
