//! Deterministic stand-ins for the injected engines
//!
//! None of these perform real tomography. They only have the right shapes
//! and predictable values, so pipeline plumbing can be checked exactly.

use std::sync::{Arc, Mutex};
use tomoclean_core::{Error, Image, ImageStack, ProjectionStack, Volume};
use tomoclean_recon::{
    ReconError, ReconResult, Reconstructor, RingRemovalParams, RingRemover, StripeRemovalParams,
    StripeRemover,
};

/// Smears projections back along one axis.
///
/// Produces one `width x width` slice per detector row. Pixel `(x, z)` of
/// slice `y` is the mean over all angles of projection row `y` at column
/// `x`, plus the rotation centre times `center_gain`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeReconstructor {
    pub center_gain: f32,
}

impl Reconstructor for FakeReconstructor {
    fn reconstruct(
        &self,
        projections: &ProjectionStack,
        angles: &[f32],
        center: f32,
    ) -> ReconResult<Volume> {
        let Some((w, h)) = projections.dimensions() else {
            return Err(Error::EmptyStack.into());
        };
        if angles.len() != projections.len() {
            return Err(ReconError::collaborator(
                "reconstruction",
                format!(
                    "{} angles for {} projections",
                    angles.len(),
                    projections.len()
                ),
            ));
        }

        let n = projections.len() as f32;
        let offset = self.center_gain * center;
        let mut slices = Vec::with_capacity(h as usize);
        for y in 0..h {
            let mut profile = vec![0.0f32; w as usize];
            for proj in projections {
                for (acc, &v) in profile.iter_mut().zip(proj.row(y)) {
                    *acc += v;
                }
            }
            slices.push(Image::from_fn(w, w, |x, _| {
                profile[x as usize] / n + offset
            })?);
        }
        Ok(ImageStack::from_images(slices)?)
    }
}

/// Multiplies every projection by a constant factor.
///
/// Every parameter set it is called with is recorded; clones share the
/// record, so a clone kept by the test sees calls made by the pipeline.
#[derive(Debug, Clone)]
pub struct FakeStripeRemover {
    pub factor: f32,
    calls: Arc<Mutex<Vec<StripeRemovalParams>>>,
}

impl Default for FakeStripeRemover {
    fn default() -> Self {
        FakeStripeRemover::with_factor(1.0)
    }
}

impl FakeStripeRemover {
    pub fn with_factor(factor: f32) -> Self {
        FakeStripeRemover {
            factor,
            calls: Arc::default(),
        }
    }

    /// Parameters received so far, in call order
    pub fn calls(&self) -> Vec<StripeRemovalParams> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl StripeRemover for FakeStripeRemover {
    fn remove_stripe(
        &self,
        projections: &ProjectionStack,
        params: &StripeRemovalParams,
    ) -> ReconResult<ProjectionStack> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(params.clone());
        }
        let factor = self.factor;
        Ok(projections.map(|p| p.map(|v| v * factor))?)
    }
}

/// Adds a constant offset to every slice.
///
/// Records its parameters like [`FakeStripeRemover`].
#[derive(Debug, Clone, Default)]
pub struct FakeRingRemover {
    pub offset: f32,
    calls: Arc<Mutex<Vec<RingRemovalParams>>>,
}

impl FakeRingRemover {
    pub fn with_offset(offset: f32) -> Self {
        FakeRingRemover {
            offset,
            calls: Arc::default(),
        }
    }

    /// Parameters received so far, one entry per slice
    pub fn calls(&self) -> Vec<RingRemovalParams> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl RingRemover for FakeRingRemover {
    fn remove_ring(&self, slice: &Image, params: &RingRemovalParams) -> ReconResult<Image> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(*params);
        }
        Ok(slice.map(|v| v + self.offset))
    }
}

/// Engine that always fails, for error-path tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEngine;

impl Reconstructor for FailingEngine {
    fn reconstruct(&self, _: &ProjectionStack, _: &[f32], _: f32) -> ReconResult<Volume> {
        Err(ReconError::collaborator("reconstruction", "engine offline"))
    }
}

impl StripeRemover for FailingEngine {
    fn remove_stripe(
        &self,
        _: &ProjectionStack,
        _: &StripeRemovalParams,
    ) -> ReconResult<ProjectionStack> {
        Err(ReconError::collaborator("stripe removal", "engine offline"))
    }
}

impl RingRemover for FailingEngine {
    fn remove_ring(&self, _: &Image, _: &RingRemovalParams) -> ReconResult<Image> {
        Err(ReconError::collaborator("ring removal", "engine offline"))
    }
}
