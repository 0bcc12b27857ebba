//! End-to-end correction pipeline
//!
//! ```text
//! frame pairs -> PairwiseReducer -> ProjectionNormalizer -> projections
//! projections -> StripeRemover -> projections_fw
//! log transform (both) -> Reconstructor (both, fixed centre)
//! plain volume -> RingMaskBlender (RingRemover per slice) -> ring volume
//! FusionBlender(interior = fw volume, exterior = ring volume)
//! clamp >= 0 -> optional reversal -> output volume
//! ```
//!
//! Parameters are validated once in [`Pipeline::new`]. The external
//! engines are injected, so the pipeline itself never performs a
//! tomographic inversion.

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::reduce::PairwiseReducer;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tomoclean_core::{Error, Image, ProjectionStack, Volume};
use tomoclean_filter::{FlatField, ProjectionNormalizer};
use tomoclean_io::{TiffCompression, list_frames, read_tiff_file, write_stack_dir};
use tomoclean_recon::{
    FusionBlender, ReconError, Reconstructor, RingMaskBlender, RingRemovalParams, RingRemover,
    StripeRemovalParams, StripeRemover, angles_linspace, finish_volume, log_transform_stack,
};
use tracing::info;

/// Configured pipeline with its injected engines
pub struct Pipeline<R, S, G> {
    config: PipelineConfig,
    reducer: PairwiseReducer,
    normalizer: ProjectionNormalizer,
    ring: RingMaskBlender,
    ring_removal: RingRemovalParams,
    stripe_removal: StripeRemovalParams,
    fusion: FusionBlender,
    center: f32,
    reconstructor: R,
    stripe_remover: S,
    ring_remover: G,
}

impl<R, S, G> Pipeline<R, S, G>
where
    R: Reconstructor,
    S: StripeRemover,
    G: RingRemover,
{
    /// Validate `config` and bind the engines.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` (wrapped) for any out-of-range
    /// setting.
    pub fn new(
        config: PipelineConfig,
        reconstructor: R,
        stripe_remover: S,
        ring_remover: G,
    ) -> PipelineResult<Self> {
        let reducer = PairwiseReducer::new(config.roi()?, config.angles.count);
        let normalizer = ProjectionNormalizer::new(config.normalizer_params())?;
        let ring = RingMaskBlender::new(config.ring.radius, config.ring.sigma)?;
        let ring_removal = config.ring.removal_params();
        ring_removal.validate()?;
        let stripe_removal = config.stripe.removal_params();
        stripe_removal.validate()?;
        let fusion = FusionBlender::new(config.fusion.radius_cut, config.fusion.sigma_blur)?
            .with_depth(config.fusion.depth);
        let center = config.center.fixed_center()?;
        if !center.is_finite() {
            return Err(Error::InvalidParameter(format!("rotation center is {center}")).into());
        }
        if config.angles.count == Some(0) {
            return Err(Error::InvalidParameter("angle count must be >= 1".to_string()).into());
        }
        // Validate the angle range itself
        angles_linspace(config.angles.start_deg, config.angles.end_deg, 1)?;

        Ok(Pipeline {
            config,
            reducer,
            normalizer,
            ring,
            ring_removal,
            stripe_removal,
            fusion,
            center: center as f32,
            reconstructor,
            stripe_remover,
            ring_remover,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Rotation centre passed to the reconstructor
    pub fn center(&self) -> f32 {
        self.center
    }

    /// Prepare the flat field: crop, subtract dark, fill non-positive
    /// pixels.
    pub fn prepare_flat(&self, raw_flat: &Image) -> PipelineResult<FlatField> {
        let cropped = self.reducer.crop(raw_flat)?;
        Ok(FlatField::prepare(
            &cropped,
            self.config.normalize.dark_value,
        )?)
    }

    /// Reduce frame pairs and normalize them against `flat`.
    pub fn normalize_frames(
        &self,
        frames: &[Image],
        flat: &FlatField,
    ) -> PipelineResult<ProjectionStack> {
        let reduced = self.reducer.reduce_frames(frames)?;
        Ok(self.normalizer.normalize_stack(&reduced, flat)?)
    }

    /// Run every stage after normalization.
    pub fn reconstruct(&self, projections: &ProjectionStack) -> PipelineResult<Volume> {
        let angles = angles_linspace(
            self.config.angles.start_deg,
            self.config.angles.end_deg,
            projections.len(),
        )?;

        let start = Instant::now();
        let projections_fw = self
            .stripe_remover
            .remove_stripe(projections, &self.stripe_removal)?;
        if projections_fw.len() != projections.len()
            || projections_fw.dimensions() != projections.dimensions()
        {
            return Err(ReconError::collaborator(
                "stripe removal",
                "output stack shape differs from input",
            )
            .into());
        }
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "stripe removal done"
        );

        let attenuation = log_transform_stack(projections)?;
        let attenuation_fw = log_transform_stack(&projections_fw)?;

        let start = Instant::now();
        let recon = self
            .reconstructor
            .reconstruct(&attenuation, &angles, self.center)?;
        let recon_fw = self
            .reconstructor
            .reconstruct(&attenuation_fw, &angles, self.center)?;
        info!(
            slices = recon.len(),
            center = self.center,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "reconstruction done"
        );

        let recon_ring = self
            .ring
            .blend_volume(&recon, &self.ring_remover, &self.ring_removal)?;
        let fused = self.fusion.fuse(&recon_fw, &recon_ring)?;
        Ok(finish_volume(&fused, self.config.output.reverse)?)
    }

    /// Run the whole pipeline on in-memory frames.
    ///
    /// # Errors
    ///
    /// Fails on shape mismatches, a degenerate flat field, too few frames,
    /// or an engine failure.
    pub fn run(&self, frames: &[Image], raw_flat: &Image) -> PipelineResult<Volume> {
        let start = Instant::now();
        let flat = self.prepare_flat(raw_flat)?;
        let projections = self.normalize_frames(frames, &flat)?;
        info!(
            frames = frames.len(),
            angles = projections.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "projections normalized"
        );
        self.reconstruct(&projections)
    }

    /// Run the pipeline on a frame directory and write the output slices.
    ///
    /// Returns the written slice paths in order.
    pub fn run_dir<P, Q, O>(
        &self,
        input_dir: P,
        flat_path: Q,
        output_dir: O,
    ) -> PipelineResult<Vec<PathBuf>>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        O: AsRef<Path>,
    {
        let start = Instant::now();
        let paths = list_frames(input_dir)?;
        let flat = self.prepare_flat(&read_tiff_file(flat_path)?)?;
        let reduced = self.reducer.reduce_paths(&paths)?;
        let projections = self.normalizer.normalize_stack(&reduced, &flat)?;
        info!(
            frames = paths.len(),
            angles = projections.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "projections normalized"
        );

        let volume = self.reconstruct(&projections)?;
        Ok(write_stack_dir(
            &volume,
            output_dir,
            &self.config.output.prefix,
            TiffCompression::None,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineError;
    use tomoclean_recon::ReconResult;

    struct Mean;

    impl Reconstructor for Mean {
        fn reconstruct(&self, p: &ProjectionStack, _: &[f32], _: f32) -> ReconResult<Volume> {
            Ok(p.map(|img| Image::new_with_value(img.width(), img.width(), img.mean() as f32)
                .unwrap_or_else(|_| img.clone()))?)
        }
    }

    struct Same;

    impl StripeRemover for Same {
        fn remove_stripe(
            &self,
            p: &ProjectionStack,
            _: &StripeRemovalParams,
        ) -> ReconResult<ProjectionStack> {
            Ok(p.clone())
        }
    }

    impl RingRemover for Same {
        fn remove_ring(&self, s: &Image, _: &RingRemovalParams) -> ReconResult<Image> {
            Ok(s.clone())
        }
    }

    struct Truncating;

    impl StripeRemover for Truncating {
        fn remove_stripe(
            &self,
            p: &ProjectionStack,
            _: &StripeRemovalParams,
        ) -> ReconResult<ProjectionStack> {
            Ok(p.truncated(1))
        }
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = PipelineConfig::default();
        config.ring.sigma = 0.0;
        assert!(Pipeline::new(config, Mean, Same, Same).is_err());

        let mut config = PipelineConfig::default();
        config.normalize.clip_min = -1.0;
        assert!(Pipeline::new(config, Mean, Same, Same).is_err());

        let mut config = PipelineConfig::default();
        config.ring.rwidth = 0;
        assert!(Pipeline::new(config, Mean, Same, Same).is_err());

        let mut config = PipelineConfig::default();
        config.stripe.level = 0;
        assert!(Pipeline::new(config, Mean, Same, Same).is_err());
    }

    #[test]
    fn test_uniform_frames_give_zero_attenuation() {
        let pipeline = Pipeline::new(PipelineConfig::default(), Mean, Same, Same).unwrap();
        let flat = Image::new_with_value(8, 6, 1000.0).unwrap();
        let frames = vec![flat.clone(); 4];
        let volume = pipeline.run(&frames, &flat).unwrap();
        assert_eq!(volume.len(), 2);
        for slice in &volume {
            assert!(slice.data().iter().all(|&v| v.abs() < 1e-4));
        }
    }

    #[test]
    fn test_stripe_engine_shape_checked() {
        let pipeline = Pipeline::new(PipelineConfig::default(), Mean, Truncating, Same).unwrap();
        let flat = Image::new_with_value(8, 6, 1000.0).unwrap();
        let frames = vec![flat.clone(); 4];
        assert!(matches!(
            pipeline.run(&frames, &flat),
            Err(PipelineError::Recon(ReconError::Collaborator { .. }))
        ));
    }
}
