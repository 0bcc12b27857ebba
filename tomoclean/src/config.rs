//! Pipeline configuration
//!
//! Every tunable lives in [`PipelineConfig`]. It is read from TOML; each
//! section and key is optional and falls back to the defaults below, which
//! reproduce the reference acquisition setup.
//!
//! ```toml
//! [crop]
//! rows = [322, 1398]
//! cols = [500, 1331]
//!
//! [normalize]
//! dark_value = 600.0
//!
//! [angles]
//! start_deg = -240.0
//! end_deg = -59.4
//! count = 259
//!
//! [center]
//! points = [[400.0, 458.0], [1200.0, 453.0]]
//! reference_row = 958.0
//!
//! [stripe]
//! level = 5
//! wavelet = "db5"
//! sigma = 1.0
//!
//! [ring]
//! radius = 40.0
//! sigma = 10.0
//! rwidth = 15
//! thresh = 0.0044
//!
//! [fusion]
//! radius_cut = 70.0
//! sigma_blur = 20.0
//!
//! [output]
//! reverse = true
//! ```

use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tomoclean_core::Roi;
use tomoclean_filter::NormalizerParams;
use tomoclean_recon::{
    CenterCalibration, DEFAULT_CENTER_POINTS, DEFAULT_FUSION_RADIUS, DEFAULT_FUSION_SIGMA,
    DEFAULT_REFERENCE_ROW, DEFAULT_RING_RADIUS, DEFAULT_RING_SIGMA, RingRemovalParams,
    StripeRemovalParams,
};

/// Full pipeline configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Crop applied to every frame and to the flat field; `None` keeps
    /// the full detector
    pub crop: Option<CropConfig>,
    pub normalize: NormalizeConfig,
    pub angles: AngleConfig,
    pub center: CenterConfig,
    pub stripe: StripeConfig,
    pub ring: RingConfig,
    pub fusion: FusionConfig,
    pub output: OutputConfig,
}

/// Half-open crop ranges `[start, end)` in detector pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CropConfig {
    pub rows: [u32; 2],
    pub cols: [u32; 2],
}

impl CropConfig {
    pub fn to_roi(&self) -> PipelineResult<Roi> {
        Ok(Roi::new(
            self.rows[0]..self.rows[1],
            self.cols[0]..self.cols[1],
        )?)
    }
}

/// Projection normalization settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeConfig {
    pub dark_value: f32,
    pub spike_sigma: f32,
    pub stripe_v_size: u32,
    pub stripe_h_size: u32,
    pub bad_pixel_sigma: f32,
    pub clip_min: f32,
    pub clip_max: f32,
    pub median_size: u32,
    pub smooth_sigma: f32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        NormalizeConfig::from(NormalizerParams::default())
    }
}

impl From<NormalizerParams> for NormalizeConfig {
    fn from(p: NormalizerParams) -> Self {
        NormalizeConfig {
            dark_value: p.dark_value,
            spike_sigma: p.spike_sigma,
            stripe_v_size: p.stripe_v_size,
            stripe_h_size: p.stripe_h_size,
            bad_pixel_sigma: p.bad_pixel_sigma,
            clip_min: p.clip_min,
            clip_max: p.clip_max,
            median_size: p.median_size,
            smooth_sigma: p.smooth_sigma,
        }
    }
}

impl From<NormalizeConfig> for NormalizerParams {
    fn from(c: NormalizeConfig) -> Self {
        NormalizerParams {
            dark_value: c.dark_value,
            spike_sigma: c.spike_sigma,
            stripe_v_size: c.stripe_v_size,
            stripe_h_size: c.stripe_h_size,
            bad_pixel_sigma: c.bad_pixel_sigma,
            clip_min: c.clip_min,
            clip_max: c.clip_max,
            median_size: c.median_size,
            smooth_sigma: c.smooth_sigma,
        }
    }
}

/// Acquisition angle range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AngleConfig {
    pub start_deg: f64,
    pub end_deg: f64,
    /// Number of angles; `None` uses every complete frame pair
    pub count: Option<usize>,
}

impl Default for AngleConfig {
    fn default() -> Self {
        AngleConfig {
            start_deg: -240.0,
            end_deg: -59.4,
            count: None,
        }
    }
}

/// Rotation-centre calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CenterConfig {
    /// Two `(row, center)` readings
    pub points: [[f64; 2]; 2],
    /// Row at which the fixed centre is evaluated
    pub reference_row: f64,
}

impl Default for CenterConfig {
    fn default() -> Self {
        let [(r1, c1), (r2, c2)] = DEFAULT_CENTER_POINTS;
        CenterConfig {
            points: [[r1, c1], [r2, c2]],
            reference_row: DEFAULT_REFERENCE_ROW,
        }
    }
}

impl CenterConfig {
    pub fn calibration(&self) -> PipelineResult<CenterCalibration> {
        let [[r1, c1], [r2, c2]] = self.points;
        Ok(CenterCalibration::from_points((r1, c1), (r2, c2))?)
    }

    /// Fixed rotation centre used for reconstruction.
    pub fn fixed_center(&self) -> PipelineResult<f64> {
        Ok(self.calibration()?.center_at(self.reference_row))
    }
}

/// Stripe removal engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StripeConfig {
    pub level: u32,
    pub wavelet: String,
    pub sigma: f32,
}

impl Default for StripeConfig {
    fn default() -> Self {
        StripeConfig::from(StripeRemovalParams::default())
    }
}

impl From<StripeRemovalParams> for StripeConfig {
    fn from(p: StripeRemovalParams) -> Self {
        StripeConfig {
            level: p.level,
            wavelet: p.wavelet,
            sigma: p.sigma,
        }
    }
}

impl StripeConfig {
    pub fn removal_params(&self) -> StripeRemovalParams {
        StripeRemovalParams {
            level: self.level,
            wavelet: self.wavelet.clone(),
            sigma: self.sigma,
        }
    }
}

/// Ring blending and ring removal engine settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingConfig {
    /// Radius kept from the plain slice
    pub radius: f32,
    /// Width of the transition to the ring-filtered slice
    pub sigma: f32,
    /// Ring removal filter window
    pub rwidth: u32,
    /// Ring removal threshold
    pub thresh: f32,
}

impl Default for RingConfig {
    fn default() -> Self {
        let removal = RingRemovalParams::default();
        RingConfig {
            radius: DEFAULT_RING_RADIUS,
            sigma: DEFAULT_RING_SIGMA,
            rwidth: removal.rwidth,
            thresh: removal.thresh,
        }
    }
}

impl RingConfig {
    pub fn removal_params(&self) -> RingRemovalParams {
        RingRemovalParams {
            rwidth: self.rwidth,
            thresh: self.thresh,
        }
    }
}

/// Volume fusion settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FusionConfig {
    pub radius_cut: f32,
    pub sigma_blur: f32,
    /// Maximum number of fused slices
    pub depth: Option<usize>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        FusionConfig {
            radius_cut: DEFAULT_FUSION_RADIUS,
            sigma_blur: DEFAULT_FUSION_SIGMA,
            depth: None,
        }
    }
}

/// Output finishing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Reverse slice order before writing
    pub reverse: bool,
    /// File name prefix for written slices
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            reverse: true,
            prefix: "slice".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> PipelineResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PipelineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> PipelineResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Crop region, if configured
    pub fn roi(&self) -> PipelineResult<Option<Roi>> {
        self.crop.as_ref().map(CropConfig::to_roi).transpose()
    }

    pub fn normalizer_params(&self) -> NormalizerParams {
        self.normalize.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.normalize.dark_value, 600.0);
        assert_eq!(config.normalize.clip_min, 1e-3);
        assert_eq!(config.ring.radius, 40.0);
        assert_eq!(config.ring.rwidth, 15);
        assert_eq!(config.ring.thresh, 0.0044);
        assert_eq!(config.stripe.level, 5);
        assert_eq!(config.stripe.wavelet, "db5");
        assert_eq!(config.stripe.sigma, 1.0);
        assert_eq!(config.fusion.sigma_blur, 20.0);
        assert!(config.output.reverse);
        assert!(config.crop.is_none());
        assert!((config.center.fixed_center().unwrap() - 454.5125).abs() < 1e-9);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [normalize]
            dark_value = 100.0

            [crop]
            rows = [2, 10]
            cols = [0, 4]

            [fusion]
            depth = 3

            [stripe]
            wavelet = "sym8"

            [ring]
            rwidth = 21
            "#,
        )
        .unwrap();
        assert_eq!(config.normalize.dark_value, 100.0);
        assert_eq!(config.normalize.spike_sigma, 3.0);
        assert_eq!(config.fusion.depth, Some(3));
        assert_eq!(config.fusion.radius_cut, 70.0);
        assert_eq!(config.stripe.removal_params().wavelet, "sym8");
        assert_eq!(config.stripe.level, 5);
        let ring = config.ring.removal_params();
        assert_eq!((ring.rwidth, ring.thresh), (21, 0.0044));
        assert_eq!(config.ring.radius, 40.0);
        let roi = config.roi().unwrap().unwrap();
        assert_eq!((roi.width(), roi.height()), (4, 8));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = PipelineConfig::from_toml_str("[ring]\nradius = 1.0\nwindow = 2.0\n");
        assert!(matches!(result, Err(PipelineError::ConfigParse(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = PipelineConfig::default();
        config.angles.count = Some(259);
        let text = config.to_toml_string().unwrap();
        assert_eq!(PipelineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_empty_crop_rejected() {
        let config = PipelineConfig {
            crop: Some(CropConfig {
                rows: [5, 5],
                cols: [0, 4],
            }),
            ..PipelineConfig::default()
        };
        assert!(config.roi().is_err());
    }
}
