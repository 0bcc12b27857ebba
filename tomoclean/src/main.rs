//! tomoclean CLI - projection normalization, ring blending and volume fusion.
//!
//! The full pipeline needs an external reconstruction engine and is only
//! available as a library. The subcommands here cover the stages that run
//! on plain image directories.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tomoclean::PipelineConfig;
use tomoclean::filter::{FlatField, ProjectionNormalizer};
use tomoclean::io::{TiffCompression, list_frames, read_stack_dir, read_tiff_file, write_stack_dir};
use tomoclean::recon::{FusionBlender, RingMaskBlender, log_transform_stack};
use tomoclean::{PairwiseReducer, logging};
use tracing::info;

#[derive(Parser)]
#[command(name = "tomoclean")]
#[command(about = "Artifact correction for X-ray tomography projections and slices")]
#[command(version)]
struct Cli {
    /// TOML configuration file; missing keys use defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directives (e.g. "info", "tomoclean_filter=debug").
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce frame pairs and normalize them against a flat field.
    Normalize(NormalizeArgs),

    /// Blend reconstructed slices with their ring-filtered versions.
    RingBlend(RingBlendArgs),

    /// Fuse an interior and an exterior reconstruction.
    Fuse(FuseArgs),

    /// Print the calibrated rotation center.
    Center,

    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Debug, Clone, Args)]
struct NormalizeArgs {
    /// Directory of raw TIFF frames, two per angle.
    #[arg(long)]
    input: PathBuf,

    /// Raw flat-field TIFF.
    #[arg(long)]
    flat: PathBuf,

    /// Output directory for proj_NNNN.tif files.
    #[arg(long)]
    output: PathBuf,

    /// Write attenuation (-ln) instead of transmission.
    #[arg(long)]
    log_transform: bool,
}

#[derive(Debug, Clone, Args)]
struct RingBlendArgs {
    /// Directory of plain reconstructed slices.
    #[arg(long)]
    plain: PathBuf,

    /// Directory of ring-filtered slices, same count and shape.
    #[arg(long)]
    filtered: PathBuf,

    /// Output directory.
    #[arg(long)]
    output: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct FuseArgs {
    /// Slices trusted near the rotation axis.
    #[arg(long)]
    interior: PathBuf,

    /// Slices trusted towards the rim.
    #[arg(long)]
    exterior: PathBuf,

    /// Output directory.
    #[arg(long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log)?;

    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Normalize(args) => run_normalize(&config, &args),
        Commands::RingBlend(args) => run_ring_blend(&config, &args),
        Commands::Fuse(args) => run_fuse(&config, &args),
        Commands::Center => {
            let calibration = config.center.calibration()?;
            println!(
                "slope = {}, intercept = {}",
                calibration.slope(),
                calibration.intercept()
            );
            println!(
                "center at row {} = {}",
                config.center.reference_row,
                calibration.center_at(config.center.reference_row)
            );
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn run_normalize(config: &PipelineConfig, args: &NormalizeArgs) -> Result<()> {
    let reducer = PairwiseReducer::new(config.roi()?, config.angles.count);
    let normalizer = ProjectionNormalizer::new(config.normalizer_params())?;

    let raw_flat = read_tiff_file(&args.flat)
        .with_context(|| format!("Failed to read flat field: {}", args.flat.display()))?;
    let flat = FlatField::prepare(&reducer.crop(&raw_flat)?, config.normalize.dark_value)
        .context("Failed to prepare flat field")?;

    let paths = list_frames(&args.input)
        .with_context(|| format!("Failed to list frames: {}", args.input.display()))?;
    let reduced = reducer.reduce_paths(&paths)?;
    let mut projections = normalizer.normalize_stack(&reduced, &flat)?;
    if args.log_transform {
        projections = log_transform_stack(&projections)?;
    }

    let written = write_stack_dir(&projections, &args.output, "proj", TiffCompression::None)?;
    info!(count = written.len(), "normalized projections written");
    Ok(())
}

fn read_volume(dir: &Path, what: &str) -> Result<tomoclean::Volume> {
    let volume = read_stack_dir(dir)
        .with_context(|| format!("Failed to read {} slices: {}", what, dir.display()))?;
    if volume.is_empty() {
        bail!("No TIFF slices found in {}", dir.display());
    }
    Ok(volume)
}

fn run_ring_blend(config: &PipelineConfig, args: &RingBlendArgs) -> Result<()> {
    let blender = RingMaskBlender::new(config.ring.radius, config.ring.sigma)?;
    let plain = read_volume(&args.plain, "plain")?;
    let filtered = read_volume(&args.filtered, "ring-filtered")?;
    let blended = blender.blend_volumes(&plain, &filtered)?;
    write_stack_dir(
        &blended,
        &args.output,
        &config.output.prefix,
        TiffCompression::None,
    )?;
    Ok(())
}

fn run_fuse(config: &PipelineConfig, args: &FuseArgs) -> Result<()> {
    let blender = FusionBlender::new(config.fusion.radius_cut, config.fusion.sigma_blur)?
        .with_depth(config.fusion.depth);
    let interior = read_volume(&args.interior, "interior")?;
    let exterior = read_volume(&args.exterior, "exterior")?;
    let fused = blender.fuse(&interior, &exterior)?;
    let finished = tomoclean::recon::finish_volume(&fused, config.output.reverse)?;
    write_stack_dir(
        &finished,
        &args.output,
        &config.output.prefix,
        TiffCompression::None,
    )?;
    Ok(())
}
