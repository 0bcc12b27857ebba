//! Frame and slice directories
//!
//! Raw projections arrive as a directory of TIFF files whose sorted file
//! names give the acquisition order. Reconstructed volumes leave as a
//! directory of numbered slice files.

use crate::tiff::{TiffCompression, read_tiff_file, write_tiff_file};
use crate::{IoError, IoResult};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tomoclean_core::{Image, ImageStack};
use tracing::{debug, info};

/// Whether `path` has a `.tif` / `.tiff` extension (any case).
pub fn is_tiff_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff"))
        .unwrap_or(false)
}

/// List the TIFF files in `dir`, sorted by file name.
///
/// Subdirectories and non-TIFF files are ignored.
///
/// # Errors
///
/// Returns `IoError::File` if the directory cannot be read.
pub fn list_frames<P: AsRef<Path>>(dir: P) -> IoResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| IoError::from(e).at(dir))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| IoError::from(e).at(dir))?.path();
        if path.is_file() && is_tiff_path(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!(dir = %dir.display(), count = paths.len(), "listed frames");
    Ok(paths)
}

/// Read several TIFF files in parallel, keeping the input order.
pub fn read_frames(paths: &[PathBuf]) -> IoResult<Vec<Image>> {
    paths.par_iter().map(read_tiff_file).collect()
}

/// Read every TIFF in `dir` (sorted by name) into one stack.
///
/// # Errors
///
/// Returns `IoError::Core` wrapping `Error::ShapeMismatch` if the files do
/// not all share one shape.
pub fn read_stack_dir<P: AsRef<Path>>(dir: P) -> IoResult<ImageStack> {
    let paths = list_frames(&dir)?;
    let images = read_frames(&paths)?;
    Ok(ImageStack::from_images(images)?)
}

/// Path of image `index` written by [`write_stack_dir`].
pub fn indexed_path(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{prefix}_{index:04}.tif"))
}

/// Write every image of `stack` as `{prefix}_{index:04}.tif` in `dir`.
///
/// The directory is created if missing. Returns the written paths in
/// stack order.
pub fn write_stack_dir<P: AsRef<Path>>(
    stack: &ImageStack,
    dir: P,
    prefix: &str,
    compression: TiffCompression,
) -> IoResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| IoError::from(e).at(dir))?;

    let paths: Vec<PathBuf> = (0..stack.len())
        .map(|i| indexed_path(dir, prefix, i))
        .collect();
    stack
        .images()
        .par_iter()
        .zip(paths.par_iter())
        .try_for_each(|(image, path)| write_tiff_file(image, path, compression))?;

    info!(dir = %dir.display(), count = paths.len(), "wrote {prefix} images");
    Ok(paths)
}
