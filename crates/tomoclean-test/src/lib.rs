//! tomoclean-test - Regression test framework for tomoclean
//!
//! Provides a regression helper modelled on a compare/display workflow,
//! synthetic image fixtures and deterministic fakes for the injected
//! reconstruction engines.
//!
//! # Usage
//!
//! ```ignore
//! use tomoclean_test::RegParams;
//!
//! let mut rp = RegParams::new("normalize");
//! rp.compare_values(1.0, mean, 1e-4);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
pub mod fakes;
mod params;

pub use error::{TestError, TestResult};
pub use fakes::{FailingEngine, FakeReconstructor, FakeRingRemover, FakeStripeRemover};
pub use params::{RegParams, RegTestMode};

use std::fs;
use std::path::PathBuf;
use tomoclean_core::{Image, ImageStack};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // tomoclean-test is at crates/tomoclean-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// Create an empty scratch directory under regout for `name`.
///
/// Any previous contents are removed.
pub fn scratch_dir(name: &str) -> TestResult<PathBuf> {
    let dir = PathBuf::from(format!("{}/scratch/{}", regout_dir(), name));
    let prepare = || -> std::io::Result<()> {
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)
    };
    prepare().map_err(|e| TestError::DirectoryCreate {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Image whose pixels are `background`, except a centred disk of
/// `radius` set to `inside`.
pub fn disk_image(width: u32, height: u32, radius: f32, inside: f32, background: f32) -> Image {
    let (cx, cy) = ((width / 2) as f32, (height / 2) as f32);
    Image::from_fn(width, height, |x, y| {
        if (x as f32 - cx).hypot(y as f32 - cy) <= radius {
            inside
        } else {
            background
        }
    })
    .unwrap_or_else(|e| panic!("disk_image {width}x{height}: {e}"))
}

/// Raw detector frame: `dark + transmission * (flat - dark)` per pixel.
pub fn raw_frame(transmission: &Image, flat_counts: f32, dark: f32) -> Image {
    transmission.map(|t| dark + t * (flat_counts - dark))
}

/// Stack of `count` copies of `image`.
pub fn repeat_stack(image: &Image, count: usize) -> ImageStack {
    ImageStack::from_images(vec![image.clone(); count])
        .unwrap_or_else(|e| panic!("repeat_stack: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_image() {
        let image = disk_image(9, 9, 2.0, 1.0, 0.0);
        assert_eq!(image.get_pixel(4, 4).unwrap(), 1.0);
        assert_eq!(image.get_pixel(6, 4).unwrap(), 1.0);
        assert_eq!(image.get_pixel(0, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_raw_frame() {
        let t = Image::from_data(2, 1, vec![0.0, 0.5]).unwrap();
        assert_eq!(raw_frame(&t, 1000.0, 600.0).data(), &[600.0, 800.0]);
    }
}
