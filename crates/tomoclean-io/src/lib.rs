//! tomoclean-io - Frame and slice I/O
//!
//! Reads raw detector frames and flat fields from grayscale TIFF files and
//! writes corrected projections and reconstructed slices back out as
//! 32-bit float TIFFs.
//!
//! # Example
//!
//! ```no_run
//! use tomoclean_io::{list_frames, read_tiff_file};
//!
//! let frames = list_frames("scan/projections").unwrap();
//! let first = read_tiff_file(&frames[0]).unwrap();
//! println!("{}x{}", first.width(), first.height());
//! ```

pub mod dir;
mod error;
pub mod tiff;

pub use dir::{
    indexed_path, is_tiff_path, list_frames, read_frames, read_stack_dir, write_stack_dir,
};
pub use error::{IoError, IoResult};
pub use tiff::{TiffCompression, read_tiff, read_tiff_file, write_tiff, write_tiff_file};
