//! ImageStack - Ordered sequence of same-shape images
//!
//! A tomography run handles two kinds of stacks:
//!
//! - [`ProjectionStack`]: one corrected projection per acquisition angle,
//!   in rotation order.
//! - [`Volume`]: one reconstructed slice per position along the
//!   reconstruction axis.
//!
//! Both share the same invariant: every image has identical dimensions,
//! and index order is meaningful. The invariant is enforced on every
//! insertion, so code holding an `ImageStack` never has to re-check it.
//!
//! Per-image transforms ([`ImageStack::map`], [`ImageStack::try_map`]) run
//! in parallel over indices with rayon and preserve order.

use crate::error::{Error, Result};
use crate::image::Image;
use rayon::prelude::*;

/// Ordered array of images sharing one shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageStack {
    images: Vec<Image>,
}

/// Projections indexed by acquisition angle.
pub type ProjectionStack = ImageStack;

/// Reconstructed slices indexed by depth.
pub type Volume = ImageStack;

impl ImageStack {
    /// Create a new empty stack
    pub fn new() -> Self {
        ImageStack { images: Vec::new() }
    }

    /// Build a stack from images, checking that all shapes agree.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` naming the first offending image's
    /// shape against the shape of image 0.
    pub fn from_images(images: Vec<Image>) -> Result<Self> {
        if let Some(first) = images.first() {
            for image in &images[1..] {
                first.check_same_size(image)?;
            }
        }
        Ok(ImageStack { images })
    }

    /// Number of images
    #[inline]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Shared `(width, height)` of the images, `None` for an empty stack.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.images.first().map(Image::dimensions)
    }

    /// Get a reference to an image by index
    pub fn get(&self, index: usize) -> Option<&Image> {
        self.images.get(index)
    }

    /// Append an image.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if the image differs in shape from
    /// those already in the stack.
    pub fn push(&mut self, image: Image) -> Result<()> {
        if let Some(first) = self.images.first() {
            first.check_same_size(&image)?;
        }
        self.images.push(image);
        Ok(())
    }

    /// Borrow the images as a slice
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Iterate over the images in order
    pub fn iter(&self) -> std::slice::Iter<'_, Image> {
        self.images.iter()
    }

    /// Keep only the first `depth` images.
    ///
    /// A depth beyond the current length keeps everything.
    pub fn truncated(&self, depth: usize) -> ImageStack {
        let depth = depth.min(self.images.len());
        ImageStack {
            images: self.images[..depth].to_vec(),
        }
    }

    /// Same images in reverse order.
    pub fn reversed(&self) -> ImageStack {
        ImageStack {
            images: self.images.iter().rev().cloned().collect(),
        }
    }

    /// Apply `f` to every image in parallel.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if `f` does not produce images of a
    /// single shape.
    pub fn map<F>(&self, f: F) -> Result<ImageStack>
    where
        F: Fn(&Image) -> Image + Sync + Send,
    {
        let images: Vec<Image> = self.images.par_iter().map(f).collect();
        ImageStack::from_images(images)
    }

    /// Apply a fallible `f(index, image)` to every image in parallel.
    ///
    /// The first error (in no particular order) aborts the transform.
    pub fn try_map<F, E>(&self, f: F) -> std::result::Result<ImageStack, E>
    where
        F: Fn(usize, &Image) -> std::result::Result<Image, E> + Sync + Send,
        E: From<Error> + Send,
    {
        let images = self
            .images
            .par_iter()
            .enumerate()
            .map(|(i, image)| f(i, image))
            .collect::<std::result::Result<Vec<Image>, E>>()?;
        Ok(ImageStack::from_images(images)?)
    }

    /// Element-wise pair transform of two stacks of equal length and shape.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the lengths differ and
    /// `Error::ShapeMismatch` if the image shapes differ.
    pub fn try_zip_map<F, E>(&self, other: &ImageStack, f: F) -> std::result::Result<ImageStack, E>
    where
        F: Fn(usize, &Image, &Image) -> std::result::Result<Image, E> + Sync + Send,
        E: From<Error> + Send,
    {
        if self.len() != other.len() {
            return Err(Error::InvalidParameter(format!(
                "stack lengths differ: {} vs {}",
                self.len(),
                other.len()
            ))
            .into());
        }
        if let (Some(a), Some(b)) = (self.images.first(), other.images.first()) {
            a.check_same_size(b)?;
        }
        let images = self
            .images
            .par_iter()
            .zip(other.images.par_iter())
            .enumerate()
            .map(|(i, (a, b))| f(i, a, b))
            .collect::<std::result::Result<Vec<Image>, E>>()?;
        Ok(ImageStack::from_images(images)?)
    }
}

impl<'a> IntoIterator for &'a ImageStack {
    type Item = &'a Image;
    type IntoIter = std::slice::Iter<'a, Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
