//! TIFF image format support
//!
//! Detector frames and reconstructed slices are single-channel TIFFs.
//! Reading accepts any integer or floating-point grayscale sample type and
//! converts sample values to `f32` without rescaling, so a 16-bit count of
//! 1000 becomes `1000.0`. Writing always produces 32-bit float grayscale.

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::{Compression, TiffEncoder};
use tomoclean_core::Image;

/// TIFF compression format used when writing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression
    #[default]
    None,
    /// PackBits compression
    PackBits,
    /// LZW compression
    Lzw,
    /// ZIP/Deflate compression
    Zip,
}

impl TiffCompression {
    /// Convert to tiff crate's Compression enum
    fn to_tiff_compression(self) -> Compression {
        match self {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::PackBits => Compression::Packbits,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::Zip => Compression::Deflate(tiff::encoder::DeflateLevel::default()),
        }
    }
}

/// Read the first page of a grayscale TIFF as an [`Image`].
///
/// # Errors
///
/// Returns `IoError::UnsupportedFormat` for color or palette images and
/// `IoError::DecodeError` when the decoder fails.
pub fn read_tiff<R: Read + Seek>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF dimensions: {}", e)))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF color type: {}", e)))?;

    if !matches!(color_type, ColorType::Gray(_)) {
        return Err(IoError::UnsupportedFormat(format!(
            "expected single-channel grayscale TIFF, got {:?}",
            color_type
        )));
    }

    let image_data = decoder
        .read_image()
        .map_err(|e| IoError::DecodeError(format!("Failed to read TIFF image data: {}", e)))?;

    let data = samples_to_f32(image_data);
    let expected = (width as usize) * (height as usize);
    if data.len() < expected {
        return Err(IoError::InvalidData(format!(
            "TIFF holds {} samples, {}x{} needs {}",
            data.len(),
            width,
            height,
            expected
        )));
    }

    let mut data = data;
    data.truncate(expected);
    Ok(Image::from_data(width, height, data)?)
}

/// Convert decoded samples to `f32`, preserving their numeric value.
fn samples_to_f32(result: DecodingResult) -> Vec<f32> {
    match result {
        DecodingResult::U8(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::U16(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::U32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::F32(data) => data,
        DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::I16(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::I32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::F16(data) => data.into_iter().map(half::f16::to_f32).collect(),
    }
}

/// Write an image as a single-page 32-bit float grayscale TIFF
///
/// # Arguments
///
/// * `image` - The image to write
/// * `writer` - The writer to write to
/// * `compression` - The compression format to use
pub fn write_tiff<W: Write + Seek>(
    image: &Image,
    writer: W,
    compression: TiffCompression,
) -> IoResult<()> {
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| IoError::EncodeError(format!("TIFF encoder error: {}", e)))?
        .with_compression(compression.to_tiff_compression());

    encoder
        .write_image::<Gray32Float>(image.width(), image.height(), image.data())
        .map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))?;
    Ok(())
}

/// Read a grayscale TIFF file.
pub fn read_tiff_file<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from(e).at(path))?;
    read_tiff(BufReader::new(file)).map_err(|e| e.at(path))
}

/// Write an image to a TIFF file, replacing any existing file.
pub fn write_tiff_file<P: AsRef<Path>>(
    image: &Image,
    path: P,
    compression: TiffCompression,
) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| IoError::from(e).at(path))?;
    write_tiff(image, BufWriter::new(file), compression).map_err(|e| e.at(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tiff::encoder::colortype::Gray16;

    #[test]
    fn test_tiff_roundtrip_f32() {
        let image = Image::from_fn(7, 5, |x, y| x as f32 * 0.25 - y as f32 * 1.5).unwrap();

        let mut buffer = Cursor::new(Vec::new());
        write_tiff(&image, &mut buffer, TiffCompression::None).unwrap();

        buffer.set_position(0);
        let image2 = read_tiff(buffer).unwrap();
        assert_eq!(image2, image);
    }

    #[test]
    fn test_read_gray16_keeps_counts() {
        let counts: Vec<u16> = (0..12).map(|i| 600 + i * 100).collect();
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut buffer).unwrap();
            encoder.write_image::<Gray16>(4, 3, &counts).unwrap();
        }

        buffer.set_position(0);
        let image = read_tiff(buffer).unwrap();
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(image.get_pixel(0, 0).unwrap(), 600.0);
        assert_eq!(image.get_pixel(3, 2).unwrap(), 1700.0);
    }

    #[test]
    fn test_compressed_roundtrip() {
        let image = Image::from_fn(16, 16, |x, y| ((x * y) % 7) as f32).unwrap();
        for compression in [
            TiffCompression::PackBits,
            TiffCompression::Lzw,
            TiffCompression::Zip,
        ] {
            let mut buffer = Cursor::new(Vec::new());
            write_tiff(&image, &mut buffer, compression).unwrap();
            buffer.set_position(0);
            assert_eq!(read_tiff(buffer).unwrap(), image);
        }
    }

    #[test]
    fn test_read_garbage_fails() {
        let result = read_tiff(Cursor::new(vec![0u8; 16]));
        assert!(matches!(result, Err(IoError::DecodeError(_))));
    }
}
