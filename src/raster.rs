//! Raster buffer type shared by every pipeline stage.
//!
//! A [`RasterBuffer`] is an owned RGBA8 image with straight (non-premultiplied)
//! alpha and strictly positive dimensions. Pipeline operations never mutate a
//! buffer in place; they return new ones.

use std::io::Cursor;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use crate::error::RasterError;

/// A pixel rectangle within a buffer, e.g. a crop region or content bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// Buffer or sheet dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true for a square, which needs no crop.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

/// An owned RGBA8 pixel buffer with exact physical dimensions.
///
/// Pixels are stored row-major with no stride padding, so the raw byte
/// length is always `width * height * 4`. There is no notion of a display
/// scale factor: a 60x20 buffer is written as a 60x20 PNG on every display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    data: RgbaImage,
}

impl RasterBuffer {
    /// Wraps an existing image, rejecting zero-sized images.
    pub fn new(data: RgbaImage) -> Result<Self, RasterError> {
        if data.width() == 0 || data.height() == 0 {
            return Err(RasterError::EmptyDimensions);
        }
        Ok(Self { data })
    }

    /// Builds a buffer from raw row-major RGBA8 bytes.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyDimensions);
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RasterError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        let data = RgbaImage::from_raw(width, height, pixels).ok_or(RasterError::LengthMismatch {
            expected,
            actual: 0,
        })?;
        Ok(Self { data })
    }

    /// Creates a buffer where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, RasterError> {
        Self::new(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    /// Creates a fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> Result<Self, RasterError> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Decodes an in-memory image in any format the `image` crate recognises.
    pub fn decode(bytes: &[u8]) -> Result<Self, RasterError> {
        let img = image::load_from_memory(bytes).map_err(RasterError::Decode)?;
        Self::new(img.to_rgba8())
    }

    /// Opens and decodes an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RasterError> {
        let img = image::open(path).map_err(RasterError::Decode)?;
        Self::new(img.to_rgba8())
    }

    /// Encodes the buffer as an RGBA8 PNG at its exact pixel dimensions.
    ///
    /// No physical-density chunk is written.
    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        let mut out = Cursor::new(Vec::new());
        PngEncoder::new(&mut out)
            .write_image(
                self.data.as_raw(),
                self.data.width(),
                self.data.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(RasterError::Encode)?;
        Ok(out.into_inner())
    }

    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Returns the pixel dimensions of the buffer.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Returns the raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.data.as_raw()
    }

    /// Returns the RGBA value at (x, y).
    ///
    /// Panics if the coordinates are out of bounds, like [`RgbaImage::get_pixel`].
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.data.get_pixel(x, y).0
    }

    /// Borrows the underlying image.
    pub fn as_image(&self) -> &RgbaImage {
        &self.data
    }

    /// Consumes the buffer, returning the underlying image.
    pub fn into_image(self) -> RgbaImage {
        self.data
    }

    /// Bounding box of all pixels with non-zero alpha, if any.
    pub fn content_bounds(&self) -> Option<RectPx> {
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        let mut found = false;

        for (x, y, pixel) in self.data.enumerate_pixels() {
            if pixel[3] == 0 {
                continue;
            }
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        found.then(|| RectPx::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }
}

impl TryFrom<RgbaImage> for RasterBuffer {
    type Error = RasterError;

    fn try_from(data: RgbaImage) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<RasterBuffer> for RgbaImage {
    fn from(buffer: RasterBuffer) -> Self {
        buffer.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_rejected() {
        assert!(matches!(
            RasterBuffer::new(RgbaImage::new(0, 10)),
            Err(RasterError::EmptyDimensions)
        ));
        assert!(matches!(
            RasterBuffer::from_raw(4, 0, Vec::new()),
            Err(RasterError::EmptyDimensions)
        ));
    }

    #[test]
    fn raw_length_must_match() {
        let err = RasterBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            RasterError::LengthMismatch {
                expected: 16,
                actual: 15
            }
        ));

        let ok = RasterBuffer::from_raw(2, 2, vec![7; 16]).unwrap();
        assert_eq!(ok.pixels().len(), 16);
        assert_eq!(ok.pixel(1, 1), [7, 7, 7, 7]);
    }

    #[test]
    fn content_bounds_of_inset_square() {
        let mut img = RgbaImage::new(10, 10);
        for y in 2..6 {
            for x in 3..8 {
                img.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        let buffer = RasterBuffer::new(img).unwrap();
        assert_eq!(buffer.content_bounds(), Some(RectPx::new(3, 2, 5, 4)));

        let empty = RasterBuffer::transparent(4, 4).unwrap();
        assert_eq!(empty.content_bounds(), None);
    }

    #[test]
    fn png_encoding_keeps_dimensions_and_alpha() {
        let buffer = RasterBuffer::filled(6, 2, [10, 20, 30, 40]).unwrap();
        let png = buffer.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = RasterBuffer::decode(&png).unwrap();
        assert_eq!(decoded.dimensions(), SizePx::new(6, 2));
        assert_eq!(decoded.pixel(5, 1), [10, 20, 30, 40]);
    }

    #[test]
    fn decode_garbage_fails() {
        assert!(matches!(
            RasterBuffer::decode(b"not an image"),
            Err(RasterError::Decode(_))
        ));
    }
}
