//! Geometric operations: square cropping, exact resampling and padding.
//!
//! All functions take a buffer by reference and return a new one.

use image::imageops::{self, FilterType};
use image::{Rgba, Rgba32FImage, RgbaImage};

use crate::raster::{RasterBuffer, RectPx};

/// Resampling filter used for every resize in the pipeline.
const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Largest padding fraction that still leaves a non-empty content area.
const MAX_PADDING_FRACTION: f64 = 0.5;

/// Returns the centered square crop rectangle for a `width x height` image.
pub fn square_crop_rect(width: u32, height: u32) -> RectPx {
    let side = width.min(height);
    RectPx::new((width - side) / 2, (height - side) / 2, side, side)
}

/// Crops a buffer to a centered square on its shorter axis.
///
/// Square inputs come back unchanged.
pub fn crop_to_square(buffer: &RasterBuffer) -> RasterBuffer {
    if buffer.dimensions().is_square() {
        return buffer.clone();
    }
    let rect = square_crop_rect(buffer.width(), buffer.height());

    let cropped = imageops::crop_imm(buffer.as_image(), rect.x, rect.y, rect.width, rect.height)
        .to_image();
    // The crop side is min(width, height) of a valid buffer, so never zero.
    RasterBuffer::new(cropped).unwrap_or_else(|_| buffer.clone())
}

/// Resamples a buffer to exactly `width x height` physical pixels.
///
/// Resampling happens on premultiplied alpha with a Lanczos3 kernel so that
/// fully transparent pixels do not bleed their (meaningless) color into
/// neighbouring edges. Zero targets are treated as one pixel.
pub fn scale_exact(buffer: &RasterBuffer, width: u32, height: u32) -> RasterBuffer {
    let width = width.max(1);
    let height = height.max(1);
    if buffer.width() == width && buffer.height() == height {
        return buffer.clone();
    }

    let premultiplied = premultiply(buffer.as_image());
    let resized = imageops::resize(&premultiplied, width, height, RESAMPLE_FILTER);
    let out = unpremultiply(&resized);

    RasterBuffer::new(out).unwrap_or_else(|_| buffer.clone())
}

/// Scales a buffer into a `width x height` canvas with a transparent margin.
///
/// The margin is `width * padding` on every side (the same value on both
/// axes), so the content area is `width * (1 - 2 * padding)` by
/// `height - 2 * width * padding`, each rounded to whole pixels and at least
/// one pixel. The content is centered, with any odd leftover pixel going to
/// the right and bottom margins. The source is resized to fill the content
/// area and drawn source-over onto the transparent canvas.
pub fn scale_with_padding(
    buffer: &RasterBuffer,
    width: u32,
    height: u32,
    padding: f64,
) -> RasterBuffer {
    let width = width.max(1);
    let height = height.max(1);
    let padding = padding.clamp(0.0, MAX_PADDING_FRACTION);

    let margin = width as f64 * padding;
    let inner_width = padded_extent(width, margin);
    let inner_height = padded_extent(height, margin);
    let x = (width - inner_width) / 2;
    let y = (height - inner_height) / 2;

    let inner = scale_exact(buffer, inner_width, inner_height);
    let mut canvas = RgbaImage::new(width, height);
    composite_over(&mut canvas, inner.as_image(), x as i32, y as i32);

    RasterBuffer::new(canvas).unwrap_or(inner)
}

/// Content length left after removing `margin` from both ends of `extent`.
fn padded_extent(extent: u32, margin: f64) -> u32 {
    let inner = (extent as f64 - 2.0 * margin).round();
    (inner.max(1.0) as u32).min(extent)
}

/// Composites a source image onto a destination image at the specified position.
///
/// Uses standard alpha blending (source over destination). Pixels falling
/// outside the destination are clipped.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        let dx = x + sx as i32;
        let dy = y + sy as i32;

        if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
            continue;
        }

        let dst_pixel = dest.get_pixel(dx as u32, dy as u32);
        let blended = alpha_blend(*src_pixel, *dst_pixel);
        dest.put_pixel(dx as u32, dy as u32, blended);
    }
}

/// Alpha blends two RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

fn premultiply(img: &RgbaImage) -> Rgba32FImage {
    Rgba32FImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        let a = a as f32 / 255.0;
        Rgba([
            r as f32 / 255.0 * a,
            g as f32 / 255.0 * a,
            b as f32 / 255.0 * a,
            a,
        ])
    })
}

fn unpremultiply(img: &Rgba32FImage) -> RgbaImage {
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        let a = a.clamp(0.0, 1.0);
        let alpha = (a * 255.0).round() as u8;
        if alpha == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let channel = |c: f32| ((c / a).clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([channel(r), channel(g), channel(b), alpha])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RasterBuffer {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 11 % 256) as u8, ((x + y) % 256) as u8, 255])
        });
        RasterBuffer::new(img).unwrap()
    }

    #[test]
    fn crop_landscape_to_center_square() {
        let src = gradient(40, 10);
        let cropped = crop_to_square(&src);

        assert_eq!(cropped.width(), 10);
        assert_eq!(cropped.height(), 10);
        // Offset is (40 - 10) / 2 = 15
        assert_eq!(cropped.pixel(0, 0), src.pixel(15, 0));
        assert_eq!(cropped.pixel(9, 9), src.pixel(24, 9));
    }

    #[test]
    fn crop_portrait_uses_floor_offset() {
        let src = gradient(5, 12);
        let rect = square_crop_rect(5, 12);
        assert_eq!(rect, RectPx::new(0, 3, 5, 5));

        let cropped = crop_to_square(&src);
        assert_eq!(cropped.pixel(0, 0), src.pixel(0, 3));
    }

    #[test]
    fn crop_square_is_identity() {
        let src = gradient(16, 16);
        assert_eq!(crop_to_square(&src), src);
    }

    #[test]
    fn scale_hits_exact_dimensions() {
        let src = gradient(37, 91);
        for (w, h) in [(30, 30), (90, 30), (1, 1), (256, 17)] {
            let scaled = scale_exact(&src, w, h);
            assert_eq!((scaled.width(), scaled.height()), (w, h));
            assert_eq!(scaled.pixels().len(), (w * h * 4) as usize);
        }
    }

    #[test]
    fn scale_same_size_is_identity() {
        let src = gradient(20, 20);
        assert_eq!(scale_exact(&src, 20, 20), src);
    }

    #[test]
    fn scale_keeps_solid_color() {
        let src = RasterBuffer::filled(100, 100, [200, 40, 90, 255]).unwrap();
        let scaled = scale_exact(&src, 30, 30);
        for pixel in scaled.as_image().pixels() {
            assert_eq!(pixel.0, [200, 40, 90, 255]);
        }
    }

    #[test]
    fn scale_preserves_transparency() {
        let src = RasterBuffer::transparent(64, 64).unwrap();
        let scaled = scale_exact(&src, 45, 45);
        assert!(scaled.as_image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn padding_content_box_is_centered() {
        let src = RasterBuffer::filled(50, 50, [0, 128, 255, 255]).unwrap();

        let padded = scale_with_padding(&src, 30, 30, 0.1);
        assert_eq!((padded.width(), padded.height()), (30, 30));
        // 30 * (1 - 2 * 0.1) = 24, centered at offset 3
        assert_eq!(padded.content_bounds(), Some(RectPx::new(3, 3, 24, 24)));
        assert_eq!(padded.pixel(0, 0)[3], 0);
        assert_eq!(padded.pixel(15, 15), [0, 128, 255, 255]);

        let padded = scale_with_padding(&src, 60, 60, 0.25);
        assert_eq!(padded.content_bounds(), Some(RectPx::new(15, 15, 30, 30)));
    }

    #[test]
    fn padding_with_fractional_margin() {
        let src = RasterBuffer::filled(90, 90, [10, 200, 10, 255]).unwrap();

        // 45 * 0.1 = 4.5 px margin: content is 36 px, offset (45 - 36) / 2 = 4
        let padded = scale_with_padding(&src, 45, 45, 0.1);
        assert_eq!(padded.content_bounds(), Some(RectPx::new(4, 4, 36, 36)));

        // 45 * 0.3 = 13.5 px margin: content is 18 px
        let padded = scale_with_padding(&src, 45, 45, 0.3);
        assert_eq!(padded.content_bounds(), Some(RectPx::new(13, 13, 18, 18)));

        // 30 * 0.25 = 7.5 px margin: content is 15 px
        let padded = scale_with_padding(&src, 30, 30, 0.25);
        assert_eq!(padded.content_bounds(), Some(RectPx::new(7, 7, 15, 15)));

        // 30 * 0.35 = 10.5 px margin: content is 9 px
        let padded = scale_with_padding(&src, 30, 30, 0.35);
        assert_eq!(padded.content_bounds(), Some(RectPx::new(10, 10, 9, 9)));
    }

    #[test]
    fn padding_never_empties_the_content() {
        let src = RasterBuffer::filled(8, 8, [255, 255, 255, 255]).unwrap();
        let padded = scale_with_padding(&src, 3, 3, 0.5);
        assert_eq!(padded.content_bounds(), Some(RectPx::new(1, 1, 1, 1)));
    }

    #[test]
    fn padding_uses_width_on_both_axes() {
        let src = RasterBuffer::filled(8, 8, [255, 255, 255, 255]).unwrap();
        let padded = scale_with_padding(&src, 40, 20, 0.1);
        // pad = 4 on both axes: inner 32 x 12
        assert_eq!(padded.content_bounds(), Some(RectPx::new(4, 4, 32, 12)));
    }

    #[test]
    fn composite_simple() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));

        composite_over(&mut dest, &src, 3, 3);

        assert_eq!(dest.get_pixel(5, 5).0, [0, 0, 255, 255]);
        assert_eq!(dest.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn composite_with_transparency() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 128]));

        composite_over(&mut dest, &src, 0, 0);

        let pixel = dest.get_pixel(0, 0);
        assert!(pixel[0] > 0, "Should have some red");
        assert!(pixel[2] > 0, "Should have some blue");
    }

    #[test]
    fn composite_clips_at_edges() {
        let mut dest = RgbaImage::new(4, 4);
        let src = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));

        composite_over(&mut dest, &src, -2, 2);

        assert_eq!(dest.get_pixel(1, 3).0, [9, 9, 9, 255]);
        assert_eq!(dest.get_pixel(2, 3).0, [0, 0, 0, 0]);
        assert_eq!(dest.get_pixel(0, 1).0, [0, 0, 0, 0]);
    }
}
