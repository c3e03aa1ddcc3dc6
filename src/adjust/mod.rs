//! HSB-style color adjustment.
//!
//! An [`HsbAdjustment`] is applied as a two-stage filter chain over linear
//! light RGB:
//!
//! ```text
//!  source pixel (sRGB, straight alpha)
//!       │  decode transfer curve
//!       ▼
//! ┌────────────────┐
//! │ ColorControls  │ ◄── saturation factor (1 + s), brightness offset, contrast 1.0
//! └───────┬────────┘
//!         ▼
//! ┌────────────────┐
//! │   HueAdjust    │ ◄── rotation of hue × π radians
//! └───────┬────────┘
//!         │  clamp, encode transfer curve
//!         ▼
//!  output pixel (alpha untouched)
//! ```
//!
//! The order (controls first, hue second) and the ×π hue scaling are kept
//! stable so that regenerated assets match previously exported ones.

pub mod controls;
pub mod hue;

pub use controls::ColorControls;
pub use hue::HueAdjust;

use palette::{LinSrgb, Srgb};
use serde::{Deserialize, Serialize};

use crate::raster::RasterBuffer;
use crate::state::StateSet;

// ============================================================================
// HsbAdjustment
// ============================================================================

/// A hue / saturation / brightness perturbation.
///
/// Every component lies in `[-1, 1]`:
/// - `hue` is a fraction of a half turn (scaled to ±π radians),
/// - `saturation` is a delta on a saturation multiplier of 1.0,
/// - `brightness` is an additive offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct HsbAdjustment {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl HsbAdjustment {
    /// No change at all.
    pub const NONE: Self = Self::preset(0.0, 0.0, 0.0);

    pub const OFF_NORMAL: Self = Self::preset(0.0, 0.0, -0.10);
    pub const OFF_HOVER: Self = Self::preset(0.0, 0.0, 0.15);
    pub const OFF_ACTIVE: Self = Self::preset(0.0, -0.20, -0.25);

    pub const ON_NORMAL: Self = Self::preset(0.0, 0.15, 0.10);
    pub const ON_HOVER: Self = Self::preset(0.0, 0.15, 0.25);
    pub const ON_ACTIVE: Self = Self::preset(0.0, 0.0, -0.10);

    const fn preset(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }

    /// Creates an adjustment, clamping each component to `[-1, 1]`.
    pub fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue: hue.clamp(-1.0, 1.0),
            saturation: saturation.clamp(-1.0, 1.0),
            brightness: brightness.clamp(-1.0, 1.0),
        }
    }

    /// Returns a copy with every component clamped to `[-1, 1]`.
    pub fn clamped(self) -> Self {
        Self::new(self.hue, self.saturation, self.brightness)
    }

    /// Returns true if applying this adjustment changes nothing.
    pub fn is_neutral(&self) -> bool {
        self.controls().is_identity() && self.hue_adjust().is_identity()
    }

    /// Default adjustments for the three OFF states.
    pub fn off_defaults() -> StateSet<Self> {
        StateSet::new(Self::OFF_NORMAL, Self::OFF_HOVER, Self::OFF_ACTIVE)
    }

    /// Default adjustments for the three ON states of a toggle icon.
    pub fn on_defaults() -> StateSet<Self> {
        StateSet::new(Self::ON_NORMAL, Self::ON_HOVER, Self::ON_ACTIVE)
    }

    /// First stage of the chain.
    pub fn controls(&self) -> ColorControls {
        ColorControls::new(1.0 + self.saturation, self.brightness, 1.0)
    }

    /// Second stage of the chain.
    pub fn hue_adjust(&self) -> HueAdjust {
        HueAdjust::from_half_turns(self.hue)
    }
}

// ============================================================================
// ColorFilter
// ============================================================================

/// A per-pixel color filter working in linear-light RGB.
///
/// Filters do not see alpha; the chain passes it through untouched.
pub trait ColorFilter {
    /// Returns true if [`apply`](Self::apply) would return its input unchanged.
    ///
    /// Identity stages are skipped entirely, which keeps neutral adjustments
    /// pixel-exact.
    fn is_identity(&self) -> bool;

    /// Transforms one color. Output may leave the `[0, 1]` range; the chain
    /// clamps once at the end.
    fn apply(&self, rgb: LinSrgb) -> LinSrgb;
}

/// Applies an HSB adjustment to a buffer.
pub fn adjust_hsb(buffer: &RasterBuffer, adjustment: HsbAdjustment) -> RasterBuffer {
    let controls = adjustment.controls();
    let hue = adjustment.hue_adjust();
    apply_filters(buffer, &[&controls, &hue])
}

/// Runs a chain of filters, in order, over every visible pixel of a buffer.
///
/// Filters see straight (un-premultiplied) color; alpha is carried over.
pub fn apply_filters(buffer: &RasterBuffer, filters: &[&dyn ColorFilter]) -> RasterBuffer {
    let active: Vec<&dyn ColorFilter> = filters
        .iter()
        .copied()
        .filter(|f| !f.is_identity())
        .collect();
    if active.is_empty() {
        return buffer.clone();
    }

    let mut result = buffer.as_image().clone();
    for pixel in result.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue; // Skip fully transparent pixels
        }

        let mut color = decode(r, g, b);
        for filter in &active {
            color = filter.apply(color);
        }
        let [r, g, b] = encode(color);
        pixel.0 = [r, g, b, a];
    }

    RasterBuffer::new(result).unwrap_or_else(|_| buffer.clone())
}

fn decode(r: u8, g: u8, b: u8) -> LinSrgb {
    Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0).into_linear()
}

fn encode(color: LinSrgb) -> [u8; 3] {
    let clamped = LinSrgb::new(
        color.red.clamp(0.0, 1.0),
        color.green.clamp(0.0, 1.0),
        color.blue.clamp(0.0, 1.0),
    );
    let srgb: Srgb = Srgb::from_linear(clamped);
    [
        (srgb.red * 255.0).round() as u8,
        (srgb.green * 255.0).round() as u8,
        (srgb.blue * 255.0).round() as u8,
    ]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn sample_buffer() -> RasterBuffer {
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            Rgba([(x * 16) as u8, (y * 16) as u8, 200, if x == 0 { 0 } else { 255 }])
        });
        RasterBuffer::new(img).unwrap()
    }

    #[test]
    fn zero_adjustment_is_pixel_identical() {
        let buffer = sample_buffer();
        assert!(HsbAdjustment::NONE.is_neutral());
        assert_eq!(adjust_hsb(&buffer, HsbAdjustment::NONE), buffer);
        assert_eq!(adjust_hsb(&buffer, HsbAdjustment::default()), buffer);
    }

    #[test]
    fn presets_are_not_neutral() {
        for preset in HsbAdjustment::off_defaults()
            .iter()
            .chain(HsbAdjustment::on_defaults().iter())
        {
            assert!(!preset.is_neutral(), "{preset:?}");
        }
    }

    #[test]
    fn new_clamps_components() {
        let adj = HsbAdjustment::new(3.0, -2.0, 0.5);
        assert_eq!(adj, HsbAdjustment::new(1.0, -1.0, 0.5));
    }

    #[test]
    fn brightness_raises_and_lowers() {
        let buffer = RasterBuffer::filled(4, 4, [100, 100, 100, 255]).unwrap();

        let brighter = adjust_hsb(&buffer, HsbAdjustment::OFF_HOVER);
        assert!(brighter.pixel(0, 0)[0] > 100);

        let darker = adjust_hsb(&buffer, HsbAdjustment::OFF_NORMAL);
        assert!(darker.pixel(0, 0)[0] < 100);
    }

    #[test]
    fn full_desaturation_yields_gray() {
        let buffer = RasterBuffer::filled(2, 2, [220, 40, 90, 255]).unwrap();
        let gray = adjust_hsb(&buffer, HsbAdjustment::new(0.0, -1.0, 0.0));
        let [r, g, b, a] = gray.pixel(1, 1);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 255);
    }

    #[test]
    fn half_turn_moves_red_toward_cyan() {
        let buffer = RasterBuffer::filled(2, 2, [230, 20, 20, 255]).unwrap();
        let rotated = adjust_hsb(&buffer, HsbAdjustment::new(1.0, 0.0, 0.0));
        let [r, g, b, _] = rotated.pixel(0, 0);
        assert!(g > r, "green should exceed red after a half turn: {r} {g} {b}");
        assert!(b > r, "blue should exceed red after a half turn: {r} {g} {b}");
    }

    #[test]
    fn alpha_and_transparent_pixels_untouched() {
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([120, 60, 30, 77]));
        img.put_pixel(0, 0, Rgba([12, 34, 56, 0]));
        let buffer = RasterBuffer::new(img).unwrap();

        let adjusted = adjust_hsb(&buffer, HsbAdjustment::new(0.3, 0.4, 0.2));
        assert_eq!(adjusted.pixel(0, 0), [12, 34, 56, 0]);
        assert_eq!(adjusted.pixel(1, 0)[3], 77);
        assert_ne!(adjusted.pixel(1, 0), buffer.pixel(1, 0));
    }

    #[test]
    fn adjustment_is_deterministic() {
        let buffer = sample_buffer();
        let adj = HsbAdjustment::new(-0.4, 0.25, -0.1);
        assert_eq!(adjust_hsb(&buffer, adj), adjust_hsb(&buffer, adj));
    }

    #[test]
    fn controls_run_before_hue() {
        // Saturating first and then rotating differs from the reverse order
        // only when both stages are active; check the chain matches the
        // explicit controls -> hue composition.
        let buffer = RasterBuffer::filled(1, 1, [200, 120, 40, 255]).unwrap();
        let adj = HsbAdjustment::new(0.5, 0.2, 0.1);

        let chained = adjust_hsb(&buffer, adj);
        let staged = apply_filters(
            &apply_filters(&buffer, &[&adj.controls()]),
            &[&adj.hue_adjust()],
        );
        // Staged output re-quantizes between stages.
        for (a, b) in chained.pixel(0, 0).iter().zip(staged.pixel(0, 0).iter()) {
            assert!((*a as i16 - *b as i16).abs() <= 2);
        }
    }
}
