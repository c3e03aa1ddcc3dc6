//! Saturation / brightness / contrast stage.

use palette::LinSrgb;

use super::ColorFilter;

/// Rec. 709 luma weights used to find the gray point of a color.
const LUMA_WEIGHTS: [f32; 3] = [0.2125, 0.7154, 0.0721];

/// Saturation, brightness and contrast controls.
///
/// Applied per channel as:
///
/// ```text
/// gray = dot(rgb, LUMA_WEIGHTS)
/// rgb  = gray + (rgb - gray) * saturation
/// rgb  = rgb + brightness
/// rgb  = (rgb - 0.5) * contrast + 0.5
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorControls {
    /// Saturation multiplier; 1.0 leaves colors unchanged, 0.0 is grayscale.
    pub saturation: f32,
    /// Additive brightness offset.
    pub brightness: f32,
    /// Contrast multiplier around mid-gray; 1.0 is neutral.
    pub contrast: f32,
}

impl ColorControls {
    pub fn new(saturation: f32, brightness: f32, contrast: f32) -> Self {
        Self {
            saturation: saturation.max(0.0),
            brightness,
            contrast: contrast.max(0.0),
        }
    }
}

impl Default for ColorControls {
    fn default() -> Self {
        Self::new(1.0, 0.0, 1.0)
    }
}

impl ColorFilter for ColorControls {
    fn is_identity(&self) -> bool {
        self.saturation == 1.0 && self.brightness == 0.0 && self.contrast == 1.0
    }

    fn apply(&self, rgb: LinSrgb) -> LinSrgb {
        let gray = rgb.red * LUMA_WEIGHTS[0]
            + rgb.green * LUMA_WEIGHTS[1]
            + rgb.blue * LUMA_WEIGHTS[2];

        let channel = |c: f32| {
            let saturated = gray + (c - gray) * self.saturation;
            let brightened = saturated + self.brightness;
            (brightened - 0.5) * self.contrast + 0.5
        };

        LinSrgb::new(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        assert!(ColorControls::default().is_identity());
        assert!(!ColorControls::new(1.2, 0.0, 1.0).is_identity());
        assert!(!ColorControls::new(1.0, -0.1, 1.0).is_identity());
    }

    #[test]
    fn zero_saturation_collapses_to_luma() {
        let out = ColorControls::new(0.0, 0.0, 1.0).apply(LinSrgb::new(1.0, 0.0, 0.0));
        assert!((out.red - 0.2125).abs() < 1e-6);
        assert!((out.green - 0.2125).abs() < 1e-6);
        assert!((out.blue - 0.2125).abs() < 1e-6);
    }

    #[test]
    fn brightness_is_additive() {
        let out = ColorControls::new(1.0, 0.25, 1.0).apply(LinSrgb::new(0.1, 0.2, 0.3));
        assert!((out.red - 0.35).abs() < 1e-6);
        assert!((out.green - 0.45).abs() < 1e-6);
        assert!((out.blue - 0.55).abs() < 1e-6);
    }

    #[test]
    fn negative_saturation_factor_is_floored() {
        assert_eq!(ColorControls::new(-0.5, 0.0, 1.0).saturation, 0.0);
    }
}
