//! Hue rotation stage.

use std::f32::consts::PI;

use palette::LinSrgb;

use super::ColorFilter;

/// Rotates hue by an angle in radians.
///
/// The rotation is performed on the chroma (I, Q) plane of the YIQ color
/// space, which keeps luma constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueAdjust {
    /// Rotation angle in radians.
    pub angle: f32,
}

impl HueAdjust {
    pub fn new(angle: f32) -> Self {
        Self { angle }
    }

    /// Builds a rotation from a fraction of a half turn (`half_turns × π`).
    pub fn from_half_turns(half_turns: f32) -> Self {
        Self::new(half_turns * PI)
    }
}

impl ColorFilter for HueAdjust {
    fn is_identity(&self) -> bool {
        self.angle.rem_euclid(2.0 * PI) == 0.0
    }

    fn apply(&self, rgb: LinSrgb) -> LinSrgb {
        let (r, g, b) = (rgb.red, rgb.green, rgb.blue);

        let y = 0.299 * r + 0.587 * g + 0.114 * b;
        let i = 0.596 * r - 0.274 * g - 0.322 * b;
        let q = 0.211 * r - 0.523 * g + 0.312 * b;

        let (sin, cos) = self.angle.sin_cos();
        let i2 = i * cos - q * sin;
        let q2 = i * sin + q * cos;

        LinSrgb::new(
            y + 0.956 * i2 + 0.621 * q2,
            y - 0.272 * i2 - 0.647 * q2,
            y - 1.106 * i2 + 1.703 * q2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_turn_scaling() {
        assert_eq!(HueAdjust::from_half_turns(1.0).angle, PI);
        assert_eq!(HueAdjust::from_half_turns(-0.5).angle, -PI / 2.0);
    }

    #[test]
    fn zero_and_full_turn_are_identity() {
        assert!(HueAdjust::new(0.0).is_identity());
        assert!(HueAdjust::new(2.0 * PI).is_identity());
        assert!(!HueAdjust::new(0.3).is_identity());
    }

    #[test]
    fn gray_is_unaffected() {
        let out = HueAdjust::new(1.3).apply(LinSrgb::new(0.4, 0.4, 0.4));
        assert!((out.red - 0.4).abs() < 1e-3);
        assert!((out.green - 0.4).abs() < 1e-3);
        assert!((out.blue - 0.4).abs() < 1e-3);
    }
}
