//! Icon generation: the pipeline stages wired together.
//!
//! Every function here is a pure function of its inputs. Nothing touches the
//! filesystem and no state is shared between calls, so previews can be
//! regenerated on every parameter change and different variants can be
//! produced in parallel.

use serde::{Deserialize, Serialize};

use crate::adjust::{HsbAdjustment, adjust_hsb};
use crate::compositor::combine_states;
use crate::error::RasterError;
use crate::geometry::{crop_to_square, scale_exact, scale_with_padding};
use crate::raster::{RasterBuffer, SizePx};
use crate::state::StateSet;

/// Largest accepted icon padding, as a fraction of the tile width.
pub const MAX_ICON_PADDING: f64 = 0.35;

/// Clamps a padding fraction to `[0, MAX_ICON_PADDING]`.
pub fn clamp_padding(padding: f64) -> f64 {
    if padding.is_nan() {
        return 0.0;
    }
    padding.clamp(0.0, MAX_ICON_PADDING)
}

// ============================================================================
// IconScale
// ============================================================================

/// Toolbar icon scale factor.
///
/// Serialized as its percentage (`100`, `150`, `200`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum IconScale {
    Scale100,
    Scale150,
    Scale200,
}

impl IconScale {
    pub const ALL: [IconScale; 3] = [Self::Scale100, Self::Scale150, Self::Scale200];

    /// Scale as a percentage.
    pub fn percent(self) -> u32 {
        match self {
            Self::Scale100 => 100,
            Self::Scale150 => 150,
            Self::Scale200 => 200,
        }
    }

    /// Side length of one state tile, in pixels.
    pub fn tile_size(self) -> u32 {
        match self {
            Self::Scale100 => 30,
            Self::Scale150 => 45,
            Self::Scale200 => 60,
        }
    }

    /// Size of the full three-state sheet.
    pub fn sheet_size(self) -> SizePx {
        SizePx::new(self.tile_size() * 3, self.tile_size())
    }

    /// Subfolder below the toolbar icon directory, if any.
    pub fn folder_name(self) -> Option<&'static str> {
        match self {
            Self::Scale100 => None,
            Self::Scale150 => Some("150"),
            Self::Scale200 => Some("200"),
        }
    }

    pub fn display_name(self) -> String {
        format!("{}%", self.percent())
    }
}

impl TryFrom<u32> for IconScale {
    type Error = String;

    fn try_from(percent: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.percent() == percent)
            .ok_or_else(|| format!("unsupported toolbar scale {percent}%, expected 100, 150 or 200"))
    }
}

impl From<IconScale> for u32 {
    fn from(scale: IconScale) -> Self {
        scale.percent()
    }
}

// ============================================================================
// TrackIconSize
// ============================================================================

/// Square track icon size.
///
/// Serialized as its pixel size (`64`, `128`, `256`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TrackIconSize {
    Size64,
    Size128,
    Size256,
}

impl TrackIconSize {
    pub const ALL: [TrackIconSize; 3] = [Self::Size64, Self::Size128, Self::Size256];

    /// Side length in pixels.
    pub fn pixels(self) -> u32 {
        match self {
            Self::Size64 => 64,
            Self::Size128 => 128,
            Self::Size256 => 256,
        }
    }

    pub fn display_name(self) -> String {
        format!("{}px", self.pixels())
    }
}

impl TryFrom<u32> for TrackIconSize {
    type Error = String;

    fn try_from(pixels: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.pixels() == pixels)
            .ok_or_else(|| format!("unsupported track icon size {pixels}px, expected 64, 128 or 256"))
    }
}

impl From<TrackIconSize> for u32 {
    fn from(size: TrackIconSize) -> Self {
        size.pixels()
    }
}

/// Schema for an enum serialized as one of a fixed set of integers.
#[cfg(feature = "jsonschema")]
macro_rules! integer_enum_schema {
    ($ty:ident, $value:ident) => {
        impl schemars::JsonSchema for $ty {
            fn schema_name() -> String {
                stringify!($ty).to_string()
            }

            fn json_schema(_: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
                use schemars::schema::{InstanceType, SchemaObject};

                SchemaObject {
                    instance_type: Some(InstanceType::Integer.into()),
                    enum_values: Some($ty::ALL.iter().map(|v| v.$value().into()).collect()),
                    ..Default::default()
                }
                .into()
            }
        }
    };
}

#[cfg(feature = "jsonschema")]
integer_enum_schema!(IconScale, percent);
#[cfg(feature = "jsonschema")]
integer_enum_schema!(TrackIconSize, pixels);

// ============================================================================
// Generators
// ============================================================================

/// Builds a toolbar sprite sheet from one source image.
///
/// The source is cropped to a square once. Each state is then produced with
/// its own adjustment. Without padding the tile is scaled first and adjusted
/// second; with padding the adjustment runs on the full-size crop and the
/// padded scale comes last, so the transparent margin never goes through
/// the color filters.
pub fn generate_toolbar_icon(
    source: &RasterBuffer,
    scale: IconScale,
    adjustments: &StateSet<HsbAdjustment>,
    padding: f64,
) -> Result<RasterBuffer, RasterError> {
    let padding = clamp_padding(padding);
    let tile = scale.tile_size();
    let squared = crop_to_square(source);

    let tiles = if padding > 0.0 {
        adjustments.map(|adj| scale_with_padding(&adjust_hsb(&squared, adj), tile, tile, padding))
    } else {
        let scaled = scale_exact(&squared, tile, tile);
        adjustments.map(|adj| adjust_hsb(&scaled, adj))
    };

    log::trace!(
        "toolbar tiles ready: scale={} tile={tile} padding={padding}",
        scale.display_name()
    );
    combine_states(&tiles.normal, &tiles.hover, &tiles.active, tile)
}

/// Builds a toolbar sprite sheet from three user-supplied state images.
///
/// Each image is cropped and scaled independently; no color adjustment is
/// applied.
pub fn generate_toolbar_icon_manual(
    sources: StateSet<&RasterBuffer>,
    scale: IconScale,
    padding: f64,
) -> Result<RasterBuffer, RasterError> {
    let padding = clamp_padding(padding);
    let tile = scale.tile_size();

    let tiles = sources.map(|source| {
        let squared = crop_to_square(source);
        if padding > 0.0 {
            scale_with_padding(&squared, tile, tile, padding)
        } else {
            scale_exact(&squared, tile, tile)
        }
    });

    combine_states(&tiles.normal, &tiles.hover, &tiles.active, tile)
}

/// Builds a square track icon: crop, then scale. No color adjustment.
pub fn generate_track_icon(source: &RasterBuffer, size: TrackIconSize) -> RasterBuffer {
    let squared = crop_to_square(source);
    scale_exact(&squared, size.pixels(), size.pixels())
}

/// Builds an on-screen preview of one state: crop, scale, then adjust.
pub fn generate_preview(
    source: &RasterBuffer,
    adjustment: HsbAdjustment,
    size: u32,
) -> RasterBuffer {
    let squared = crop_to_square(source);
    let scaled = scale_exact(&squared, size, size);
    adjust_hsb(&scaled, adjustment)
}

/// Builds previews of all three states, in parallel.
pub fn generate_state_previews(
    source: &RasterBuffer,
    adjustments: &StateSet<HsbAdjustment>,
    size: u32,
) -> StateSet<RasterBuffer> {
    let squared = crop_to_square(source);
    let scaled = scale_exact(&squared, size, size);

    let (normal, (hover, active)) = rayon::join(
        || adjust_hsb(&scaled, adjustments.normal),
        || {
            rayon::join(
                || adjust_hsb(&scaled, adjustments.hover),
                || adjust_hsb(&scaled, adjustments.active),
            )
        },
    );
    StateSet::new(normal, hover, active)
}
