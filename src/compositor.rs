//! Sprite-sheet composition.
//!
//! A toolbar sprite sheet places the normal, hover and active tiles side by
//! side, left to right, with no gaps:
//!
//! ```text
//! x: 0        tile       2*tile     3*tile
//!    ┌─────────┬──────────┬──────────┐
//!    │ normal  │  hover   │  active  │  tile
//!    └─────────┴──────────┴──────────┘
//! ```

use image::imageops;
use image::RgbaImage;

use crate::error::RasterError;
use crate::raster::RasterBuffer;
use crate::state::{ButtonState, StateSet};

/// Joins three `tile x tile` buffers into a `3*tile x tile` sprite sheet.
///
/// Tiles are copied verbatim, not blended. Inputs must already be scaled to
/// the tile size.
pub fn combine_states(
    normal: &RasterBuffer,
    hover: &RasterBuffer,
    active: &RasterBuffer,
    tile: u32,
) -> Result<RasterBuffer, RasterError> {
    if tile == 0 {
        return Err(RasterError::EmptyDimensions);
    }
    for buffer in [normal, hover, active] {
        if buffer.width() != tile || buffer.height() != tile {
            return Err(RasterError::TileSizeMismatch {
                expected: tile,
                actual: (buffer.width(), buffer.height()),
            });
        }
    }

    let mut sheet = RgbaImage::new(tile * 3, tile);
    let tiles = StateSet::new(normal, hover, active);
    for state in ButtonState::ALL {
        imageops::replace(
            &mut sheet,
            tiles.get(state).as_image(),
            (state.index() * tile) as i64,
            0,
        );
    }

    RasterBuffer::new(sheet)
}

/// Joins a [`StateSet`] of tiles. See [`combine_states`].
pub fn combine_state_set(
    tiles: &StateSet<RasterBuffer>,
    tile: u32,
) -> Result<RasterBuffer, RasterError> {
    combine_states(&tiles.normal, &tiles.hover, &tiles.active, tile)
}

/// Cuts one state tile back out of a three-state sprite sheet.
///
/// The sheet must be exactly three times as wide as it is tall.
pub fn extract_state(sheet: &RasterBuffer, state: ButtonState) -> Result<RasterBuffer, RasterError> {
    let tile = sheet.height();
    if sheet.width() != tile * 3 {
        return Err(RasterError::NotASpriteSheet);
    }

    let cropped = imageops::crop_imm(sheet.as_image(), state.index() * tile, 0, tile, tile);
    RasterBuffer::new(cropped.to_image())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(tile: u32, rgba: [u8; 4]) -> RasterBuffer {
        RasterBuffer::filled(tile, tile, rgba).unwrap()
    }

    #[test]
    fn tiles_are_copied_left_to_right() {
        let a = solid(4, [255, 0, 0, 255]);
        let b = solid(4, [0, 255, 0, 128]);
        let c = solid(4, [0, 0, 255, 0]);

        let sheet = combine_states(&a, &b, &c, 4).unwrap();
        assert_eq!((sheet.width(), sheet.height()), (12, 4));

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(sheet.pixel(x, y), a.pixel(x, y));
                assert_eq!(sheet.pixel(x + 4, y), b.pixel(x, y));
                assert_eq!(sheet.pixel(x + 8, y), c.pixel(x, y));
            }
        }
    }

    #[test]
    fn mismatched_tile_rejected() {
        let a = solid(4, [1, 1, 1, 255]);
        let wrong = RasterBuffer::filled(4, 5, [1, 1, 1, 255]).unwrap();

        let err = combine_states(&a, &wrong, &a, 4).unwrap_err();
        assert!(matches!(
            err,
            RasterError::TileSizeMismatch {
                expected: 4,
                actual: (4, 5)
            }
        ));
    }

    #[test]
    fn extract_returns_original_tiles() {
        let tiles = StateSet::new(
            solid(3, [10, 0, 0, 255]),
            solid(3, [0, 20, 0, 255]),
            solid(3, [0, 0, 30, 255]),
        );
        let sheet = combine_state_set(&tiles, 3).unwrap();

        for state in ButtonState::ALL {
            assert_eq!(&extract_state(&sheet, state).unwrap(), tiles.get(state));
        }
    }

    #[test]
    fn extract_rejects_non_sheet() {
        let not_sheet = RasterBuffer::filled(10, 3, [0, 0, 0, 255]).unwrap();
        assert!(matches!(
            extract_state(&not_sheet, ButtonState::Hover),
            Err(RasterError::NotASpriteSheet)
        ));
    }
}
