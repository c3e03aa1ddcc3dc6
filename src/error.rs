//! Error types for the image pipeline and the exporter.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while constructing, decoding or encoding raster buffers.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("raster dimensions must be positive")]
    EmptyDimensions,

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("state tile is {actual:?}, expected {expected}x{expected}")]
    TileSizeMismatch { expected: u32, actual: (u32, u32) },

    #[error("image is not a three-state sprite sheet")]
    NotASpriteSheet,

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),
}

/// Errors raised by an export run.
///
/// Every variant is terminal for the export call that produced it.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No source image loaded")]
    NoSourceImage,

    #[error("Load all required state images (Normal, Hover, Active) before exporting")]
    IncompleteManualStates,

    #[error("Invalid icon name")]
    InvalidIconName,

    #[error("Nothing to export: enable toolbar icons or track icons")]
    NothingToExport,

    #[error("No toolbar icon scales selected")]
    NoScalesSelected,

    #[error("No track icon sizes selected")]
    NoSizesSelected,

    #[error("Failed to create directory: {}", path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to save image: {}", path.display())]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The worker running a background export went away without a result.
    #[error("Export stopped before reporting a result")]
    Interrupted,

    #[error("Failed to load source image: {}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: RasterError,
    },
}

impl ExportError {
    /// Returns true for errors detected before any file was touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoSourceImage
                | Self::IncompleteManualStates
                | Self::InvalidIconName
                | Self::NothingToExport
                | Self::NoScalesSelected
                | Self::NoSizesSelected
        )
    }
}
