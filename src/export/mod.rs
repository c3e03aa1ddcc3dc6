//! Export orchestration.
//!
//! An export run moves through these phases:
//!
//! ```text
//! Idle ──► Planning ──► Writing(0) ──► Writing(1) ──► … ──► Done
//!             │             │              │
//!             ▼             ▼              ▼
//!           Failed        Failed         Failed
//! ```
//!
//! Planning validates the request and computes every output path before any
//! file is touched. Writing produces one file at a time and stops at the first
//! failure; files written before the failure stay on disk.

pub mod background;
pub mod plan;

pub use background::{ExportTask, export_in_background};
pub use plan::{ExportPlan, IconJob, PlannedFile, ToolbarImages};

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::adjust::HsbAdjustment;
use crate::error::ExportError;
use crate::generator::{IconScale, TrackIconSize, clamp_padding};
use crate::raster::RasterBuffer;
use crate::slots::SlotBoard;
use crate::state::StateSet;

/// Directory below the destination root for toolbar sprite sheets.
pub const TOOLBAR_DIR: &str = "toolbar_icons";

/// Directory below the destination root for track icons.
pub const TRACK_DIR: &str = "track_icons";

/// Name used when sanitization leaves nothing behind.
pub const FALLBACK_ICON_NAME: &str = "icon";

/// Suffix appended to the icon name for the ON half of a toggle icon.
pub const TOGGLE_ON_SUFFIX: &str = "_on";

/// Longest file name most filesystems accept, in bytes.
const MAX_FILE_NAME_BYTES: usize = 255;

// ============================================================================
// Mode
// ============================================================================

/// How the button states are sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One source image; states derived by color adjustment.
    #[default]
    Automatic,
    /// One user-supplied image per state.
    Manual,
}

// ============================================================================
// ExportSources
// ============================================================================

/// The images (and adjustments) that drive an export.
#[derive(Debug, Clone)]
pub enum ExportSources {
    Automatic {
        source: Option<RasterBuffer>,
        /// Adjustments for the OFF states.
        off: StateSet<HsbAdjustment>,
        /// Adjustments for the ON states, used when the toggle is enabled.
        on: StateSet<HsbAdjustment>,
    },
    Manual {
        slots: SlotBoard<RasterBuffer>,
    },
}

impl ExportSources {
    /// Automatic mode with the default state adjustments.
    pub fn automatic(source: Option<RasterBuffer>) -> Self {
        Self::Automatic {
            source,
            off: HsbAdjustment::off_defaults(),
            on: HsbAdjustment::on_defaults(),
        }
    }

    /// Manual mode from a slot board.
    pub fn manual(slots: SlotBoard<RasterBuffer>) -> Self {
        Self::Manual { slots }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Automatic { .. } => Mode::Automatic,
            Self::Manual { .. } => Mode::Manual,
        }
    }
}

// ============================================================================
// ExportRequest
// ============================================================================

/// Everything needed to produce one set of icon files.
///
/// # Example
///
/// ```no_run
/// use reaper_icons::{ExportRequest, ExportSources, IconScale, RasterBuffer, export};
///
/// let source = RasterBuffer::open("logo.png").unwrap();
/// let request = ExportRequest::new("my_icon", "/tmp/out", ExportSources::automatic(Some(source)))
///     .with_scales([IconScale::Scale100, IconScale::Scale200])
///     .with_toggle(true);
///
/// let report = export(&request).unwrap();
/// println!("wrote {} files", report.written.len());
/// ```
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Raw icon name; sanitized during planning.
    pub icon_name: String,
    /// Destination root directory.
    pub destination: PathBuf,
    pub sources: ExportSources,
    pub scales: BTreeSet<IconScale>,
    pub sizes: BTreeSet<TrackIconSize>,
    pub generate_toolbar: bool,
    pub generate_track: bool,
    /// Also produce `_on` sprite sheets.
    pub toggle: bool,
    /// Tile padding fraction, clamped to `[0, 0.35]`.
    pub padding: f64,
}

impl ExportRequest {
    /// Creates a request with every toolbar scale, the 128 px track size,
    /// both icon kinds enabled, no toggle and no padding.
    pub fn new(
        icon_name: impl Into<String>,
        destination: impl Into<PathBuf>,
        sources: ExportSources,
    ) -> Self {
        Self {
            icon_name: icon_name.into(),
            destination: destination.into(),
            sources,
            scales: IconScale::ALL.into_iter().collect(),
            sizes: BTreeSet::from([TrackIconSize::Size128]),
            generate_toolbar: true,
            generate_track: true,
            toggle: false,
            padding: 0.0,
        }
    }

    pub fn with_scales(mut self, scales: impl IntoIterator<Item = IconScale>) -> Self {
        self.scales = scales.into_iter().collect();
        self
    }

    pub fn with_sizes(mut self, sizes: impl IntoIterator<Item = TrackIconSize>) -> Self {
        self.sizes = sizes.into_iter().collect();
        self
    }

    pub fn with_toolbar(mut self, enabled: bool) -> Self {
        self.generate_toolbar = enabled;
        self
    }

    pub fn with_track(mut self, enabled: bool) -> Self {
        self.generate_track = enabled;
        self
    }

    pub fn with_toggle(mut self, enabled: bool) -> Self {
        self.toggle = enabled;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = clamp_padding(padding);
        self
    }

    pub fn mode(&self) -> Mode {
        self.sources.mode()
    }

    /// Checks that the request can be exported, without touching the disk.
    pub fn validate(&self) -> Result<(), ExportError> {
        ExportPlan::build(self).map(|_| ())
    }
}

// ============================================================================
// ExportReport
// ============================================================================

/// Result of a successful export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Absolute paths of the files written, in plan order.
    pub written: Vec<PathBuf>,
}

// ============================================================================
// Entry points
// ============================================================================

/// Plans and writes every file of a request.
///
/// Blocks until done; use [`export_in_background`] from interactive threads.
pub fn export(request: &ExportRequest) -> Result<ExportReport, ExportError> {
    let plan = ExportPlan::build(request)?;
    plan.execute()
}

/// Reduces an icon name to alphanumerics, `_` and `-`.
///
/// Returns [`FALLBACK_ICON_NAME`] if nothing is left.
pub fn sanitize_icon_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if sanitized.is_empty() {
        FALLBACK_ICON_NAME.to_string()
    } else {
        sanitized
    }
}

/// Sanitizes a name and checks that every file derived from it fits in a
/// file name.
pub(crate) fn checked_icon_name(name: &str) -> Result<String, ExportError> {
    let sanitized = sanitize_icon_name(name);
    // Longest derived name: "<name>_on.png" or "<name>_256.png".
    let longest = sanitized.len() + "_256.png".len().max(TOGGLE_ON_SUFFIX.len() + ".png".len());
    if longest > MAX_FILE_NAME_BYTES {
        return Err(ExportError::InvalidIconName);
    }
    Ok(sanitized)
}
