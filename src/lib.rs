//! reaper-icons: toolbar and track icon generation for the REAPER DAW
//!
//! This crate turns a source image into the files REAPER picks up from its
//! resource folder:
//!
//! - three-state toolbar sprite sheets (normal, hover, active) at 100 %,
//!   150 % and 200 %, with an optional `_on` sheet for toggle buttons
//! - square track icons at 64, 128 or 256 pixels
//!
//! The states are either derived from one image by per-state hue,
//! saturation and brightness adjustments, or supplied one image per state.
//!
//! # Example
//!
//! ```
//! use reaper_icons::{
//!     ButtonState, HsbAdjustment, IconScale, RasterBuffer, extract_state,
//!     generate_toolbar_icon,
//! };
//!
//! let source = RasterBuffer::filled(64, 48, [200, 40, 40, 255]).unwrap();
//! let sheet = generate_toolbar_icon(
//!     &source,
//!     IconScale::Scale150,
//!     &HsbAdjustment::off_defaults(),
//!     0.0,
//! )
//! .unwrap();
//!
//! assert_eq!((sheet.width(), sheet.height()), (135, 45));
//! let hover = extract_state(&sheet, ButtonState::Hover).unwrap();
//! assert_eq!(hover.width(), 45);
//! ```
//!
//! # Exporting
//!
//! [`export`] plans every output path, validates the request and then writes
//! the files one at a time. [`ExportTask`] runs the same thing on the rayon
//! pool:
//!
//! ```no_run
//! use reaper_icons::{ExportSettings, ExportTask, data_dir, default_resource_dir};
//!
//! let settings = ExportSettings::new("synth").with_source("synth.png").with_toggle(true);
//! let resources = default_resource_dir().expect("REAPER is not installed");
//! let request = settings.load_request(data_dir(&resources)).unwrap();
//!
//! let report = ExportTask::spawn(request).wait().unwrap();
//! for path in &report.written {
//!     println!("{}", path.display());
//! }
//! ```

mod adjust;
mod compositor;
mod destination;
mod error;
mod export;
mod generator;
mod geometry;
mod profile;
mod raster;
mod slots;
mod state;

pub use adjust::{ColorControls, ColorFilter, HsbAdjustment, HueAdjust, adjust_hsb, apply_filters};
pub use compositor::{combine_state_set, combine_states, extract_state};
pub use destination::{DATA_DIR_NAME, conventional_resource_dir, data_dir, default_resource_dir};
pub use error::{ExportError, RasterError};
pub use export::{
    ExportPlan, ExportReport, ExportRequest, ExportSources, ExportTask, FALLBACK_ICON_NAME,
    IconJob, Mode, PlannedFile, TOGGLE_ON_SUFFIX, TOOLBAR_DIR, TRACK_DIR, ToolbarImages, export,
    export_in_background, sanitize_icon_name,
};
pub use generator::{
    IconScale, MAX_ICON_PADDING, TrackIconSize, clamp_padding, generate_preview,
    generate_state_previews, generate_toolbar_icon, generate_toolbar_icon_manual,
    generate_track_icon,
};
pub use geometry::{composite_over, crop_to_square, scale_exact, scale_with_padding, square_crop_rect};
pub use profile::{DEFAULT_ICON_NAME, ExportSettings};
pub use raster::{RasterBuffer, RectPx, SizePx};
pub use slots::{ManualSlot, Section, SlotBoard};
pub use state::{ButtonState, StateSet};
