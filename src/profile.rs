//! Serializable export settings.
//!
//! [`ExportSettings`] captures every export option in a JSON-friendly form so
//! a session can be saved, handed to the command-line tool, or sent from a
//! frontend process. Images are referenced by path and decoded by
//! [`ExportSettings::load_request`].
//!
//! # Example
//!
//! ```
//! use reaper_icons::{ExportSettings, IconScale};
//!
//! let settings = ExportSettings::new("play_button")
//!     .with_source("play.png")
//!     .with_scales([IconScale::Scale100, IconScale::Scale200])
//!     .with_toggle(true);
//!
//! let json = settings.to_json().unwrap();
//! let restored = ExportSettings::from_json(&json).unwrap();
//! assert_eq!(restored.icon_name, "play_button");
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::adjust::HsbAdjustment;
use crate::error::ExportError;
use crate::export::{ExportRequest, ExportSources, Mode};
use crate::generator::{IconScale, TrackIconSize, clamp_padding};
use crate::raster::RasterBuffer;
use crate::slots::{ManualSlot, SlotBoard};
use crate::state::StateSet;

/// Icon name used by a fresh session.
pub const DEFAULT_ICON_NAME: &str = "my_icon";

// ============================================================================
// ExportSettings
// ============================================================================

/// All export options, with image sources referenced by path.
///
/// # JSON Format
///
/// ```json
/// {
///   "iconName": "my_icon",
///   "mode": "automatic",
///   "scales": [100, 150, 200],
///   "sizes": [128],
///   "generateToolbar": true,
///   "generateTrack": true,
///   "toggle": false,
///   "padding": 0.0,
///   "offAdjustments": {
///     "normal": { "hue": 0.0, "saturation": 0.0, "brightness": -0.1 },
///     "hover":  { "hue": 0.0, "saturation": 0.0, "brightness": 0.15 },
///     "active": { "hue": 0.0, "saturation": -0.2, "brightness": -0.25 }
///   },
///   "onAdjustments": { "...": "..." },
///   "source": "logo.png",
///   "manualImages": { "off_normal": "a.png", "off_hover": "b.png" }
/// }
/// ```
///
/// Every field is optional when deserializing; missing fields take the
/// values of [`ExportSettings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    pub icon_name: String,
    pub mode: Mode,
    pub scales: BTreeSet<IconScale>,
    pub sizes: BTreeSet<TrackIconSize>,
    pub generate_toolbar: bool,
    pub generate_track: bool,
    pub toggle: bool,
    /// Tile padding fraction, `0.0..=0.35`.
    pub padding: f64,
    pub off_adjustments: StateSet<HsbAdjustment>,
    pub on_adjustments: StateSet<HsbAdjustment>,
    /// Source image for automatic mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Per-slot images for manual mode.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub manual_images: BTreeMap<ManualSlot, PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            icon_name: DEFAULT_ICON_NAME.to_string(),
            mode: Mode::Automatic,
            scales: IconScale::ALL.into_iter().collect(),
            sizes: BTreeSet::from([TrackIconSize::Size128]),
            generate_toolbar: true,
            generate_track: true,
            toggle: false,
            padding: 0.0,
            off_adjustments: HsbAdjustment::off_defaults(),
            on_adjustments: HsbAdjustment::on_defaults(),
            source: None,
            manual_images: BTreeMap::new(),
        }
    }
}

impl ExportSettings {
    /// Default settings with the given icon name.
    pub fn new(icon_name: impl Into<String>) -> Self {
        Self {
            icon_name: icon_name.into(),
            ..Self::default()
        }
    }

    /// Sets the automatic-mode source and switches to automatic mode.
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.mode = Mode::Automatic;
        self.source = Some(path.into());
        self
    }

    /// Sets a manual-mode slot image and switches to manual mode.
    pub fn with_manual_image(mut self, slot: ManualSlot, path: impl Into<PathBuf>) -> Self {
        self.mode = Mode::Manual;
        self.manual_images.insert(slot, path.into());
        self
    }

    pub fn with_scales(mut self, scales: impl IntoIterator<Item = IconScale>) -> Self {
        self.scales = scales.into_iter().collect();
        self
    }

    pub fn with_sizes(mut self, sizes: impl IntoIterator<Item = TrackIconSize>) -> Self {
        self.sizes = sizes.into_iter().collect();
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

    /// Resolves relative image paths against `base`, typically the folder
    /// holding the settings file.
    pub fn relative_to(mut self, base: &Path) -> Self {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(source) = self.source.as_mut() {
            rebase(source);
        }
        self.manual_images.values_mut().for_each(rebase);
        self
    }

    /// Decodes the referenced images and builds an [`ExportRequest`].
    ///
    /// Only the images the selected mode needs are loaded. A missing path is
    /// not an error here; the request's own validation reports it.
    pub fn load_request(
        &self,
        destination: impl Into<PathBuf>,
    ) -> Result<ExportRequest, ExportError> {
        let sources = match self.mode {
            Mode::Automatic => {
                let source = self.source.as_deref().map(open_source).transpose()?;
                ExportSources::Automatic {
                    source,
                    off: self.off_adjustments.map(HsbAdjustment::clamped),
                    on: self.on_adjustments.map(HsbAdjustment::clamped),
                }
            }
            Mode::Manual => {
                let mut slots = SlotBoard::new();
                for (&slot, path) in &self.manual_images {
                    slots.set(slot, open_source(path)?);
                }
                ExportSources::Manual { slots }
            }
        };

        Ok(
            ExportRequest::new(self.icon_name.clone(), destination, sources)
                .with_scales(self.scales.iter().copied())
                .with_sizes(self.sizes.iter().copied())
                .with_toolbar(self.generate_toolbar)
                .with_track(self.generate_track)
                .with_toggle(self.toggle)
                .with_padding(self.padding),
        )
    }

    /// Serializes the settings to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the settings to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn open_source(path: &Path) -> Result<RasterBuffer, ExportError> {
    log::debug!("loading source image {}", path.display());
    RasterBuffer::open(path).map_err(|source| ExportError::Source {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// Tests
// ============================================================================
