//! Export planning and writing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::adjust::HsbAdjustment;
use crate::error::{ExportError, RasterError};
use crate::generator::{
    IconScale, TrackIconSize, generate_toolbar_icon, generate_toolbar_icon_manual,
    generate_track_icon,
};
use crate::raster::RasterBuffer;
use crate::slots::{ManualSlot, Section};
use crate::state::StateSet;

use super::{
    ExportReport, ExportRequest, ExportSources, TOGGLE_ON_SUFFIX, TOOLBAR_DIR, TRACK_DIR,
    checked_icon_name,
};

// ============================================================================
// Jobs
// ============================================================================

/// Images feeding one toolbar sprite sheet.
#[derive(Debug, Clone, Copy)]
pub enum ToolbarImages<'a> {
    /// One source, states derived by color adjustment.
    Adjusted {
        source: &'a RasterBuffer,
        adjustments: StateSet<HsbAdjustment>,
    },
    /// One image per state, used as-is.
    Manual(StateSet<&'a RasterBuffer>),
}

/// What has to be generated for one planned file.
#[derive(Debug, Clone, Copy)]
pub enum IconJob<'a> {
    Toolbar {
        scale: IconScale,
        images: ToolbarImages<'a>,
        padding: f64,
    },
    Track {
        size: TrackIconSize,
        source: &'a RasterBuffer,
    },
}

impl IconJob<'_> {
    /// Generates the buffer for this job.
    pub fn render(&self) -> Result<RasterBuffer, RasterError> {
        match *self {
            IconJob::Toolbar {
                scale,
                images: ToolbarImages::Adjusted {
                    source,
                    adjustments,
                },
                padding,
            } => generate_toolbar_icon(source, scale, &adjustments, padding),
            IconJob::Toolbar {
                scale,
                images: ToolbarImages::Manual(sources),
                padding,
            } => generate_toolbar_icon_manual(sources, scale, padding),
            IconJob::Track { size, source } => Ok(generate_track_icon(source, size)),
        }
    }
}

/// One output file: where it goes and how to produce it.
#[derive(Debug, Clone)]
pub struct PlannedFile<'a> {
    /// Path relative to the destination root.
    pub relative_path: PathBuf,
    pub job: IconJob<'a>,
}

// ============================================================================
// ExportPlan
// ============================================================================

/// The ordered list of files an export will write.
///
/// Order: OFF toolbar sheets by ascending scale, then `_on` sheets by
/// ascending scale (toggle only), then track icons by ascending size.
#[derive(Debug, Clone)]
pub struct ExportPlan<'a> {
    destination: &'a Path,
    icon_name: String,
    files: Vec<PlannedFile<'a>>,
}

impl<'a> ExportPlan<'a> {
    /// Validates a request and computes its plan.
    ///
    /// No filesystem access happens here.
    pub fn build(request: &'a ExportRequest) -> Result<Self, ExportError> {
        let toolbar_enabled = request.generate_toolbar;
        let track_enabled = request.generate_track;

        // Sources first: a missing image is reported before missing selections.
        let (off, on, track_source) = match &request.sources {
            ExportSources::Automatic { source, off, on } => {
                let source = source.as_ref().ok_or(ExportError::NoSourceImage)?;
                (
                    ToolbarImages::Adjusted {
                        source,
                        adjustments: *off,
                    },
                    Some(ToolbarImages::Adjusted {
                        source,
                        adjustments: *on,
                    }),
                    source,
                )
            }
            ExportSources::Manual { slots } => {
                let off = slots
                    .section(Section::Off)
                    .ok_or(ExportError::IncompleteManualStates)?;
                let on = if request.toggle {
                    Some(
                        slots
                            .section(Section::On)
                            .ok_or(ExportError::IncompleteManualStates)?,
                    )
                } else {
                    None
                };
                let track_source = slots
                    .get(ManualSlot::OffNormal)
                    .ok_or(ExportError::IncompleteManualStates)?;
                (
                    ToolbarImages::Manual(off),
                    on.map(ToolbarImages::Manual),
                    track_source,
                )
            }
        };

        if !toolbar_enabled && !track_enabled {
            return Err(ExportError::NothingToExport);
        }
        if toolbar_enabled && request.scales.is_empty() {
            return Err(ExportError::NoScalesSelected);
        }
        if track_enabled && request.sizes.is_empty() {
            return Err(ExportError::NoSizesSelected);
        }

        let icon_name = checked_icon_name(&request.icon_name)?;
        let padding = request.padding;
        let mut files = Vec::new();

        if toolbar_enabled {
            let mut passes = vec![(icon_name.clone(), off)];
            if let (true, Some(on)) = (request.toggle, on) {
                passes.push((format!("{icon_name}{TOGGLE_ON_SUFFIX}"), on));
            }

            for (name, images) in passes {
                // BTreeSet iterates in ascending order.
                for &scale in &request.scales {
                    let mut relative_path = PathBuf::from(TOOLBAR_DIR);
                    if let Some(folder) = scale.folder_name() {
                        relative_path.push(folder);
                    }
                    relative_path.push(format!("{name}.png"));

                    files.push(PlannedFile {
                        relative_path,
                        job: IconJob::Toolbar {
                            scale,
                            images,
                            padding,
                        },
                    });
                }
            }
        }

        if track_enabled {
            let suffix_sizes = request.sizes.len() > 1;
            for &size in &request.sizes {
                let file_name = if suffix_sizes {
                    format!("{icon_name}_{}.png", size.pixels())
                } else {
                    format!("{icon_name}.png")
                };

                files.push(PlannedFile {
                    relative_path: PathBuf::from(TRACK_DIR).join(file_name),
                    job: IconJob::Track {
                        size,
                        source: track_source,
                    },
                });
            }
        }

        log::debug!(
            "planned {} file(s) for '{}' under {}",
            files.len(),
            icon_name,
            request.destination.display()
        );

        Ok(Self {
            destination: &request.destination,
            icon_name,
            files,
        })
    }

    /// The sanitized icon name used for every file.
    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    pub fn destination(&self) -> &Path {
        self.destination
    }

    pub fn files(&self) -> &[PlannedFile<'a>] {
        &self.files
    }

    /// Planned paths relative to the destination root, in order.
    pub fn relative_paths(&self) -> Vec<&Path> {
        self.files.iter().map(|f| f.relative_path.as_path()).collect()
    }

    /// Writes every planned file, stopping at the first failure.
    ///
    /// Files already written when a failure occurs are left in place.
    pub fn execute(&self) -> Result<ExportReport, ExportError> {
        let mut report = ExportReport::default();

        for (index, file) in self.files.iter().enumerate() {
            let path = self.destination.join(&file.relative_path);
            log::debug!(
                "writing {}/{}: {}",
                index + 1,
                self.files.len(),
                path.display()
            );

            if let Some(dir) = path.parent() {
                ensure_dir(dir)?;
            }

            let buffer = file.job.render().map_err(|e| ExportError::FileWriteFailed {
                path: path.clone(),
                source: io::Error::other(e),
            })?;
            write_png(&buffer, &path)?;

            report.written.push(path);
        }

        log::info!(
            "exported {} file(s) for '{}' to {}",
            report.written.len(),
            self.icon_name,
            self.destination.display()
        );
        Ok(report)
    }
}

// ============================================================================
// File helpers
// ============================================================================

fn ensure_dir(dir: &Path) -> Result<(), ExportError> {
    if dir.is_dir() {
        return Ok(());
    }
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        // Another writer may have created it in the meantime.
        Err(_) if dir.is_dir() => Ok(()),
        Err(source) => Err(ExportError::DirectoryCreateFailed {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Encodes a buffer as PNG and moves it into place with a rename, so a
/// reader never sees a half-written file.
fn write_png(buffer: &RasterBuffer, path: &Path) -> Result<(), ExportError> {
    let write_failed = |source: io::Error| ExportError::FileWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let png = buffer.encode_png().map_err(|e| write_failed(io::Error::other(e)))?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result = fs::write(&tmp_path, &png).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(source) = result {
        if tmp_path.exists() {
            if let Err(e) = fs::remove_file(&tmp_path) {
                log::warn!("could not remove {}: {}", tmp_path.display(), e);
            }
        }
        return Err(write_failed(source));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
