//! reaper-icons: command-line front end for toolbar and track icon export

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use reaper_icons::{
    DEFAULT_ICON_NAME, ExportSettings, HsbAdjustment, IconScale, ManualSlot, RasterBuffer,
    Section, TrackIconSize, data_dir, default_resource_dir, export, generate_preview,
};

#[derive(Parser)]
#[command(name = "reaper-icons")]
#[command(version, about = "Toolbar and track icon generator for REAPER", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write toolbar sprite sheets and track icons
    Export {
        /// Settings file, as printed by `settings-template`
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Source image (switches to automatic mode)
        #[arg(long, value_name = "IMAGE")]
        source: Option<PathBuf>,

        /// Icon name used for every output file
        #[arg(short, long)]
        name: Option<String>,

        /// Toolbar scale in percent: 100, 150 or 200 (repeatable)
        #[arg(long = "scale", value_name = "PERCENT", value_parser = parse_scale)]
        scales: Vec<IconScale>,

        /// Track icon size in pixels: 64, 128 or 256 (repeatable)
        #[arg(long = "size", value_name = "PIXELS", value_parser = parse_size)]
        sizes: Vec<TrackIconSize>,

        /// Also write `_on` sheets for toggle buttons
        #[arg(long)]
        toggle: bool,

        /// Transparent margin per tile, as a fraction of the tile (0 to 0.35)
        #[arg(long, value_name = "FRACTION")]
        padding: Option<f64>,

        /// Skip toolbar sprite sheets
        #[arg(long)]
        no_toolbar: bool,

        /// Skip track icons
        #[arg(long)]
        no_track: bool,

        #[command(flatten)]
        target: Target,
    },

    /// Render one button state to a PNG
    Preview {
        /// Source image
        #[arg(long, value_name = "IMAGE")]
        source: PathBuf,

        /// State slot, e.g. off-normal or on-hover
        #[arg(long, value_name = "SLOT", default_value = "off-normal", value_parser = parse_slot)]
        state: ManualSlot,

        /// Preview side length in pixels
        #[arg(long, value_name = "PIXELS", default_value = "64")]
        size: u32,

        /// Override the preset hue (-1 to 1, in half turns)
        #[arg(long, allow_negative_numbers = true)]
        hue: Option<f32>,

        /// Override the preset saturation (-1 to 1)
        #[arg(long, allow_negative_numbers = true)]
        saturation: Option<f32>,

        /// Override the preset brightness (-1 to 1)
        #[arg(long, allow_negative_numbers = true)]
        brightness: Option<f32>,

        /// Output PNG
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },

    /// Print the default settings as JSON
    SettingsTemplate,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Target {
    /// Export root directory
    #[arg(long, value_name = "DIR")]
    dest: Option<PathBuf>,

    /// Export into the Data folder of the REAPER resource directory
    #[arg(long)]
    reaper: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Export {
            settings,
            source,
            name,
            scales,
            sizes,
            toggle,
            padding,
            no_toolbar,
            no_track,
            target,
        } => {
            let mut export_settings = match settings {
                Some(path) => load_settings(&path)?,
                None => ExportSettings::new(DEFAULT_ICON_NAME),
            };
            if let Some(source) = source {
                export_settings = export_settings.with_source(source);
            }
            if let Some(name) = name {
                export_settings.icon_name = name;
            }
            if !scales.is_empty() {
                export_settings = export_settings.with_scales(scales);
            }
            if !sizes.is_empty() {
                export_settings = export_settings.with_sizes(sizes);
            }
            if toggle {
                export_settings = export_settings.with_toggle(true);
            }
            if let Some(padding) = padding {
                export_settings = export_settings.with_padding(padding);
            }
            export_settings.generate_toolbar &= !no_toolbar;
            export_settings.generate_track &= !no_track;

            let destination = resolve_target(target)?;
            let request = export_settings.load_request(destination)?;
            let report = export(&request)?;
            for path in &report.written {
                println!("{}", path.display());
            }
        }
        Commands::Preview {
            source,
            state,
            size,
            hue,
            saturation,
            brightness,
            out,
        } => {
            if size == 0 {
                return Err("preview size must be positive".into());
            }
            let preset = preset_for(state);
            let adjustment = HsbAdjustment::new(
                hue.unwrap_or(preset.hue),
                saturation.unwrap_or(preset.saturation),
                brightness.unwrap_or(preset.brightness),
            );
            let image = RasterBuffer::open(&source)?;
            let preview = generate_preview(&image, adjustment, size);
            fs::write(&out, preview.encode_png()?)?;
            log::info!("wrote {} preview to {}", state.id(), out.display());
        }
        Commands::SettingsTemplate => {
            println!("{}", ExportSettings::default().to_json_pretty()?);
        }
    }
    Ok(())
}

fn load_settings(path: &Path) -> Result<ExportSettings, Box<dyn Error>> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("failed to read settings {}: {e}", path.display()))?;
    let settings = ExportSettings::from_json(&json)
        .map_err(|e| format!("invalid settings {}: {e}", path.display()))?;
    let base = path.parent().unwrap_or(Path::new("."));
    Ok(settings.relative_to(base))
}

fn resolve_target(target: Target) -> Result<PathBuf, Box<dyn Error>> {
    if let Some(dest) = target.dest {
        return Ok(dest);
    }
    let resources =
        default_resource_dir().ok_or("REAPER resource directory not found, use --dest")?;
    Ok(data_dir(&resources))
}

fn preset_for(slot: ManualSlot) -> HsbAdjustment {
    let presets = match slot.section() {
        Section::Off => HsbAdjustment::off_defaults(),
        Section::On => HsbAdjustment::on_defaults(),
    };
    *presets.get(slot.state())
}

fn parse_scale(s: &str) -> Result<IconScale, String> {
    let percent: u32 = s.trim_end_matches('%').parse().map_err(|e| format!("{e}"))?;
    IconScale::try_from(percent)
}

fn parse_size(s: &str) -> Result<TrackIconSize, String> {
    let pixels: u32 = s.trim_end_matches("px").parse().map_err(|e| format!("{e}"))?;
    TrackIconSize::try_from(pixels)
}

fn parse_slot(s: &str) -> Result<ManualSlot, String> {
    ManualSlot::from_id(&s.replace('-', "_"))
        .ok_or_else(|| format!("unknown state '{s}', expected e.g. off-normal or on-active"))
}
