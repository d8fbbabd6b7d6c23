#![forbid(unsafe_code)]

//! `fbtune`: show and set framebuffer device video modes.
//!
//! The flow is a single shot: pick a base mode (a named entry from the mode
//! database, or the device's live register state), apply the requested
//! edits, push the result to the driver, and report the state the driver
//! actually accepted.

mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use fbtune::{
    parse_bool_token, Direction, ModeCatalog, ModeChanges, ModeError, Polarity, VarScreenInfo,
};
use fbtune_fbdev::FbDevice;

/// Default video mode database file.
const DEFAULT_MODEDB: &str = "/etc/fb.modes";

#[derive(Debug, Parser)]
#[command(
    name = "fbtune",
    version,
    about = "Show and set frame buffer device video modes"
)]
struct Args {
    /// Named mode from the mode database (reads the live mode when absent).
    mode: Option<String>,

    /// Processed frame buffer device (changes apply immediately when this
    /// is left at its default).
    #[arg(long = "fb", value_name = "DEVICE")]
    fb: Option<PathBuf>,

    /// Input frame buffer device (default: same as the processed device).
    #[arg(long = "infb", value_name = "DEVICE")]
    infb: Option<PathBuf>,

    /// Video mode database file.
    #[arg(long = "db", value_name = "FILE", default_value = DEFAULT_MODEDB)]
    db: PathBuf,

    /// Change the video mode immediately.
    #[arg(short = 'n', long = "now")]
    now: bool,

    /// Display the video mode settings.
    #[arg(short = 's', long = "show")]
    show: bool,

    /// Display all frame buffer information.
    #[arg(short = 'i', long = "info")]
    info: bool,

    /// Verbose logging.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// XFree86-style report format.
    #[arg(short = 'x', long = "xfree86")]
    xfree86: bool,

    /// Horizontal resolution (pixels).
    #[arg(long, value_name = "VALUE")]
    xres: Option<u32>,

    /// Vertical resolution (pixel lines).
    #[arg(long, value_name = "VALUE")]
    yres: Option<u32>,

    /// Virtual horizontal resolution (pixels).
    #[arg(long, value_name = "VALUE")]
    vxres: Option<u32>,

    /// Virtual vertical resolution (pixel lines).
    #[arg(long, value_name = "VALUE")]
    vyres: Option<u32>,

    /// Display depth (bits per pixel).
    #[arg(long, value_name = "VALUE")]
    depth: Option<u32>,

    /// Pixel clock (picoseconds).
    #[arg(long, value_name = "VALUE")]
    pixclock: Option<u32>,

    /// Left margin (pixels).
    #[arg(long, value_name = "VALUE")]
    left: Option<u32>,

    /// Right margin (pixels).
    #[arg(long, value_name = "VALUE")]
    right: Option<u32>,

    /// Upper margin (pixel lines).
    #[arg(long, value_name = "VALUE")]
    upper: Option<u32>,

    /// Lower margin (pixel lines).
    #[arg(long, value_name = "VALUE")]
    lower: Option<u32>,

    /// Horizontal sync length (pixels).
    #[arg(long, value_name = "VALUE")]
    hslen: Option<u32>,

    /// Vertical sync length (pixel lines).
    #[arg(long, value_name = "VALUE")]
    vslen: Option<u32>,

    /// Horizontal sync polarity (low or high).
    #[arg(long, value_name = "VALUE")]
    hsync: Option<String>,

    /// Vertical sync polarity (low or high).
    #[arg(long, value_name = "VALUE")]
    vsync: Option<String>,

    /// Composite sync polarity (low or high).
    #[arg(long, value_name = "VALUE")]
    csync: Option<String>,

    /// External sync enable (false or true).
    #[arg(long, value_name = "VALUE")]
    extsync: Option<String>,

    /// Broadcast enable (false or true).
    #[arg(long, value_name = "VALUE")]
    bcast: Option<String>,

    /// Interlace enable (false or true).
    #[arg(long, value_name = "VALUE")]
    laced: Option<String>,

    /// Doublescan enable (false or true).
    #[arg(long = "double", value_name = "VALUE")]
    dblscan: Option<String>,

    /// Set all geometry parameters at once.
    #[arg(
        short = 'g',
        long = "geometry",
        num_args = 5,
        value_names = ["XRES", "YRES", "VXRES", "VYRES", "DEPTH"]
    )]
    geometry: Option<Vec<u32>>,

    /// Set all timing parameters at once.
    #[arg(
        short = 't',
        long = "timings",
        num_args = 7,
        value_names = ["PIXCLOCK", "LEFT", "RIGHT", "UPPER", "LOWER", "HSLEN", "VSLEN"]
    )]
    timings: Option<Vec<u32>>,

    /// Move the visible part of the display (left, right, up or down).
    #[arg(long = "move", value_name = "DIRECTION")]
    shift: Option<String>,

    /// Step increment in pixels/pixel lines (default 8 horizontal,
    /// 2 vertical).
    #[arg(long, value_name = "VALUE")]
    step: Option<u32>,
}

impl Args {
    /// Collect the requested mode edits.
    ///
    /// The `--geometry`/`--timings` shortcuts land first, so an individual
    /// field flag always overrides its slot in a shortcut.
    fn changes(&self) -> Result<ModeChanges> {
        let mut changes = ModeChanges::default();

        if let Some(g) = &self.geometry {
            changes.xres = Some(g[0]);
            changes.yres = Some(g[1]);
            changes.vxres = Some(g[2]);
            changes.vyres = Some(g[3]);
            changes.depth = Some(g[4]);
        }
        if let Some(t) = &self.timings {
            changes.pixclock = Some(t[0]);
            changes.left = Some(t[1]);
            changes.right = Some(t[2]);
            changes.upper = Some(t[3]);
            changes.lower = Some(t[4]);
            changes.hslen = Some(t[5]);
            changes.vslen = Some(t[6]);
        }

        if let Some(v) = self.xres {
            changes.xres = Some(v);
        }
        if let Some(v) = self.yres {
            changes.yres = Some(v);
        }
        if let Some(v) = self.vxres {
            changes.vxres = Some(v);
        }
        if let Some(v) = self.vyres {
            changes.vyres = Some(v);
        }
        if let Some(v) = self.depth {
            changes.depth = Some(v);
        }
        if let Some(v) = self.pixclock {
            changes.pixclock = Some(v);
        }
        if let Some(v) = self.left {
            changes.left = Some(v);
        }
        if let Some(v) = self.right {
            changes.right = Some(v);
        }
        if let Some(v) = self.upper {
            changes.upper = Some(v);
        }
        if let Some(v) = self.lower {
            changes.lower = Some(v);
        }
        if let Some(v) = self.hslen {
            changes.hslen = Some(v);
        }
        if let Some(v) = self.vslen {
            changes.vslen = Some(v);
        }

        changes.hsync = self.hsync.as_deref().map(str::parse::<Polarity>).transpose()?;
        changes.vsync = self.vsync.as_deref().map(str::parse::<Polarity>).transpose()?;
        changes.csync = self.csync.as_deref().map(str::parse::<Polarity>).transpose()?;
        changes.extsync = self.extsync.as_deref().map(parse_bool_token).transpose()?;
        changes.bcast = self.bcast.as_deref().map(parse_bool_token).transpose()?;
        changes.laced = self.laced.as_deref().map(parse_bool_token).transpose()?;
        changes.dblscan = self.dblscan.as_deref().map(parse_bool_token).transpose()?;

        changes.shift = self
            .shift
            .as_deref()
            .map(str::parse::<Direction>)
            .transpose()?;
        changes.step = self.step;

        Ok(changes)
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the mode catalog from the database file.
///
/// Any duplicate or degenerate record aborts the build; a partial catalog
/// is never used.
fn load_catalog(path: &Path) -> Result<ModeCatalog> {
    tracing::debug!("reading mode database {}", path.display());
    let records = fbtune_modedb::read_mode_db(path)
        .with_context(|| format!("reading mode database {}", path.display()))?;
    let mut catalog = ModeCatalog::new();
    for record in &records {
        catalog
            .add(record)
            .with_context(|| path.display().to_string())?;
    }
    Ok(catalog)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // An explicitly named output device gets a validate-only round trip
    // unless --now is also given; the default device applies immediately.
    let (out_dev, apply_now) = match &args.fb {
        Some(dev) => (dev.clone(), args.now),
        None => (PathBuf::from(fbtune_fbdev::DEFAULT_DEVICE), true),
    };
    let in_dev = args.infb.clone().unwrap_or_else(|| out_dev.clone());

    let changes = args.changes()?;
    let modifying = args.mode.is_some() || !changes.is_empty() || args.now;

    // Select the base mode: the catalog by name, or the live register
    // state converted back into a VideoMode.
    let mut fb = None;
    let mut current = match &args.mode {
        Some(name) => {
            let catalog = load_catalog(&args.db)?;
            let mode = catalog
                .find(name)
                .ok_or_else(|| ModeError::UnknownModeName(name.clone()))?;
            tracing::debug!("using video mode `{name}`");
            mode.clone()
        }
        None => {
            let dev = FbDevice::open(&in_dev)?;
            let var = dev.var_screeninfo()?;
            tracing::debug!("using current video mode from {}", in_dev.display());
            let mode = var.to_mode();
            fb = Some(dev);
            mode
        }
    };

    if modifying {
        changes.apply(&mut current)?;

        // The read handle may point at a different node than the processed
        // device; close it before opening the output handle.
        drop(fb.take());
        let dev = FbDevice::open(&out_dev)?;
        let mut var = VarScreenInfo::from_mode(&current, apply_now);
        tracing::debug!("setting video mode on {}", out_dev.display());
        dev.put_var_screeninfo(&mut var)?;
        // The driver may have rounded the request; its answer, not the
        // request, is the resulting configuration.
        current = var.to_mode();
        fb = Some(dev);
    }

    if args.show || !modifying {
        print!("{}", report::mode_report(&current, args.xfree86));
    }

    if args.info {
        let dev = match fb.take() {
            Some(dev) => dev,
            None => FbDevice::open(&out_dev)?,
        };
        tracing::debug!("getting further frame buffer information");
        let fix = dev.fix_screeninfo()?;
        print!("{}", report::fix_report(&fix));
    }

    Ok(())
}
