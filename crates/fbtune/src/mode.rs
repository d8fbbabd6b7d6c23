//! The canonical in-memory representation of one display timing
//! configuration, and the scan-rate derivation that validates it.

use std::str::FromStr;

use crate::error::{ModeError, Result};

/// Parse one of the boolean-like literal tokens accepted by mode databases
/// and command-line overrides.
///
/// `true`/`false`, `high`/`low` and `1`/`0` are recognized
/// (case-insensitive) and synonymous within each pair.
pub fn parse_bool_token(token: &str) -> Result<bool> {
    match token.to_ascii_lowercase().as_str() {
        "false" | "low" | "0" => Ok(false),
        "true" | "high" | "1" => Ok(true),
        _ => Err(ModeError::InvalidBooleanLiteral(token.to_string())),
    }
}

/// Polarity of a sync signal: active-low or active-high.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Polarity {
    #[default]
    Low,
    High,
}

impl Polarity {
    pub fn is_high(self) -> bool {
        matches!(self, Polarity::High)
    }
}

impl From<bool> for Polarity {
    fn from(high: bool) -> Self {
        if high {
            Polarity::High
        } else {
            Polarity::Low
        }
    }
}

impl FromStr for Polarity {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self> {
        parse_bool_token(s).map(Polarity::from)
    }
}

/// One parsed mode-database record: every [`VideoMode`] field except the
/// derived scan rates.
///
/// Fields the source file leaves unset stay at their zero defaults; the
/// scan-rate check at catalog insertion rejects the degenerate result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeRecord {
    pub name: String,
    pub xres: u32,
    pub yres: u32,
    pub vxres: u32,
    pub vyres: u32,
    pub depth: u32,
    pub pixclock: u32,
    pub left: u32,
    pub right: u32,
    pub upper: u32,
    pub lower: u32,
    pub hslen: u32,
    pub vslen: u32,
    pub hsync: Polarity,
    pub vsync: Polarity,
    pub csync: Polarity,
    pub extsync: bool,
    pub bcast: bool,
    pub laced: bool,
    pub dblscan: bool,
}

/// One display timing configuration.
///
/// `name` is absent when the mode was derived from live hardware state
/// rather than the catalog. `pixclock` is in picoseconds; margins and sync
/// lengths are in pixels (horizontal) or pixel lines (vertical). The scan
/// rates are derived state: any field change must be followed by
/// [`VideoMode::update_rates`] before the mode is used again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoMode {
    pub name: Option<String>,
    // Geometry.
    pub xres: u32,
    pub yres: u32,
    pub vxres: u32,
    pub vyres: u32,
    pub depth: u32,
    // Timings.
    pub pixclock: u32,
    pub left: u32,
    pub right: u32,
    pub upper: u32,
    pub lower: u32,
    pub hslen: u32,
    pub vslen: u32,
    // Flags.
    pub hsync: Polarity,
    pub vsync: Polarity,
    pub csync: Polarity,
    pub extsync: bool,
    pub bcast: bool,
    pub laced: bool,
    pub dblscan: bool,
    // Derived scan rates, Hz.
    pub hrate: f64,
    pub vrate: f64,
}

impl VideoMode {
    /// Build a mode from a parsed database record.
    ///
    /// The scan rates are left at zero; callers run
    /// [`VideoMode::update_rates`] before using the mode.
    pub fn from_record(record: &ModeRecord) -> Self {
        let mut mode = Self {
            name: Some(record.name.clone()),
            xres: record.xres,
            yres: record.yres,
            vxres: record.vxres,
            vyres: record.vyres,
            depth: record.depth,
            pixclock: record.pixclock,
            left: record.left,
            right: record.right,
            upper: record.upper,
            lower: record.lower,
            hslen: record.hslen,
            vslen: record.vslen,
            hsync: record.hsync,
            vsync: record.vsync,
            csync: record.csync,
            extsync: record.extsync,
            bcast: record.bcast,
            laced: record.laced,
            dblscan: record.dblscan,
            hrate: 0.0,
            vrate: 0.0,
        };
        mode.normalize_scan_mode();
        mode
    }

    /// Interlace and double-scan are mutually exclusive; interlace wins.
    pub fn normalize_scan_mode(&mut self) {
        if self.laced {
            self.dblscan = false;
        }
    }

    /// Recompute `hrate`/`vrate` from the geometry and timing fields.
    ///
    /// The vertical total counts each line of a plain mode twice and each
    /// line of a double-scan mode four times; interlaced modes use the raw
    /// line total. The final doubling of `vrate` compensates for the same
    /// register convention. Returns `false` (with the rates zeroed) when
    /// either total scan period or the pixel clock is zero; callers other
    /// than the register converter must treat such a mode as unusable.
    pub fn update_rates(&mut self) -> bool {
        let htotal =
            u64::from(self.left) + u64::from(self.xres) + u64::from(self.right) + u64::from(self.hslen);
        let mut vtotal =
            u64::from(self.upper) + u64::from(self.yres) + u64::from(self.lower) + u64::from(self.vslen);

        if self.dblscan {
            vtotal <<= 2;
        } else if !self.laced {
            vtotal <<= 1;
        }

        if htotal == 0 || vtotal == 0 || self.pixclock == 0 {
            self.hrate = 0.0;
            self.vrate = 0.0;
            return false;
        }

        self.hrate = 1e12 / (htotal as f64 * f64::from(self.pixclock));
        self.vrate = self.hrate / vtotal as f64 * 2.0;
        true
    }
}
