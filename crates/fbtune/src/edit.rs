//! Incremental mode edits: field overrides and margin shifts.

use std::str::FromStr;

use crate::error::{ModeError, Result};
use crate::mode::{Polarity, VideoMode};

/// Default horizontal shift step, pixels.
const HSTEP_DEFAULT: u32 = 8;
/// Default vertical shift step, pixel lines.
const VSTEP_DEFAULT: u32 = 2;

/// Direction of a margin shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

impl FromStr for Direction {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(ModeError::InvalidDirection(s.to_string())),
        }
    }
}

/// A set of requested mode edits; absent fields leave the mode untouched.
#[derive(Debug, Clone, Default)]
pub struct ModeChanges {
    pub xres: Option<u32>,
    pub yres: Option<u32>,
    pub vxres: Option<u32>,
    pub vyres: Option<u32>,
    pub depth: Option<u32>,
    pub pixclock: Option<u32>,
    pub left: Option<u32>,
    pub right: Option<u32>,
    pub upper: Option<u32>,
    pub lower: Option<u32>,
    pub hslen: Option<u32>,
    pub vslen: Option<u32>,
    pub hsync: Option<Polarity>,
    pub vsync: Option<Polarity>,
    pub csync: Option<Polarity>,
    pub extsync: Option<bool>,
    pub bcast: Option<bool>,
    pub laced: Option<bool>,
    pub dblscan: Option<bool>,
    /// Margin-shift request: move the visible window this way.
    pub shift: Option<Direction>,
    /// Explicit shift step; applies to both axes when present.
    pub step: Option<u32>,
}

impl ModeChanges {
    /// True when applying these changes would leave every mode untouched.
    ///
    /// A bare `step` with no direction counts as empty: it only resolves
    /// against a shift request.
    pub fn is_empty(&self) -> bool {
        self.xres.is_none()
            && self.yres.is_none()
            && self.vxres.is_none()
            && self.vyres.is_none()
            && self.depth.is_none()
            && self.pixclock.is_none()
            && self.left.is_none()
            && self.right.is_none()
            && self.upper.is_none()
            && self.lower.is_none()
            && self.hslen.is_none()
            && self.vslen.is_none()
            && self.hsync.is_none()
            && self.vsync.is_none()
            && self.csync.is_none()
            && self.extsync.is_none()
            && self.bcast.is_none()
            && self.laced.is_none()
            && self.dblscan.is_none()
            && self.shift.is_none()
    }

    /// Apply the edits to `mode` and rederive its scan rates.
    ///
    /// Field overrides land first (each independent of the others), then
    /// the margin shift, then the rate pass; a shift that would push a
    /// margin below zero and a result the scan-rate engine rejects are both
    /// fatal.
    pub fn apply(&self, mode: &mut VideoMode) -> Result<()> {
        if let Some(v) = self.xres {
            mode.xres = v;
        }
        if let Some(v) = self.yres {
            mode.yres = v;
        }
        if let Some(v) = self.vxres {
            mode.vxres = v;
        }
        if let Some(v) = self.vyres {
            mode.vyres = v;
        }
        if let Some(v) = self.depth {
            mode.depth = v;
        }
        if let Some(v) = self.pixclock {
            mode.pixclock = v;
        }
        if let Some(v) = self.left {
            mode.left = v;
        }
        if let Some(v) = self.right {
            mode.right = v;
        }
        if let Some(v) = self.upper {
            mode.upper = v;
        }
        if let Some(v) = self.lower {
            mode.lower = v;
        }
        if let Some(v) = self.hslen {
            mode.hslen = v;
        }
        if let Some(v) = self.vslen {
            mode.vslen = v;
        }
        if let Some(v) = self.hsync {
            mode.hsync = v;
        }
        if let Some(v) = self.vsync {
            mode.vsync = v;
        }
        if let Some(v) = self.csync {
            mode.csync = v;
        }
        if let Some(v) = self.extsync {
            mode.extsync = v;
        }
        if let Some(v) = self.bcast {
            mode.bcast = v;
        }
        if let Some(v) = self.laced {
            mode.laced = v;
        }
        if let Some(v) = self.dblscan {
            mode.dblscan = v;
        }
        mode.normalize_scan_mode();

        if let Some(direction) = self.shift {
            self.shift_margins(mode, direction)?;
        }

        if !mode.update_rates() {
            return Err(ModeError::InvalidMode {
                name: mode.name.clone(),
            });
        }
        Ok(())
    }

    /// Move the visible window within the total scan area.
    ///
    /// Blanking is redistributed between the opposing margins, so the total
    /// scan period on the shifted axis is unchanged.
    fn shift_margins(&self, mode: &mut VideoMode, direction: Direction) -> Result<()> {
        let step = self.step.unwrap_or(if direction.is_horizontal() {
            HSTEP_DEFAULT
        } else {
            VSTEP_DEFAULT
        });

        match direction {
            Direction::Left => {
                if step > mode.left {
                    return Err(ModeError::NegativeMargin("left"));
                }
                mode.left -= step;
                mode.right += step;
            }
            Direction::Right => {
                if step > mode.right {
                    return Err(ModeError::NegativeMargin("right"));
                }
                mode.left += step;
                mode.right -= step;
            }
            Direction::Up => {
                if step > mode.upper {
                    return Err(ModeError::NegativeMargin("upper"));
                }
                mode.upper -= step;
                mode.lower += step;
            }
            Direction::Down => {
                if step > mode.lower {
                    return Err(ModeError::NegativeMargin("lower"));
                }
                mode.upper += step;
                mode.lower -= step;
            }
        }
        Ok(())
    }
}
