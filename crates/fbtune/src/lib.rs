//! Video-mode data model and timing engine for framebuffer configuration.
//!
//! This crate is the hardware-independent core of the `fbtune` tool. It
//! provides:
//! - [`VideoMode`], the canonical representation of one display timing
//!   configuration, with its scan-rate derivation.
//! - [`ModeCatalog`], the named collection of known-good timing presets
//!   built from parsed mode-database records.
//! - [`ModeChanges`], the rule set for incrementally modifying a mode
//!   (field overrides and margin shifts).
//! - [`VarScreenInfo`]/[`FixScreenInfo`], the register-level blocks the
//!   framebuffer driver exchanges over its get/set ioctls, and the
//!   bidirectional (but deliberately lossy) conversion between them and
//!   [`VideoMode`].
//!
//! Reading the mode-database text format and talking to the device node
//! live in the `fbtune-modedb` and `fbtune-fbdev` crates.

mod catalog;
mod edit;
mod error;
mod mode;
mod screeninfo;

pub use catalog::ModeCatalog;
pub use edit::{Direction, ModeChanges};
pub use error::{ModeError, Result};
pub use mode::{parse_bool_token, ModeRecord, Polarity, VideoMode};
pub use screeninfo::{
    Bitfield, FixScreenInfo, SyncFlags, VarScreenInfo, FB_ACTIVATE_MASK, FB_ACTIVATE_NOW,
    FB_ACTIVATE_NXTOPEN, FB_ACTIVATE_TEST, FB_TYPE_INTERLEAVED_PLANES, FB_TYPE_PACKED_PIXELS,
    FB_TYPE_PLANES, FB_VISUAL_DIRECTCOLOR, FB_VISUAL_MONO01, FB_VISUAL_MONO10,
    FB_VISUAL_PSEUDOCOLOR, FB_VISUAL_STATIC_DIRECTCOLOR, FB_VISUAL_STATIC_PSEUDOCOLOR,
    FB_VISUAL_TRUECOLOR, FB_VMODE_CONUPDATE, FB_VMODE_DOUBLE, FB_VMODE_INTERLACED, FB_VMODE_MASK,
    FB_VMODE_NONINTERLACED,
};
