//! Register-level screen descriptions exchanged with the framebuffer
//! driver, and the conversions to and from [`VideoMode`].
//!
//! [`VarScreenInfo`] and [`FixScreenInfo`] mirror the kernel's
//! `fb_var_screeninfo`/`fb_fix_screeninfo` ABI layout; they are the raw
//! blocks the get/set ioctls operate on. The two conversion directions are
//! deliberately not inverses: encoding rebuilds the block from zero (stale
//! driver state cannot leak through) and decoding drops the mode name
//! (register-derived modes are anonymous).

use bitflags::bitflags;

use crate::mode::{Polarity, VideoMode};

/// `activate`: apply the new settings immediately.
pub const FB_ACTIVATE_NOW: u32 = 0;
/// `activate`: apply on the next device open.
pub const FB_ACTIVATE_NXTOPEN: u32 = 1;
/// `activate`: validate against the hardware without applying.
pub const FB_ACTIVATE_TEST: u32 = 2;
pub const FB_ACTIVATE_MASK: u32 = 15;

bitflags! {
    /// Sync-signal flags of `fb_var_screeninfo::sync`.
    ///
    /// All bits are independent; any subset may be set simultaneously.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct SyncFlags: u32 {
        /// Horizontal sync is active-high.
        const HOR_HIGH_ACT = 1;
        /// Vertical sync is active-high.
        const VERT_HIGH_ACT = 2;
        /// Sync is sourced externally.
        const EXT = 4;
        /// Composite sync is active-high.
        const COMP_HIGH_ACT = 8;
        /// Broadcast (TV) video timings.
        const BROADCAST = 16;
    }
}

// Scan-mode selector values of `fb_var_screeninfo::vmode`. Unlike the sync
// flags these are mutually exclusive within FB_VMODE_MASK.
pub const FB_VMODE_NONINTERLACED: u32 = 0;
pub const FB_VMODE_INTERLACED: u32 = 1;
pub const FB_VMODE_DOUBLE: u32 = 2;
pub const FB_VMODE_MASK: u32 = 255;
/// The console should track mode changes.
pub const FB_VMODE_CONUPDATE: u32 = 512;

// Pixel layout types of `fb_fix_screeninfo::type_`.
pub const FB_TYPE_PACKED_PIXELS: u32 = 0;
pub const FB_TYPE_PLANES: u32 = 1;
pub const FB_TYPE_INTERLEAVED_PLANES: u32 = 2;

// Visual classes of `fb_fix_screeninfo::visual`.
pub const FB_VISUAL_MONO01: u32 = 0;
pub const FB_VISUAL_MONO10: u32 = 1;
pub const FB_VISUAL_TRUECOLOR: u32 = 2;
pub const FB_VISUAL_PSEUDOCOLOR: u32 = 3;
pub const FB_VISUAL_DIRECTCOLOR: u32 = 4;
pub const FB_VISUAL_STATIC_PSEUDOCOLOR: u32 = 5;
pub const FB_VISUAL_STATIC_DIRECTCOLOR: u32 = 6;

/// Color channel layout (matches the kernel `fb_bitfield`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bitfield {
    pub offset: u32,
    pub length: u32,
    pub msb_right: u32,
}

/// Variable (mode-dependent) screen parameters (matches the kernel
/// `fb_var_screeninfo`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct VarScreenInfo {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub xoffset: u32,
    pub yoffset: u32,
    pub bits_per_pixel: u32,
    pub grayscale: u32,
    pub red: Bitfield,
    pub green: Bitfield,
    pub blue: Bitfield,
    pub transp: Bitfield,
    pub nonstd: u32,
    pub activate: u32,
    pub height: u32,
    pub width: u32,
    pub accel_flags: u32,
    /// Pixel clock in picoseconds.
    pub pixclock: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub upper_margin: u32,
    pub lower_margin: u32,
    pub hsync_len: u32,
    pub vsync_len: u32,
    pub sync: u32,
    pub vmode: u32,
    pub rotate: u32,
    pub colorspace: u32,
    pub reserved: [u32; 4],
}

/// Fixed (device-invariant) screen parameters (matches the kernel
/// `fb_fix_screeninfo`). Consumed only by the report printer; the core
/// treats it as a pass-through.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FixScreenInfo {
    pub id: [u8; 16],
    pub smem_start: libc::c_ulong,
    pub smem_len: u32,
    pub type_: u32,
    pub type_aux: u32,
    pub visual: u32,
    pub xpanstep: u16,
    pub ypanstep: u16,
    pub ywrapstep: u16,
    pub line_length: u32,
    pub mmio_start: libc::c_ulong,
    pub mmio_len: u32,
    pub accel: u32,
    pub capabilities: u16,
    pub reserved: [u16; 2],
}

impl FixScreenInfo {
    /// Driver identification string, NUL-trimmed.
    pub fn id_str(&self) -> String {
        let end = self.id.iter().position(|&b| b == 0).unwrap_or(self.id.len());
        String::from_utf8_lossy(&self.id[..end]).into_owned()
    }
}

impl VarScreenInfo {
    /// Encode `mode` for the driver.
    ///
    /// `apply_now` selects between an immediate mode switch and a
    /// validate-only round trip.
    pub fn from_mode(mode: &VideoMode, apply_now: bool) -> Self {
        let mut var = Self::default();
        var.xres = mode.xres;
        var.yres = mode.yres;
        var.xres_virtual = mode.vxres;
        var.yres_virtual = mode.vyres;
        var.bits_per_pixel = mode.depth;
        var.activate = if apply_now {
            FB_ACTIVATE_NOW
        } else {
            FB_ACTIVATE_TEST
        };
        var.pixclock = mode.pixclock;
        var.left_margin = mode.left;
        var.right_margin = mode.right;
        var.upper_margin = mode.upper;
        var.lower_margin = mode.lower;
        var.hsync_len = mode.hslen;
        var.vsync_len = mode.vslen;

        let mut sync = SyncFlags::empty();
        sync.set(SyncFlags::HOR_HIGH_ACT, mode.hsync.is_high());
        sync.set(SyncFlags::VERT_HIGH_ACT, mode.vsync.is_high());
        sync.set(SyncFlags::COMP_HIGH_ACT, mode.csync.is_high());
        sync.set(SyncFlags::EXT, mode.extsync);
        sync.set(SyncFlags::BROADCAST, mode.bcast);
        var.sync = sync.bits();

        // Interlace takes precedence should both scan modes be set,
        // mirroring the VideoMode invariant.
        var.vmode = if mode.laced {
            FB_VMODE_INTERLACED
        } else if mode.dblscan {
            FB_VMODE_DOUBLE
        } else {
            FB_VMODE_NONINTERLACED
        };
        var.vmode |= FB_VMODE_CONUPDATE;
        var
    }

    /// Decode the block into an anonymous [`VideoMode`].
    ///
    /// Always finishes with a scan-rate pass; a geometrically degenerate
    /// block decodes to a mode with zeroed rates rather than an error, and
    /// callers display whatever rates resulted.
    pub fn to_mode(&self) -> VideoMode {
        let sync = SyncFlags::from_bits_truncate(self.sync);
        let mut mode = VideoMode {
            name: None,
            xres: self.xres,
            yres: self.yres,
            vxres: self.xres_virtual,
            vyres: self.yres_virtual,
            depth: self.bits_per_pixel,
            pixclock: self.pixclock,
            left: self.left_margin,
            right: self.right_margin,
            upper: self.upper_margin,
            lower: self.lower_margin,
            hslen: self.hsync_len,
            vslen: self.vsync_len,
            hsync: Polarity::from(sync.contains(SyncFlags::HOR_HIGH_ACT)),
            vsync: Polarity::from(sync.contains(SyncFlags::VERT_HIGH_ACT)),
            csync: Polarity::from(sync.contains(SyncFlags::COMP_HIGH_ACT)),
            extsync: sync.contains(SyncFlags::EXT),
            bcast: sync.contains(SyncFlags::BROADCAST),
            laced: false,
            dblscan: false,
            hrate: 0.0,
            vrate: 0.0,
        };
        // The scan mode comes only from the selector, never the sync mask.
        match self.vmode & FB_VMODE_MASK {
            FB_VMODE_INTERLACED => mode.laced = true,
            FB_VMODE_DOUBLE => mode.dblscan = true,
            _ => {}
        }
        mode.update_rates();
        mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ModeRecord;

    fn sample_mode() -> VideoMode {
        let mut mode = VideoMode::from_record(&ModeRecord {
            name: "640x480-60".to_string(),
            xres: 640,
            yres: 480,
            vxres: 640,
            vyres: 480,
            depth: 8,
            pixclock: 39721,
            left: 48,
            right: 16,
            upper: 33,
            lower: 10,
            hslen: 96,
            vslen: 2,
            hsync: Polarity::High,
            csync: Polarity::High,
            extsync: true,
            ..ModeRecord::default()
        });
        assert!(mode.update_rates());
        mode
    }

    #[test]
    fn var_screeninfo_matches_the_kernel_abi_size() {
        assert_eq!(std::mem::size_of::<VarScreenInfo>(), 160);
    }

    #[test]
    fn round_trip_preserves_everything_but_the_name() {
        let mode = sample_mode();
        let back = VarScreenInfo::from_mode(&mode, true).to_mode();

        assert_eq!(back.name, None);
        let renamed = VideoMode {
            name: mode.name.clone(),
            ..back.clone()
        };
        assert_eq!(renamed, mode);
        // Rates are recomputed, not copied, and must still agree.
        assert_eq!(back.hrate, mode.hrate);
        assert_eq!(back.vrate, mode.vrate);
    }

    #[test]
    fn activate_field_selects_dry_run_or_switch() {
        let mode = sample_mode();
        assert_eq!(
            VarScreenInfo::from_mode(&mode, true).activate,
            FB_ACTIVATE_NOW
        );
        assert_eq!(
            VarScreenInfo::from_mode(&mode, false).activate,
            FB_ACTIVATE_TEST
        );
    }

    #[test]
    fn sync_bits_are_independent() {
        let mut mode = sample_mode();
        mode.hsync = Polarity::High;
        mode.vsync = Polarity::Low;
        mode.csync = Polarity::High;
        mode.extsync = true;
        mode.bcast = true;
        let var = VarScreenInfo::from_mode(&mode, false);
        let sync = SyncFlags::from_bits_truncate(var.sync);
        assert!(sync.contains(SyncFlags::HOR_HIGH_ACT));
        assert!(!sync.contains(SyncFlags::VERT_HIGH_ACT));
        assert!(sync.contains(SyncFlags::COMP_HIGH_ACT));
        assert!(sync.contains(SyncFlags::EXT));
        assert!(sync.contains(SyncFlags::BROADCAST));

        let back = var.to_mode();
        assert_eq!(back.hsync, Polarity::High);
        assert_eq!(back.vsync, Polarity::Low);
        assert_eq!(back.csync, Polarity::High);
        assert!(back.extsync);
        assert!(back.bcast);
    }

    #[test]
    fn scan_mode_selector_round_trips() {
        let mut mode = sample_mode();

        mode.laced = true;
        mode.dblscan = false;
        let var = VarScreenInfo::from_mode(&mode, false);
        assert_eq!(var.vmode & FB_VMODE_MASK, FB_VMODE_INTERLACED);
        let back = var.to_mode();
        assert!(back.laced && !back.dblscan);

        mode.laced = false;
        mode.dblscan = true;
        let var = VarScreenInfo::from_mode(&mode, false);
        assert_eq!(var.vmode & FB_VMODE_MASK, FB_VMODE_DOUBLE);
        let back = var.to_mode();
        assert!(!back.laced && back.dblscan);

        mode.dblscan = false;
        let var = VarScreenInfo::from_mode(&mode, false);
        assert_eq!(var.vmode & FB_VMODE_MASK, FB_VMODE_NONINTERLACED);
        let back = var.to_mode();
        assert!(!back.laced && !back.dblscan);
    }

    #[test]
    fn interlace_wins_in_the_selector() {
        // Both bits set on the entity (bypassing normalization) still
        // encode as interlaced.
        let mut mode = sample_mode();
        mode.laced = true;
        mode.dblscan = true;
        let var = VarScreenInfo::from_mode(&mode, false);
        assert_eq!(var.vmode & FB_VMODE_MASK, FB_VMODE_INTERLACED);
    }

    #[test]
    fn console_update_marker_is_always_set() {
        let mode = sample_mode();
        let var = VarScreenInfo::from_mode(&mode, true);
        assert_eq!(var.vmode & FB_VMODE_CONUPDATE, FB_VMODE_CONUPDATE);
    }

    #[test]
    fn degenerate_registers_still_decode() {
        let var = VarScreenInfo::default();
        let mode = var.to_mode();
        assert_eq!(mode.hrate, 0.0);
        assert_eq!(mode.vrate, 0.0);
        assert_eq!(mode.name, None);
    }

    #[test]
    fn fix_id_is_nul_trimmed() {
        let mut fix = FixScreenInfo::default();
        fix.id[..7].copy_from_slice(b"OffPix8");
        assert_eq!(fix.id_str(), "OffPix8");
    }
}
