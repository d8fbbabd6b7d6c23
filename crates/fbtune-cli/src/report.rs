//! Human-readable mode and device reports.
//!
//! Two mode formats are supported: the native one, which is valid
//! `fb.modes` database syntax and can be pasted back into a database file,
//! and an XFree86 modeline-style one for carrying timings over to X
//! configuration.

use std::fmt::Write;

use fbtune::{
    FixScreenInfo, VideoMode, FB_TYPE_INTERLEAVED_PLANES, FB_TYPE_PACKED_PIXELS, FB_TYPE_PLANES,
    FB_VISUAL_DIRECTCOLOR, FB_VISUAL_MONO01, FB_VISUAL_MONO10, FB_VISUAL_PSEUDOCOLOR,
    FB_VISUAL_STATIC_DIRECTCOLOR, FB_VISUAL_STATIC_PSEUDOCOLOR, FB_VISUAL_TRUECOLOR,
};

/// Render `mode` in the requested report style.
pub fn mode_report(mode: &VideoMode, xfree86: bool) -> String {
    if xfree86 {
        xfree86_style(mode)
    } else {
        modes_style(mode)
    }
}

fn modes_style(mode: &VideoMode) -> String {
    let name = mode.name.as_deref().unwrap_or("unknown");
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "mode \"{name}\"");
    let _ = writeln!(
        out,
        "    # H: {:5.3} kHz, V: {:5.3} Hz",
        mode.hrate / 1000.0,
        mode.vrate
    );
    let _ = writeln!(
        out,
        "    geometry {} {} {} {} {}",
        mode.xres, mode.yres, mode.vxres, mode.vyres, mode.depth
    );
    let _ = writeln!(
        out,
        "    timings {} {} {} {} {} {} {}",
        mode.pixclock, mode.left, mode.right, mode.upper, mode.lower, mode.hslen, mode.vslen
    );
    if mode.hsync.is_high() {
        let _ = writeln!(out, "    hsync high");
    }
    if mode.vsync.is_high() {
        let _ = writeln!(out, "    vsync high");
    }
    if mode.csync.is_high() {
        let _ = writeln!(out, "    csync high");
    }
    if mode.extsync {
        let _ = writeln!(out, "    extsync true");
    }
    if mode.bcast {
        let _ = writeln!(out, "    bcast true");
    }
    if mode.laced {
        let _ = writeln!(out, "    laced true");
    }
    if mode.dblscan {
        let _ = writeln!(out, "    double true");
    }
    let _ = writeln!(out, "endmode");
    let _ = writeln!(out);
    out
}

fn xfree86_style(mode: &VideoMode) -> String {
    let name = mode.name.as_deref().unwrap_or("unknown");
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "Mode \"{name}\"");
    let _ = writeln!(
        out,
        "    # H: {:5.3} kHz, V: {:5.3} Hz",
        mode.hrate / 1000.0,
        mode.vrate
    );
    let dot_clock_mhz = if mode.pixclock != 0 {
        1e6 / f64::from(mode.pixclock) + 0.001
    } else {
        0.0
    };
    let _ = writeln!(out, "    DotClock {dot_clock_mhz:5.3}");

    // XFree86 expresses timings as absolute positions within the scan line:
    // sync start, sync end, then total.
    let sync_start = mode.xres + mode.right;
    let sync_end = sync_start + mode.hslen;
    let total = sync_end + mode.left;
    let _ = writeln!(out, "    HTimings {} {sync_start} {sync_end} {total}", mode.xres);

    let sync_start = mode.yres + mode.lower;
    let sync_end = sync_start + mode.vslen;
    let total = sync_end + mode.upper;
    let _ = writeln!(out, "    VTimings {} {sync_start} {sync_end} {total}", mode.yres);

    let mut flags = String::from("    Flags   ");
    if mode.laced {
        flags.push_str(" Interlace");
    }
    if mode.dblscan {
        flags.push_str(" DoubleScan");
    }
    flags.push_str(if mode.hsync.is_high() { " +HSync" } else { " -HSync" });
    flags.push_str(if mode.vsync.is_high() { " +VSync" } else { " -VSync" });
    flags.push_str(if mode.csync.is_high() { " +CSync" } else { " -CSync" });
    let _ = writeln!(out, "{flags}");
    if mode.extsync {
        let _ = writeln!(out, "    # Warning: XFree86 doesn't support extsync");
    }
    if mode.bcast {
        let _ = writeln!(out, "    # Warning: XFree86 doesn't support bcast");
    }
    let _ = writeln!(out, "EndMode");
    let _ = writeln!(out);
    out
}

/// Render the fixed device descriptors.
pub fn fix_report(fix: &FixScreenInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Frame buffer device information:");
    let _ = writeln!(out, "    Name      : `{}'", fix.id_str());
    let _ = writeln!(out, "    Address   : {:#010x}", fix.smem_start);
    let _ = writeln!(out, "    Size      : {}", fix.smem_len);
    match fix.type_ {
        FB_TYPE_PACKED_PIXELS => {
            let _ = writeln!(out, "    Type      : PACKED PIXELS");
        }
        FB_TYPE_PLANES => {
            let _ = writeln!(out, "    Type      : PLANES");
        }
        FB_TYPE_INTERLEAVED_PLANES => {
            let _ = writeln!(
                out,
                "    Type      : INTERLEAVED PLANES ({} bytes interleave)",
                fix.type_aux
            );
        }
        other => {
            let _ = writeln!(out, "    Type      : {other} (UNKNOWN)");
            let _ = writeln!(out, "    Type_aux  : {}", fix.type_aux);
        }
    }
    let visual = match fix.visual {
        FB_VISUAL_MONO01 => "MONO01",
        FB_VISUAL_MONO10 => "MONO10",
        FB_VISUAL_TRUECOLOR => "TRUECOLOR",
        FB_VISUAL_PSEUDOCOLOR => "PSEUDOCOLOR",
        FB_VISUAL_DIRECTCOLOR => "DIRECTCOLOR",
        FB_VISUAL_STATIC_PSEUDOCOLOR => "STATIC PSEUDOCOLOR",
        FB_VISUAL_STATIC_DIRECTCOLOR => "STATIC DIRECTCOLOR",
        _ => "",
    };
    if visual.is_empty() {
        let _ = writeln!(out, "    Visual    : {} (UNKNOWN)", fix.visual);
    } else {
        let _ = writeln!(out, "    Visual    : {visual}");
    }
    let _ = writeln!(out, "    XPanStep  : {}", fix.xpanstep);
    let _ = writeln!(out, "    YPanStep  : {}", fix.ypanstep);
    let _ = writeln!(out, "    YWrapStep : {}", fix.ywrapstep);
    let _ = writeln!(out, "    LineLength: {}", fix.line_length);
    let _ = writeln!(out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbtune::{ModeRecord, Polarity, VideoMode};

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
            hsync: Polarity::Low,
            vsync: Polarity::Low,
            ..ModeRecord::default()
        });
        assert!(mode.update_rates());
        mode
    }

    #[test]
    fn native_report_is_valid_database_syntax() {
        let report = mode_report(&sample_mode(), false);
        assert!(report.contains("mode \"640x480-60\""));
        assert!(report.contains("    geometry 640 480 640 480 8\n"));
        assert!(report.contains("    timings 39721 48 16 33 10 96 2\n"));
        assert!(report.contains("endmode\n"));
        // Low/false flags are omitted entirely.
        assert!(!report.contains("hsync"));
        assert!(!report.contains("laced"));

        // It literally round-trips through the database parser.
        let records = fbtune_modedb::parse_mode_db(&report).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].xres, 640);
        assert_eq!(records[0].pixclock, 39721);
    }

    #[test]
    fn native_report_lists_set_flags() {
        let mut mode = sample_mode();
        mode.hsync = Polarity::High;
        mode.laced = true;
        mode.update_rates();
        let report = mode_report(&mode, false);
        assert!(report.contains("    hsync high\n"));
        assert!(report.contains("    laced true\n"));
        assert!(!report.contains("vsync high"));
    }

    #[test]
    fn anonymous_modes_print_as_unknown() {
        let mut mode = sample_mode();
        mode.name = None;
        assert!(mode_report(&mode, false).contains("mode \"unknown\""));
    }

    #[test]
    fn xfree86_report_uses_absolute_sync_positions() {
        let report = mode_report(&sample_mode(), true);
        assert!(report.contains("Mode \"640x480-60\""));
        assert!(report.contains("    HTimings 640 656 752 800\n"));
        assert!(report.contains("    VTimings 480 490 492 525\n"));
        assert!(report.contains("-HSync"));
        assert!(report.contains("-VSync"));
        assert!(report.contains("-CSync"));
        assert!(report.contains("EndMode"));
    }

    #[test]
    fn xfree86_report_warns_about_unsupported_flags() {
        let mut mode = sample_mode();
        mode.extsync = true;
        mode.bcast = true;
        mode.laced = true;
        mode.update_rates();
        let report = mode_report(&mode, true);
        assert!(report.contains(" Interlace"));
        assert!(report.contains("doesn't support extsync"));
        assert!(report.contains("doesn't support bcast"));
    }

    #[test]
    fn fix_report_decodes_type_and_visual() {
        let mut fix = FixScreenInfo::default();
        fix.id[..4].copy_from_slice(b"test");
        fix.type_ = fbtune::FB_TYPE_PACKED_PIXELS;
        fix.visual = fbtune::FB_VISUAL_TRUECOLOR;
        fix.line_length = 2560;
        let report = fix_report(&fix);
        assert!(report.contains("Name      : `test'"));
        assert!(report.contains("Type      : PACKED PIXELS"));
        assert!(report.contains("Visual    : TRUECOLOR"));
        assert!(report.contains("LineLength: 2560"));
    }
}
