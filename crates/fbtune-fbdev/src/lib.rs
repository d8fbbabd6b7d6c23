//! Framebuffer device access: the get/set ioctl boundary.
//!
//! A [`FbDevice`] wraps one open `/dev/fb*` node and exposes the three
//! requests the configuration flow needs: get the variable (mode-dependent)
//! parameters, set them (the driver writes back what it actually accepted),
//! and get the fixed device descriptors. Nothing is cached or retried; a
//! failed request is fatal to the run and the handle is released on every
//! exit path via `Drop`.

use std::fs::File;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use fbtune::{FixScreenInfo, VarScreenInfo};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FbError>;

/// Default framebuffer device node.
pub const DEFAULT_DEVICE: &str = "/dev/fb0";

// Framebuffer ioctl request codes from `linux/fb.h`. These predate the
// `_IOR`/`_IOW` direction encoding and are plain numbers in the kernel ABI.
const FBIOGET_VSCREENINFO: libc::c_ulong = 0x4600;
const FBIOPUT_VSCREENINFO: libc::c_ulong = 0x4601;
const FBIOGET_FSCREENINFO: libc::c_ulong = 0x4602;

#[derive(Debug, Error)]
pub enum FbError {
    #[error("open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ioctl {request} on {path}: {source}")]
    Ioctl {
        request: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One open framebuffer device handle.
#[derive(Debug)]
pub struct FbDevice {
    file: File,
    path: PathBuf,
}

impl FbDevice {
    /// Open the device node at `path`.
    ///
    /// Read-only access is sufficient: the set ioctl does not require a
    /// writable descriptor.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        tracing::debug!("opening frame buffer device {}", path.display());
        let file = File::open(&path).map_err(|source| FbError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch the variable (mode-dependent) screen parameters.
    pub fn var_screeninfo(&self) -> Result<VarScreenInfo> {
        let mut var = VarScreenInfo::default();
        self.ioctl(
            "FBIOGET_VSCREENINFO",
            FBIOGET_VSCREENINFO,
            std::ptr::addr_of_mut!(var).cast(),
        )?;
        Ok(var)
    }

    /// Submit new variable parameters.
    ///
    /// The driver rounds the request to what the hardware supports and
    /// writes the accepted state back into `var`; callers must treat that,
    /// not the request, as the resulting configuration.
    pub fn put_var_screeninfo(&self, var: &mut VarScreenInfo) -> Result<()> {
        self.ioctl(
            "FBIOPUT_VSCREENINFO",
            FBIOPUT_VSCREENINFO,
            std::ptr::addr_of_mut!(*var).cast(),
        )
    }

    /// Fetch the fixed (device-invariant) descriptors.
    pub fn fix_screeninfo(&self) -> Result<FixScreenInfo> {
        let mut fix = FixScreenInfo::default();
        self.ioctl(
            "FBIOGET_FSCREENINFO",
            FBIOGET_FSCREENINFO,
            std::ptr::addr_of_mut!(fix).cast(),
        )?;
        Ok(fix)
    }

    fn ioctl(
        &self,
        request_name: &'static str,
        request: libc::c_ulong,
        arg: *mut libc::c_void,
    ) -> Result<()> {
        // SAFETY: `arg` points at a live `#[repr(C)]` block whose layout
        // matches what the kernel expects for `request`.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), request, arg) };
        if rc != 0 {
            return Err(FbError::Ioctl {
                request: request_name,
                path: self.path.clone(),
                source: std::io::Error::last_os_error(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_a_missing_node_reports_the_path() {
        let err = FbDevice::open("/nonexistent/fb37").unwrap_err();
        match err {
            FbError::Open { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/fb37"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn screeninfo_ioctls_reject_non_framebuffer_files() {
        // /dev/null accepts open() but not the framebuffer requests, which
        // exercises the error path without real display hardware.
        let dev = FbDevice::open("/dev/null").expect("open /dev/null");
        let err = dev.var_screeninfo().unwrap_err();
        assert!(matches!(
            err,
            FbError::Ioctl {
                request: "FBIOGET_VSCREENINFO",
                ..
            }
        ));
    }
}
