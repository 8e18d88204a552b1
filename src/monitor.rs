#[cfg(doc)]
use windows::Win32;
use {
    std::{
        fmt::{self, Debug, Formatter},
        slice,
    },
    windows::{
        core::Result as WinResult,
        Win32::{
            Devices::Display::{DestroyPhysicalMonitors, SetVCPFeature, PHYSICAL_MONITOR},
            Foundation::{BOOL, HANDLE},
        },
    },
};

/// A handle to an attached physical monitor that accepts DDC/CI writes.
///
/// This is a wrapper around a [`PHYSICAL_MONITOR`][physicalmonitor].
/// The handle is not released on drop; see [`Monitor::destroy_all`].
///
/// See also: [`Win32::Devices::Display::PHYSICAL_MONITOR`]
///
/// [physicalmonitor]: https://learn.microsoft.com/en-us/windows/win32/api/physicalmonitorenumerationapi/ns-physicalmonitorenumerationapi-physical_monitor
#[derive(Clone, Default)]
#[repr(transparent)]
#[doc(alias = "PHYSICAL_MONITOR")]
pub struct Monitor {
    monitor: PHYSICAL_MONITOR,
}

impl Monitor {
    /// Sets the value of a Virtual Control Panel (VCP) code for this monitor.
    #[doc(alias = "SetVCPFeature")]
    pub fn set_vcp_feature(&self, code: u8, value: u32) -> WinResult<()> {
        BOOL(unsafe { SetVCPFeature(self.win32_handle(), code, value) }).ok()
    }

    /// Releases the handles of monitors retrieved by
    /// [`Output::physical_monitors`](crate::Output::physical_monitors).
    #[doc(alias = "DestroyPhysicalMonitors")]
    pub fn destroy_all(monitors: &mut [Self]) -> WinResult<()> {
        if monitors.is_empty() {
            return Ok(())
        }
        BOOL(unsafe { DestroyPhysicalMonitors(Self::as_win32_slice_mut(monitors)) }).ok()
    }
}

#[allow(missing_docs)]
#[cfg_attr(feature = "doc", doc(cfg(feature = "win32")))]
#[cfg_attr(not(feature = "win32"), doc(hidden))]
impl Monitor {
    /// Create a new monitor from the specified handle.
    pub unsafe fn from_win32(monitor: PHYSICAL_MONITOR) -> Self {
        Monitor { monitor }
    }

    pub const fn win32_info(&self) -> &PHYSICAL_MONITOR {
        &self.monitor
    }

    /// Physical monitor winapi handle.
    #[doc(alias = "hPhysicalMonitor")]
    pub const fn win32_handle(&self) -> HANDLE {
        self.monitor.hPhysicalMonitor
    }

    pub fn as_win32_slice_mut(monitors: &mut [Self]) -> &mut [PHYSICAL_MONITOR] {
        unsafe { slice::from_raw_parts_mut(monitors.as_mut_ptr() as *mut PHYSICAL_MONITOR, monitors.len()) }
    }
}

impl Debug for Monitor {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Monitor").field("handle", &self.win32_handle()).finish()
    }
}

impl AsRef<PHYSICAL_MONITOR> for Monitor {
    fn as_ref(&self) -> &PHYSICAL_MONITOR {
        &self.monitor
    }
}
