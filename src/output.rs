#[cfg(doc)]
use windows::Win32;
use {
    crate::Monitor,
    std::{
        fmt::{self, Debug, Formatter},
        mem,
    },
    windows::{
        core::Result as WinResult,
        Win32::{
            Devices::Display::{
                GetNumberOfPhysicalMonitorsFromHMONITOR, GetPhysicalMonitorsFromHMONITOR, PHYSICAL_MONITOR,
            },
            Foundation::{BOOL, LPARAM, RECT},
            Graphics::Gdi::{EnumDisplayMonitors, HDC, HMONITOR},
        },
    },
};

/// A handle that represents a Windows desktop display
///
/// This is a wrapper around [`HMONITOR`][hmonitor].
///
/// See also: [`Win32::Graphics::Gdi::HMONITOR`]
///
/// [hmonitor]: https://learn.microsoft.com/en-us/windows/win32/gdi/hmonitor-and-the-device-context
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
#[doc(alias = "HMONITOR")]
pub struct Output {
    handle: HMONITOR,
}

impl Output {
    /// [Enumerates display monitors][enumdisplaymonitors]
    ///
    /// [enumdisplaymonitors]: https://learn.microsoft.com/en-us/windows/win32/api/winuser/nf-winuser-enumdisplaymonitors
    #[doc(alias = "EnumDisplayMonitors")]
    pub fn enumerate() -> WinResult<Vec<Self>> {
        Self::win32_enumerate().map(|m| m.into_iter().map(Self::from_win32).collect())
    }

    /// The number of [physical monitors](Monitor) associated with this output
    #[doc(alias = "GetNumberOfPhysicalMonitorsFromHMONITOR")]
    pub fn physical_monitor_count(&self) -> WinResult<u32> {
        self.win32_physical_monitor_count()
    }

    /// Retrieves the [physical monitors](Monitor) associated with this output
    /// into `monitors`, which must be sized to
    /// [`physical_monitor_count`](Self::physical_monitor_count).
    ///
    /// The retrieved handles must be released with [`Monitor::destroy_all`].
    #[doc(alias = "GetPhysicalMonitorsFromHMONITOR")]
    pub fn physical_monitors(&self, monitors: &mut [Monitor]) -> WinResult<()> {
        self.win32_physical_monitors(Monitor::as_win32_slice_mut(monitors))
    }
}

#[allow(missing_docs)]
#[cfg_attr(feature = "doc", doc(cfg(feature = "win32")))]
#[cfg_attr(not(feature = "win32"), doc(hidden))]
impl Output {
    pub const fn win32_handle(&self) -> HMONITOR {
        self.handle
    }

    pub const fn from_win32(handle: HMONITOR) -> Self {
        Self { handle }
    }

    /// Enumerates all `HMONITOR`s using the `EnumDisplayMonitors` WinAPI call.
    ///
    /// The callback is invoked synchronously, once per display, before
    /// `EnumDisplayMonitors` returns.
    #[doc(alias = "EnumDisplayMonitors")]
    pub fn win32_enumerate() -> WinResult<Vec<HMONITOR>> {
        unsafe extern "system" fn callback(
            handle: HMONITOR,
            _hdc_monitor: HDC,
            _lprc: *mut RECT,
            userdata: LPARAM,
        ) -> BOOL {
            let monitors: &mut Vec<HMONITOR> = mem::transmute(userdata);
            monitors.push(handle);
            BOOL::from(true)
        }

        let mut monitors = Vec::<HMONITOR>::new();
        let userdata = LPARAM(&mut monitors as *mut _ as _);
        unsafe { EnumDisplayMonitors(None, None, Some(callback), userdata) }.ok()?;
        Ok(monitors)
    }

    #[doc(alias = "GetNumberOfPhysicalMonitorsFromHMONITOR")]
    pub fn win32_physical_monitor_count(&self) -> WinResult<u32> {
        let mut len = 0;
        BOOL(unsafe { GetNumberOfPhysicalMonitorsFromHMONITOR(self.handle, &mut len) }).ok()?;
        Ok(len)
    }

    #[doc(alias = "GetPhysicalMonitorsFromHMONITOR")]
    pub fn win32_physical_monitors(&self, monitors: &mut [PHYSICAL_MONITOR]) -> WinResult<()> {
        if monitors.is_empty() {
            return Ok(())
        }
        BOOL(unsafe { GetPhysicalMonitorsFromHMONITOR(self.handle, monitors) }).ok()
    }
}

impl Debug for Output {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Output").field("handle", &self.handle).finish()
    }
}

impl From<Output> for HMONITOR {
    fn from(output: Output) -> Self {
        output.win32_handle()
    }
}

impl From<HMONITOR> for Output {
    fn from(handle: HMONITOR) -> Self {
        Self::from_win32(handle)
    }
}

impl AsRef<HMONITOR> for Output {
    fn as_ref(&self) -> &HMONITOR {
        &self.handle
    }
}
