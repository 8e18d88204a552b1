use {
    crate::{Broadcaster, DisplayFacility, Monitor, Output},
    ddc::FeatureCode,
    windows::core::{Error, Result as WinResult},
};

/// The Windows [display facility](DisplayFacility).
///
/// Displays are enumerated with `EnumDisplayMonitors` and their physical
/// monitors are addressed through the Monitor Configuration API (`dxva2`).
#[derive(Debug, Default, Copy, Clone)]
pub struct Native;

impl DisplayFacility for Native {
    type Display = Output;
    type Monitor = Monitor;
    type Error = Error;

    fn enumerate_displays(&mut self) -> WinResult<Vec<Output>> {
        Output::enumerate()
    }

    fn count_physical_monitors(&mut self, display: &Output) -> WinResult<u32> {
        display.physical_monitor_count()
    }

    fn list_physical_monitors(&mut self, display: &Output, monitors: &mut Vec<Monitor>, count: u32) -> WinResult<()> {
        monitors.resize(count as usize, Monitor::default());
        display.physical_monitors(monitors).map_err(|e| {
            monitors.clear();
            e
        })
    }

    fn set_feature(&mut self, monitor: &Monitor, code: FeatureCode, value: u32) -> WinResult<()> {
        monitor.set_vcp_feature(code, value)
    }

    fn release_physical_monitors(&mut self, monitors: &mut [Monitor]) -> WinResult<()> {
        Monitor::destroy_all(monitors)
    }
}

impl Broadcaster<Native> {
    /// Broadcast to the monitors attached to this machine
    pub const fn native() -> Self {
        Self::new(Native)
    }
}

/// Set a VCP feature on every physical monitor attached to this machine.
///
/// Returns `false` only if the monitors could not be enumerated; monitors
/// that reject the value are ignored.
pub fn broadcast_feature(code: FeatureCode, value: u32) -> bool {
    Broadcaster::native().broadcast_feature(code, value)
}
