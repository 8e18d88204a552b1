//! Monitor power control
//!
//! Shortcuts for broadcasting the MCCS "Power Mode" feature, the most common
//! reason to address every monitor at once.

use {crate::VcpCommand, ddc::FeatureCode};

/// The MCCS "Power Mode" VCP feature code (`D6h`)
pub const POWER_MODE: FeatureCode = 0xd6;

/// Values of the [`POWER_MODE`] feature
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PowerMode {
    /// DPM: On
    On = 0x01,
    /// DPM: Standby
    Standby = 0x04,
}

impl PowerMode {
    /// The feature write that switches a monitor to this mode
    pub const fn command(self) -> VcpCommand {
        VcpCommand::new(POWER_MODE, self as u32)
    }
}

impl From<PowerMode> for VcpCommand {
    fn from(mode: PowerMode) -> Self {
        mode.command()
    }
}

/// Wake every attached monitor.
///
/// Monitors that have disabled DDC/CI in standby may ignore this.
#[cfg(windows)]
pub fn set_monitors_on() -> bool {
    crate::Broadcaster::native().set_power_mode(PowerMode::On)
}

/// Put every attached monitor into standby.
#[cfg(windows)]
pub fn set_monitors_standby() -> bool {
    crate::Broadcaster::native().set_power_mode(PowerMode::Standby)
}
