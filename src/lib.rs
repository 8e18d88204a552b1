#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/ddc-broadcast/0.1.0/")]
#![cfg_attr(feature = "doc", feature(doc_cfg))]

//! Broadcast a DDC/CI VCP feature write to every attached monitor.
//!
//! Every logical display is asked for the physical monitors behind it, and
//! each of those is sent the same feature write. Monitors that reject the
//! write are ignored, so a broadcast only fails when the monitors themselves
//! cannot be enumerated.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(windows)]
//! # fn main() {
//! use ddc_broadcast::power;
//!
//! if !power::set_monitors_standby() {
//!     eprintln!("could not enumerate monitors");
//! }
//! # }
//! # #[cfg(not(windows))]
//! # fn main() { }
//! ```

pub use self::{
    broadcast::{Broadcast, BroadcastError, Broadcaster},
    command::VcpCommand,
    facility::DisplayFacility,
    power::PowerMode,
};
#[cfg(windows)]
pub use self::{
    monitor::Monitor,
    native::{broadcast_feature, Native},
    output::Output,
};
#[cfg(windows)]
#[doc(no_inline)]
pub use windows::core::Error;
#[doc(no_inline)]
pub use ddc::FeatureCode;

mod broadcast;
mod command;
mod facility;
#[cfg(windows)]
mod monitor;
#[cfg(windows)]
mod native;
#[cfg(windows)]
mod output;
pub mod power;

#[cfg(windows)]
#[cfg_attr(feature = "doc", doc(cfg(feature = "win32")))]
pub mod win32 {
    //! [`windows`] API re-exports

    #[allow(missing_docs)]
    #[cfg_attr(feature = "doc", doc(cfg(feature = "win32")))]
    #[cfg_attr(not(feature = "win32"), doc(hidden))]
    #[doc(no_inline)]
    pub use windows::{
        core::HRESULT,
        Win32::{
            Devices::Display::PHYSICAL_MONITOR,
            Foundation::{HANDLE, WIN32_ERROR},
            Graphics::Gdi::HMONITOR,
        },
    };
    pub use windows::{self, core, Win32};
}
