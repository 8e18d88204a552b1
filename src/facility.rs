use {
    ddc::FeatureCode,
    std::{error::Error as StdError, fmt::Debug},
};

/// The platform's display and monitor configuration APIs.
///
/// Displays are logical display devices (desktop outputs), each of which is
/// backed by zero or more physical monitors. Physical monitor handles are
/// acquired by [`list_physical_monitors`](Self::list_physical_monitors) and
/// must be handed back to
/// [`release_physical_monitors`](Self::release_physical_monitors).
pub trait DisplayFacility {
    /// A logical display device handle
    type Display: Debug;
    /// A physical monitor handle
    type Monitor: Debug;
    /// The error type of the platform
    type Error: StdError + 'static;

    /// Enumerate every logical display device known to the system.
    ///
    /// Displays are returned in the order the platform reports them.
    fn enumerate_displays(&mut self) -> Result<Vec<Self::Display>, Self::Error>;

    /// Count the physical monitors associated with `display`.
    fn count_physical_monitors(&mut self, display: &Self::Display) -> Result<u32, Self::Error>;

    /// Append the `count` physical monitors of `display` to `monitors`.
    ///
    /// `monitors` arrives empty, with capacity for at least `count` handles
    /// already reserved. On error no handles may remain acquired.
    fn list_physical_monitors(
        &mut self,
        display: &Self::Display,
        monitors: &mut Vec<Self::Monitor>,
        count: u32,
    ) -> Result<(), Self::Error>;

    /// Set the value of a VCP feature on a single physical monitor.
    fn set_feature(&mut self, monitor: &Self::Monitor, code: FeatureCode, value: u32) -> Result<(), Self::Error>;

    /// Release handles previously acquired by
    /// [`list_physical_monitors`](Self::list_physical_monitors).
    fn release_physical_monitors(&mut self, monitors: &mut [Self::Monitor]) -> Result<(), Self::Error>;
}

impl<'a, F: DisplayFacility + ?Sized> DisplayFacility for &'a mut F {
    type Display = F::Display;
    type Monitor = F::Monitor;
    type Error = F::Error;

    fn enumerate_displays(&mut self) -> Result<Vec<Self::Display>, Self::Error> {
        (**self).enumerate_displays()
    }

    fn count_physical_monitors(&mut self, display: &Self::Display) -> Result<u32, Self::Error> {
        (**self).count_physical_monitors(display)
    }

    fn list_physical_monitors(
        &mut self,
        display: &Self::Display,
        monitors: &mut Vec<Self::Monitor>,
        count: u32,
    ) -> Result<(), Self::Error> {
        (**self).list_physical_monitors(display, monitors, count)
    }

    fn set_feature(&mut self, monitor: &Self::Monitor, code: FeatureCode, value: u32) -> Result<(), Self::Error> {
        (**self).set_feature(monitor, code, value)
    }

    fn release_physical_monitors(&mut self, monitors: &mut [Self::Monitor]) -> Result<(), Self::Error> {
        (**self).release_physical_monitors(monitors)
    }
}
