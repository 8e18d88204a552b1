use {
    crate::{DisplayFacility, PowerMode, VcpCommand},
    ddc::FeatureCode,
    log::{debug, trace, warn},
    std::{collections::TryReserveError, error::Error as StdError, mem},
    thiserror::Error,
};

/// Applies a [`VcpCommand`] to every physical monitor of every display.
///
/// Writes are best-effort: a monitor that rejects or ignores the command
/// (a monitor in standby often stops answering DDC/CI) does not fail the
/// broadcast. Only failures to enumerate displays, or to acquire or release
/// their physical monitors, are reported.
///
/// # Example
///
/// ```rust,no_run
/// # #[cfg(windows)]
/// # fn main() -> Result<(), ddc_broadcast::BroadcastError<ddc_broadcast::Error>> {
/// use ddc_broadcast::{Broadcaster, VcpCommand};
///
/// let summary = Broadcaster::native().broadcast(VcpCommand::new(0x10, 50))?;
/// println!("brightness sent to {} monitors", summary.monitors);
/// # Ok(())
/// # }
/// # #[cfg(not(windows))]
/// # fn main() { }
/// ```
#[derive(Debug, Default, Clone)]
pub struct Broadcaster<F> {
    facility: F,
}

/// A summary of a successful broadcast
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Broadcast {
    /// Number of logical displays walked
    pub displays: usize,
    /// Number of physical monitors the command was issued to
    ///
    /// This says nothing about how many of them accepted it.
    pub monitors: usize,
}

/// A structural failure that aborted a broadcast
#[derive(Error, Debug)]
pub enum BroadcastError<E: StdError + 'static> {
    /// The displays could not be enumerated at all
    #[error("failed to enumerate displays")]
    Enumerate(#[source] E),
    /// A display refused to report its physical monitor count
    #[error("failed to count the physical monitors of display {display}")]
    Count {
        /// Index of the display in enumeration order
        display: usize,
        /// The platform error
        #[source]
        source: E,
    },
    /// No room for a display's physical monitor descriptors
    #[error("failed to allocate {count} physical monitor descriptors for display {display}")]
    Allocate {
        /// Index of the display in enumeration order
        display: usize,
        /// Requested number of descriptors
        count: u32,
        /// The allocation error
        #[source]
        source: TryReserveError,
    },
    /// A display's physical monitor handles could not be retrieved
    #[error("failed to retrieve the physical monitors of display {display}")]
    List {
        /// Index of the display in enumeration order
        display: usize,
        /// The platform error
        #[source]
        source: E,
    },
    /// A display's physical monitor handles could not be released
    #[error("failed to release the physical monitors of display {display}")]
    Release {
        /// Index of the display in enumeration order
        display: usize,
        /// The platform error
        #[source]
        source: E,
    },
}

impl<F: DisplayFacility> Broadcaster<F> {
    /// Broadcast through the given platform facility
    pub const fn new(facility: F) -> Self {
        Self { facility }
    }

    /// The underlying platform facility
    pub fn facility(&self) -> &F {
        &self.facility
    }

    /// Unwrap the underlying platform facility
    pub fn into_inner(self) -> F {
        self.facility
    }

    /// Issue `command` to every physical monitor.
    ///
    /// Displays are processed in enumeration order, and the first structural
    /// failure aborts the remaining displays. Physical monitors acquired for
    /// a display are always released before this returns.
    pub fn broadcast(&mut self, command: VcpCommand) -> Result<Broadcast, BroadcastError<F::Error>> {
        let displays = self.facility.enumerate_displays().map_err(BroadcastError::Enumerate)?;
        debug!("broadcasting {command} to {} displays", displays.len());

        let mut summary = Broadcast::default();
        for (index, display) in displays.iter().enumerate() {
            summary.monitors += self.broadcast_display(index, display, command)?;
            summary.displays += 1;
        }

        Ok(summary)
    }

    /// [Broadcast](Self::broadcast) a feature write, reporting only whether
    /// the monitors could be enumerated.
    ///
    /// `false` never means a monitor rejected the value.
    pub fn broadcast_feature(&mut self, code: FeatureCode, value: u32) -> bool {
        match self.broadcast(VcpCommand::new(code, value)) {
            Ok(_) => true,
            Err(e) => {
                debug!("broadcast of VCP {code:02x}h aborted: {e}");
                false
            },
        }
    }

    /// Switch every monitor to the given [power mode](PowerMode).
    ///
    /// Failure is logged rather than returned, as there is usually nothing a
    /// caller can do about it.
    pub fn set_power_mode(&mut self, mode: PowerMode) -> bool {
        match self.broadcast(mode.command()) {
            Ok(_) => true,
            Err(e) => {
                warn!("failed to set monitor power mode to {mode:?}: {e}");
                false
            },
        }
    }

    fn broadcast_display(
        &mut self,
        index: usize,
        display: &F::Display,
        command: VcpCommand,
    ) -> Result<usize, BroadcastError<F::Error>> {
        let count = self
            .facility
            .count_physical_monitors(display)
            .map_err(|source| BroadcastError::Count { display: index, source })?;
        debug!("display {index} {display:?} has {count} physical monitors");

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(count as usize)
            .map_err(|source| BroadcastError::Allocate {
                display: index,
                count,
                source,
            })?;
        self.facility
            .list_physical_monitors(display, &mut buffer, count)
            .map_err(|source| BroadcastError::List { display: index, source })?;

        let mut monitors = PhysicalMonitors::new(&mut self.facility, buffer);
        let addressed = monitors.set_feature(command);
        monitors
            .release()
            .map_err(|source| BroadcastError::Release { display: index, source })?;

        Ok(addressed)
    }
}

/// Physical monitor handles acquired for one display.
///
/// Released exactly once: by [`release`](Self::release), or on drop if that
/// was never reached.
struct PhysicalMonitors<'f, F: DisplayFacility> {
    facility: &'f mut F,
    monitors: Vec<F::Monitor>,
    released: bool,
}

impl<'f, F: DisplayFacility> PhysicalMonitors<'f, F> {
    fn new(facility: &'f mut F, monitors: Vec<F::Monitor>) -> Self {
        Self {
            facility,
            monitors,
            released: false,
        }
    }

    /// Returns the number of monitors the command was issued to.
    fn set_feature(&mut self, command: VcpCommand) -> usize {
        for monitor in &self.monitors {
            trace!("{command} -> {monitor:?}");
            // monitors in standby commonly drop DDC/CI writes, including power on
            let _ = self.facility.set_feature(monitor, command.code, command.value);
        }
        self.monitors.len()
    }

    fn release(mut self) -> Result<(), F::Error> {
        self.release_()
    }

    fn release_(&mut self) -> Result<(), F::Error> {
        self.released = true;
        let mut monitors = mem::take(&mut self.monitors);
        self.facility.release_physical_monitors(&mut monitors)
    }
}

impl<'f, F: DisplayFacility> Drop for PhysicalMonitors<'f, F> {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.release_();
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::power::POWER_MODE,
        std::panic::{self, AssertUnwindSafe},
    };

    #[derive(Error, Debug)]
    #[error("mock facility failure")]
    struct MockError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct MockMonitor {
        generation: usize,
        display: usize,
        index: usize,
        accepts: bool,
    }

    #[derive(Debug, Default, Clone)]
    struct MockDisplay {
        monitors: usize,
        rejects: bool,
        fail_count: bool,
        fail_list: bool,
        fail_release: bool,
        panic_on_write: bool,
    }

    impl MockDisplay {
        fn with_monitors(monitors: usize) -> Self {
            Self {
                monitors,
                ..Default::default()
            }
        }
    }

    #[derive(Debug, Default)]
    struct MockFacility {
        displays: Vec<MockDisplay>,
        fail_enumerate: bool,
        generation: usize,
        writes: Vec<(usize, usize, FeatureCode, u32)>,
        acquired: Vec<MockMonitor>,
        released: Vec<MockMonitor>,
    }

    impl MockFacility {
        fn new(displays: Vec<MockDisplay>) -> Self {
            Self {
                displays,
                ..Default::default()
            }
        }

        fn assert_no_leaks(&self) {
            assert!(self.acquired.is_empty(), "leaked {:?}", self.acquired);
        }
    }

    impl DisplayFacility for MockFacility {
        type Display = usize;
        type Monitor = MockMonitor;
        type Error = MockError;

        fn enumerate_displays(&mut self) -> Result<Vec<usize>, MockError> {
            if self.fail_enumerate {
                Err(MockError)
            } else {
                Ok((0..self.displays.len()).collect())
            }
        }

        fn count_physical_monitors(&mut self, &display: &usize) -> Result<u32, MockError> {
            let display = &self.displays[display];
            if display.fail_count {
                Err(MockError)
            } else {
                Ok(display.monitors as u32)
            }
        }

        fn list_physical_monitors(
            &mut self,
            &display: &usize,
            monitors: &mut Vec<MockMonitor>,
            count: u32,
        ) -> Result<(), MockError> {
            let info = &self.displays[display];
            assert!(monitors.is_empty());
            assert!(monitors.capacity() >= count as usize);
            if info.fail_list {
                return Err(MockError)
            }
            self.generation += 1;
            let generation = self.generation;
            let capacity = monitors.capacity();
            monitors.extend((0..count as usize).map(|index| MockMonitor {
                generation,
                display,
                index,
                accepts: !info.rejects,
            }));
            assert_eq!(capacity, monitors.capacity(), "buffer reallocated");
            self.acquired.extend(monitors.iter().copied());
            Ok(())
        }

        fn set_feature(&mut self, monitor: &MockMonitor, code: FeatureCode, value: u32) -> Result<(), MockError> {
            assert!(self.acquired.contains(monitor), "{monitor:?} not acquired");
            self.writes.push((monitor.display, monitor.index, code, value));
            if self.displays[monitor.display].panic_on_write {
                panic!("driver crashed")
            }
            if monitor.accepts {
                Ok(())
            } else {
                Err(MockError)
            }
        }

        fn release_physical_monitors(&mut self, monitors: &mut [MockMonitor]) -> Result<(), MockError> {
            for monitor in monitors.iter() {
                assert!(!self.released.contains(monitor), "{monitor:?} released twice");
                self.acquired.retain(|m| m != monitor);
                self.released.push(*monitor);
            }
            match monitors.first() {
                Some(m) if self.displays[m.display].fail_release => Err(MockError),
                _ => Ok(()),
            }
        }
    }

    fn broadcaster(displays: Vec<MockDisplay>) -> Broadcaster<MockFacility> {
        Broadcaster::new(MockFacility::new(displays))
    }

    #[test]
    fn no_displays_is_success() {
        let mut b = broadcaster(Vec::new());
        assert_eq!(b.broadcast(VcpCommand::new(0xd6, 1)).unwrap(), Broadcast::default());
        assert!(b.broadcast_feature(0x10, 100));
        assert!(b.facility().writes.is_empty());
    }

    #[test]
    fn enumeration_failure() {
        let mut b = broadcaster(vec![MockDisplay::with_monitors(1)]);
        b.facility.fail_enumerate = true;
        assert!(matches!(
            b.broadcast(VcpCommand::new(0xd6, 1)),
            Err(BroadcastError::Enumerate(MockError))
        ));
        assert!(!b.broadcast_feature(0xd6, 1));
        assert!(b.facility().writes.is_empty());
    }

    #[test]
    fn power_on_two_displays() {
        let mut b = broadcaster(vec![MockDisplay::with_monitors(1), MockDisplay::with_monitors(1)]);
        assert!(b.broadcast_feature(0xd6, 0x01));

        let facility = b.into_inner();
        assert_eq!(facility.writes, vec![(0, 0, 0xd6, 0x01), (1, 0, 0xd6, 0x01)]);
        assert_eq!(facility.released.len(), 2);
        facility.assert_no_leaks();
    }

    #[test]
    fn count_failure_aborts_remaining_displays() {
        let mut b = broadcaster(vec![
            MockDisplay::with_monitors(1),
            MockDisplay {
                fail_count: true,
                ..MockDisplay::with_monitors(1)
            },
            MockDisplay::with_monitors(1),
        ]);
        assert!(!b.broadcast_feature(0xd6, 0x01));

        let facility = b.into_inner();
        assert_eq!(facility.writes, vec![(0, 0, 0xd6, 0x01)]);
        assert_eq!(facility.released.len(), 1);
        facility.assert_no_leaks();
    }

    #[test]
    fn count_failure_reports_display() {
        let mut b = broadcaster(vec![
            MockDisplay::with_monitors(2),
            MockDisplay {
                fail_count: true,
                ..Default::default()
            },
        ]);
        match b.broadcast(VcpCommand::new(0xd6, 4)) {
            Err(BroadcastError::Count { display: 1, .. }) => (),
            res => panic!("unexpected {res:?}"),
        }
    }

    #[test]
    fn rejected_writes_are_ignored() {
        let rejecting = MockDisplay {
            rejects: true,
            ..MockDisplay::with_monitors(2)
        };
        let mut b = broadcaster(vec![rejecting.clone(), rejecting]);
        let summary = b.broadcast(VcpCommand::new(0xd6, 0x01)).unwrap();
        assert_eq!(summary, Broadcast { displays: 2, monitors: 4 });

        let facility = b.into_inner();
        assert_eq!(facility.writes.len(), 4);
        assert_eq!(facility.released.len(), 4);
        facility.assert_no_leaks();
    }

    #[test]
    fn mirrored_monitors_share_a_display() {
        let mut b = broadcaster(vec![MockDisplay::with_monitors(3), MockDisplay::with_monitors(0)]);
        let summary = b.broadcast(VcpCommand::new(0x10, 75)).unwrap();
        assert_eq!(summary, Broadcast { displays: 2, monitors: 3 });

        let facility = b.into_inner();
        assert_eq!(facility.writes, vec![(0, 0, 0x10, 75), (0, 1, 0x10, 75), (0, 2, 0x10, 75)]);
        facility.assert_no_leaks();
    }

    #[test]
    fn list_failure_acquires_nothing() {
        let mut b = broadcaster(vec![
            MockDisplay {
                fail_list: true,
                ..MockDisplay::with_monitors(2)
            },
            MockDisplay::with_monitors(1),
        ]);
        assert!(matches!(
            b.broadcast(VcpCommand::new(0xd6, 1)),
            Err(BroadcastError::List { display: 0, .. })
        ));

        let facility = b.into_inner();
        assert!(facility.writes.is_empty());
        assert!(facility.released.is_empty());
        facility.assert_no_leaks();
    }

    #[test]
    fn release_failure_is_fatal() {
        let mut b = broadcaster(vec![
            MockDisplay {
                fail_release: true,
                ..MockDisplay::with_monitors(1)
            },
            MockDisplay::with_monitors(1),
        ]);
        assert!(matches!(
            b.broadcast(VcpCommand::new(0xd6, 1)),
            Err(BroadcastError::Release { display: 0, .. })
        ));

        let facility = b.into_inner();
        assert_eq!(facility.writes, vec![(0, 0, 0xd6, 1)]);
        // not retried on drop
        assert_eq!(facility.released.len(), 1);
    }

    #[test]
    fn unwinding_releases_monitors() {
        let mut facility = MockFacility::new(vec![MockDisplay {
            panic_on_write: true,
            ..MockDisplay::with_monitors(2)
        }]);
        let res = panic::catch_unwind(AssertUnwindSafe(|| {
            Broadcaster::new(&mut facility).broadcast(VcpCommand::new(0xd6, 1))
        }));
        assert!(res.is_err());
        assert_eq!(facility.writes.len(), 1);
        assert_eq!(facility.released.len(), 2);
        facility.assert_no_leaks();
    }

    #[test]
    fn power_modes() {
        let mut b = broadcaster(vec![MockDisplay::with_monitors(1)]);
        assert!(b.set_power_mode(PowerMode::Standby));
        assert!(b.set_power_mode(PowerMode::On));
        assert_eq!(b.facility().writes, vec![(0, 0, POWER_MODE, 0x04), (0, 0, POWER_MODE, 0x01)]);

        b.facility.fail_enumerate = true;
        assert!(!b.set_power_mode(PowerMode::On));
    }

    #[test]
    fn repeated_broadcasts_reacquire_monitors() {
        let mut b = broadcaster(vec![MockDisplay::with_monitors(2)]);
        for value in 0..3 {
            assert!(b.broadcast_feature(0x10, value));
        }

        let facility = b.into_inner();
        assert_eq!(facility.writes.len(), 6);
        assert_eq!(facility.released.len(), 6);
        assert_eq!(facility.released.iter().map(|m| m.generation).max(), Some(3));
        facility.assert_no_leaks();
    }

    #[derive(Debug)]
    struct OversizedMonitor([u8; 1 << 20]);

    #[derive(Debug, Default)]
    struct OversizedFacility {
        listed: usize,
    }

    impl DisplayFacility for OversizedFacility {
        type Display = ();
        type Monitor = OversizedMonitor;
        type Error = MockError;

        fn enumerate_displays(&mut self) -> Result<Vec<()>, MockError> {
            Ok(vec![(), ()])
        }

        fn count_physical_monitors(&mut self, _display: &()) -> Result<u32, MockError> {
            Ok(u32::MAX)
        }

        fn list_physical_monitors(
            &mut self,
            _display: &(),
            _monitors: &mut Vec<OversizedMonitor>,
            _count: u32,
        ) -> Result<(), MockError> {
            self.listed += 1;
            Ok(())
        }

        fn set_feature(&mut self, _monitor: &OversizedMonitor, _code: FeatureCode, _value: u32) -> Result<(), MockError> {
            unreachable!()
        }

        fn release_physical_monitors(&mut self, _monitors: &mut [OversizedMonitor]) -> Result<(), MockError> {
            unreachable!()
        }
    }

    #[test]
    fn allocation_failure_is_fatal() {
        let mut b = Broadcaster::new(OversizedFacility::default());
        match b.broadcast(VcpCommand::new(0xd6, 1)) {
            Err(BroadcastError::Allocate {
                display: 0,
                count: u32::MAX,
                ..
            }) => (),
            res => panic!("unexpected {res:?}"),
        }
        assert!(!b.broadcast_feature(0xd6, 1));
        assert_eq!(b.facility().listed, 0);
    }

    #[test]
    fn error_messages() {
        let err = BroadcastError::Count {
            display: 2,
            source: MockError,
        };
        assert_eq!(err.to_string(), "failed to count the physical monitors of display 2");
        assert_eq!(
            StdError::source(&err).map(|e| e.to_string()).as_deref(),
            Some("mock facility failure")
        );
    }
}
