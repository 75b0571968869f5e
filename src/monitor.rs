//! Monitor lifecycle.
//!
//! A monitor is an event source with an explicit start/stop lifecycle:
//! constructing one acquires whatever sink resource the platform needs,
//! [`start`](Monitor::start) registers interest in device-interface change
//! broadcasts, [`stop`](Monitor::stop) unregisters. Events are delivered one
//! at a time, in arrival order, on a single logical thread — the monitor
//! never blocks, retries, or queues, and unrecognized or malformed
//! notifications are silently ignored.
//!
//! The Windows implementation is
//! [`backends::windows::DeviceMonitor`](crate::backends); it is driven by the
//! host's message pump (or its own non-blocking `pump()`), matching how
//! device-change broadcasts are delivered by the OS.

use crate::error::Win32Error;

/// Start/stop lifecycle of a hot-plug event source.
pub trait Monitor {
    /// Register for device-interface change broadcasts. Idempotent: calling
    /// `start` on an already started monitor is a no-op.
    fn start(&mut self) -> Result<(), Win32Error>;

    /// Reverse the registration. Idempotent; must be called (or happen on
    /// drop) before the sink resource is torn down.
    fn stop(&mut self) -> Result<(), Win32Error>;
}
