#![cfg(target_os = "windows")]

//! Windows device adapters.
//!
//! - **SetupAPI** enumeration and class-install state changes ([`setupdi`])
//! - **Device-change sink**: hidden message-only window receiving
//!   `WM_DEVICECHANGE` broadcasts ([`sink`])
//!
//! [`cycle_device`] is the usual entry point: it runs one disable/re-enable
//! cycle against the live SetupAPI stack. Note that changing device state
//! typically requires administrator elevation; without it the cycle reports a
//! matched device together with an access-denied error.

pub mod setupdi;
pub mod sink;

pub use setupdi::SetupDi;
pub use sink::DeviceMonitor;

use crate::filter::HardwareIdFilter;
use crate::toggle::{disable_re_enable, CycleReport};

/// Disable and re-enable the first device matching `filter` via SetupAPI.
pub fn cycle_device(filter: &mut HardwareIdFilter) -> CycleReport {
    let mut api = SetupDi;
    disable_re_enable(&mut api, filter)
}
