//! OS adapters for `padcycle`.
//!
//! Implementations of the [`toggle`](crate::toggle) trait seams and the
//! [`Monitor`](crate::monitor::Monitor) lifecycle for platform-specific
//! device stacks. Today that means SetupAPI and `WM_DEVICECHANGE` on
//! Windows; the core protocol itself is platform-independent.

#[cfg(target_os = "windows")]
#[cfg_attr(docsrs, doc(cfg(target_os = "windows")))]
pub mod windows;
