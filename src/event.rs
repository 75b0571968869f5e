//! Hot-plug events.
//!
//! A [`HotplugEvent`] is produced per OS device-change message and consumed
//! synchronously; it is never stored by the monitor. The carried path is the
//! OS device-interface path (e.g. `\\?\HID#VID_045E&PID_028E#...`), treated
//! as an opaque string suitable for substring correlation with the toggle
//! sequence.

/// One decoded device-interface change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HotplugEvent {
    /// A matching device interface arrived.
    Attached { path: String },
    /// A matching device interface finished removal.
    Removed { path: String },
}

impl HotplugEvent {
    /// The device-interface path carried by the event.
    pub fn path(&self) -> &str {
        match self {
            HotplugEvent::Attached { path } | HotplugEvent::Removed { path } => path,
        }
    }

    /// `true` for [`HotplugEvent::Attached`].
    pub fn is_attached(&self) -> bool {
        matches!(self, HotplugEvent::Attached { .. })
    }
}
