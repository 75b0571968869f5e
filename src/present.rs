//! Presence snapshots.
//!
//! The monitor reports deltas; callers usually also want the devices that are
//! *already* plugged in when they start. [`present_devices`] enumerates the
//! current HID device list via `hidapi` without opening any device handle.

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// One currently present HID device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentDevice {
    /// OS device path (opaque; platform-specific format).
    pub path: String,
    pub vid: u16,
    pub pid: u16,
    pub product: Option<String>,
    pub serial: Option<String>,
}

impl PresentDevice {
    /// Case-insensitive substring match against the device path.
    ///
    /// Windows interface paths embed the hardware-id fragment in lowercase
    /// (`...hid#vid_045e&pid_028e#...`), so the same fragment used for the
    /// toggle filter works here.
    pub fn matches(&self, fragment: &str) -> bool {
        self.path
            .to_ascii_lowercase()
            .contains(&fragment.to_ascii_lowercase())
    }
}

/// Snapshot the currently present HID devices.
pub fn present_devices() -> Result<Vec<PresentDevice>, Error> {
    let api = hidapi::HidApi::new()?;
    Ok(api
        .device_list()
        .map(|info| PresentDevice {
            path: info.path().to_string_lossy().to_string(),
            vid: info.vendor_id(),
            pid: info.product_id(),
            product: info.product_string().map(|s| s.to_string()),
            serial: info.serial_number().map(|s| s.to_string()),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_is_case_insensitive() {
        let dev = PresentDevice {
            path: "\\\\?\\hid#vid_045e&pid_028e#7&2f0{...}".into(),
            vid: 0x045e,
            pid: 0x028e,
            product: None,
            serial: None,
        };
        assert!(dev.matches("VID_045E&PID_028E"));
        assert!(!dev.matches("VID_2717"));
    }
}
