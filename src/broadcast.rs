//! Device-change broadcast parsing.
//!
//! This module is intentionally "dumb": it only parses `WM_DEVICECHANGE`
//! broadcast payloads into [`HotplugEvent`]s. Higher-level routing (listener
//! registration, sink lifecycle) lives in the Windows sink.
//!
//! ## What you get
//! - Arrival and remove-complete events for *device interface* broadcasts,
//!   carrying the interface path decoded from the payload
//!
//! ## What you **don't** get (by design)
//! - No registration of interest (the sink decides that)
//! - No handling of volume/port/OEM broadcast payload types
//! - `devnodes-changed` and every other sub-type are explicitly ignored
//!
//! The parser works on the raw payload bytes, so hosts that own their own
//! window procedure can copy the broadcast during the message and decode it
//! here, the same way raw report bytes are handled elsewhere in this crate's
//! lineage.

use crate::event::HotplugEvent;

// Local constants (avoid relying on module exports that vary by windows-sys version)
/// `wParam`: a device interface arrived.
pub const DBT_DEVICEARRIVAL: u32 = 0x8000;
/// `wParam`: a device interface finished removal.
pub const DBT_DEVICEREMOVECOMPLETE: u32 = 0x8004;
/// `wParam`: the device tree changed; carries no payload and is ignored.
pub const DBT_DEVNODES_CHANGED: u32 = 0x0007;

/// `dbch_devicetype`: payload is a `DEV_BROADCAST_DEVICEINTERFACE_W`.
pub(crate) const DBT_DEVTYP_DEVICEINTERFACE: u32 = 0x0005;

// DEV_BROADCAST_DEVICEINTERFACE_W layout: size(4) + devicetype(4) +
// reserved(4) + classguid(16), then the NUL-terminated UTF-16 name.
const DBCC_NAME_OFFSET: usize = 28;

/// Decode one device-change notification into an event.
///
/// `event` is the message's sub-type code (`wParam`); `payload` is the
/// broadcast structure bytes (`lParam`), which may be empty for sub-types
/// that carry none. Returns `None` for ignored sub-types and for payloads
/// that are not well-formed device-interface broadcasts.
pub fn decode_device_change(event: u32, payload: &[u8]) -> Option<HotplugEvent> {
    match event {
        DBT_DEVICEARRIVAL => {
            let path = interface_path(payload)?;
            Some(HotplugEvent::Attached { path })
        }
        DBT_DEVICEREMOVECOMPLETE => {
            let path = interface_path(payload)?;
            Some(HotplugEvent::Removed { path })
        }
        // DBT_DEVNODES_CHANGED and everything else: no event.
        _ => None,
    }
}

/// Extract the interface path from a device-interface broadcast payload.
fn interface_path(payload: &[u8]) -> Option<String> {
    if payload.len() < DBCC_NAME_OFFSET {
        return None;
    }

    let devicetype = u32::from_le_bytes(payload[4..8].try_into().ok()?);
    if devicetype != DBT_DEVTYP_DEVICEINTERFACE {
        return None;
    }

    let wide: Vec<u16> = payload[DBCC_NAME_OFFSET..]
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .take_while(|&c| c != 0)
        .collect();
    Some(String::from_utf16_lossy(&wide))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a `DEV_BROADCAST_DEVICEINTERFACE_W`-shaped payload.
    pub(crate) fn interface_payload(devicetype: u32, path: &str) -> Vec<u8> {
        let name: Vec<u8> = path
            .encode_utf16()
            .chain(std::iter::once(0))
            .flat_map(u16::to_le_bytes)
            .collect();
        let size = (DBCC_NAME_OFFSET + name.len()) as u32;

        let mut buf = Vec::with_capacity(size as usize);
        buf.extend_from_slice(&size.to_le_bytes());
        buf.extend_from_slice(&devicetype.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes()); // reserved
        buf.extend_from_slice(&[0u8; 16]); // class guid
        buf.extend_from_slice(&name);
        buf
    }

    #[test]
    fn arrival_fires_attached_with_exact_path() {
        let payload = interface_payload(DBT_DEVTYP_DEVICEINTERFACE, "\\\\?\\HID#VID_1234");
        let event = decode_device_change(DBT_DEVICEARRIVAL, &payload).unwrap();
        assert_eq!(
            event,
            HotplugEvent::Attached {
                path: "\\\\?\\HID#VID_1234".into()
            }
        );
    }

    #[test]
    fn remove_complete_fires_removed() {
        let payload = interface_payload(DBT_DEVTYP_DEVICEINTERFACE, "\\\\?\\HID#VID_1234");
        let event = decode_device_change(DBT_DEVICEREMOVECOMPLETE, &payload).unwrap();
        assert_eq!(
            event,
            HotplugEvent::Removed {
                path: "\\\\?\\HID#VID_1234".into()
            }
        );
    }

    #[test]
    fn devnodes_changed_fires_nothing() {
        assert_eq!(decode_device_change(DBT_DEVNODES_CHANGED, &[]), None);
    }

    #[test]
    fn unknown_subtypes_are_ignored() {
        let payload = interface_payload(DBT_DEVTYP_DEVICEINTERFACE, "\\\\?\\HID#VID_1234");
        assert_eq!(decode_device_change(0x8001, &payload), None);
    }

    #[test]
    fn non_interface_payload_is_dropped() {
        // DBT_DEVTYP_VOLUME-shaped payloads are out of scope.
        let payload = interface_payload(0x0002, "\\\\?\\HID#VID_1234");
        assert_eq!(decode_device_change(DBT_DEVICEARRIVAL, &payload), None);
    }

    #[test]
    fn truncated_payload_is_dropped() {
        let payload = interface_payload(DBT_DEVTYP_DEVICEINTERFACE, "\\\\?\\HID#VID_1234");
        assert_eq!(decode_device_change(DBT_DEVICEARRIVAL, &payload[..12]), None);
    }

    #[test]
    fn one_message_yields_exactly_one_dispatched_event() {
        use crate::eventbus::{EventFilter, HotplugBus, HotplugListener};
        use std::sync::mpsc::{channel, Sender};

        struct Recorder(Sender<HotplugEvent>);
        impl HotplugListener for Recorder {
            fn on_event(&mut self, event: &HotplugEvent) {
                self.0.send(event.clone()).unwrap();
            }
        }

        let (tx, rx) = channel();
        let mut bus = HotplugBus::new();
        bus.add_listener(Recorder(tx), EventFilter::All, None);

        let payload = interface_payload(DBT_DEVTYP_DEVICEINTERFACE, "\\\\?\\HID#VID_1234");
        for (subtype, _) in [
            (DBT_DEVICEARRIVAL, "arrival"),
            (DBT_DEVICEREMOVECOMPLETE, "removal"),
            (DBT_DEVNODES_CHANGED, "nodes"),
        ] {
            if let Some(event) = decode_device_change(subtype, &payload) {
                bus.emit(&event);
            }
        }

        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got.len(), 2);
        assert!(got[0].is_attached());
        assert!(!got[1].is_attached());
        assert_eq!(got[0].path(), "\\\\?\\HID#VID_1234");
    }

    #[test]
    fn unterminated_name_is_taken_to_payload_end() {
        let mut payload = interface_payload(DBT_DEVTYP_DEVICEINTERFACE, "\\\\?\\HID#VID_1234");
        payload.truncate(payload.len() - 2); // drop the NUL
        let event = decode_device_change(DBT_DEVICEARRIVAL, &payload).unwrap();
        assert_eq!(event.path(), "\\\\?\\HID#VID_1234");
    }
}
