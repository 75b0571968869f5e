#![cfg(target_os = "windows")]

//! Hidden message sink for device-change notifications.
//!
//! [`DeviceMonitor`] owns a message-only window for its whole lifetime and
//! registers it for HID device-interface broadcasts on
//! [`start`](crate::monitor::Monitor::start). Decoded events fan out through
//! a [`HotplugBus`] synchronously from the window procedure; delivery is
//! therefore sequential and bound to the thread that pumps messages —
//! usually the host UI thread. Hosts without a message loop of their own can
//! call [`DeviceMonitor::pump`] periodically.
//!
//! ## Safety notes
//! The window procedure finds its monitor through a thread-local registry
//! keyed by window handle. That is sound because everything here is
//! single-threaded by construction: the window is created, pumped, and
//! destroyed on one thread, and `DeviceMonitor` is `!Send`.

use core::ffi::c_void;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ptr;

use windows_sys::core::GUID;
use windows_sys::Win32::Foundation::{HANDLE, HWND, LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, PeekMessageW,
    RegisterClassW, RegisterDeviceNotificationW, TranslateMessage, UnregisterDeviceNotification,
    DEVICE_NOTIFY_ALL_INTERFACE_CLASSES, DEVICE_NOTIFY_WINDOW_HANDLE, HDEVNOTIFY, MSG, PM_REMOVE,
    WM_DEVICECHANGE, WNDCLASSW,
};

use crate::broadcast::{decode_device_change, DBT_DEVTYP_DEVICEINTERFACE};
use crate::error::Win32Error;
use crate::eventbus::{EventFilter, HotplugBus, HotplugListener};
use crate::monitor::Monitor;

/// HID device-interface class, `{4D1E55B2-F16F-11CF-88CB-001111000030}`.
const GUID_DEVINTERFACE_HID: GUID = GUID {
    data1: 0x4D1E55B2,
    data2: 0xF16F,
    data3: 0x11CF,
    data4: [0x88, 0xCB, 0x00, 0x11, 0x11, 0x00, 0x00, 0x30],
};

// Local constants (avoid relying on module exports that vary by windows-sys version)
const HWND_MESSAGE: HWND = -3isize as HWND;
const ERROR_CLASS_ALREADY_EXISTS: u32 = 1410;

const CLASS_NAME: &str = "PadCycleDeviceSink";

/// Registration filter for HID device-interface broadcasts. Declared locally
/// so the sink controls its exact layout; the matching decode lives in
/// [`crate::broadcast`].
#[repr(C)]
struct DevBroadcastDeviceInterfaceW {
    dbcc_size: u32,
    dbcc_devicetype: u32,
    dbcc_reserved: u32,
    dbcc_classguid: GUID,
    dbcc_name: [u16; 1],
}

thread_local! {
    /// Window handle → bus of the monitor that owns it.
    static SINKS: RefCell<HashMap<isize, *const RefCell<HotplugBus>>> =
        RefCell::new(HashMap::new());
}

/// Hot-plug monitor backed by a hidden message-only window.
pub struct DeviceMonitor {
    hwnd: HWND,
    registration: Option<HDEVNOTIFY>,
    // Boxed so the address handed to the registry stays stable while the
    // monitor value moves.
    bus: Box<RefCell<HotplugBus>>,
}

impl DeviceMonitor {
    /// Create the message sink. The window exists for the monitor's whole
    /// lifetime; no notifications are delivered until `start()`.
    pub fn new() -> Result<Self, Win32Error> {
        let hwnd = create_sink_window()?;
        let bus = Box::new(RefCell::new(HotplugBus::new()));

        SINKS.with(|sinks| {
            sinks
                .borrow_mut()
                .insert(hwnd as isize, &*bus as *const RefCell<HotplugBus>)
        });

        Ok(Self {
            hwnd,
            registration: None,
            bus,
        })
    }

    /// Register a listener on the monitor's bus.
    pub fn add_listener(
        &self,
        listener: impl HotplugListener + 'static,
        filter: EventFilter,
        path_prefix: Option<String>,
    ) -> u64 {
        self.bus
            .borrow_mut()
            .add_listener(listener, filter, path_prefix)
    }

    /// Unregister a listener by id.
    pub fn remove_listener(&self, id: u64) {
        self.bus.borrow_mut().remove_listener(id);
    }

    /// Drain pending messages for the sink window without blocking.
    ///
    /// Hosts that already run a message loop on this thread do not need
    /// this; `DispatchMessageW` reaches the sink either way.
    pub fn pump(&self) {
        unsafe {
            let mut msg: MSG = core::mem::zeroed();
            while PeekMessageW(&mut msg, self.hwnd, 0, 0, PM_REMOVE) != 0 {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }
}

impl Monitor for DeviceMonitor {
    fn start(&mut self) -> Result<(), Win32Error> {
        if self.registration.is_some() {
            return Ok(());
        }

        let filter = DevBroadcastDeviceInterfaceW {
            dbcc_size: core::mem::size_of::<DevBroadcastDeviceInterfaceW>() as u32,
            dbcc_devicetype: DBT_DEVTYP_DEVICEINTERFACE,
            dbcc_reserved: 0,
            dbcc_classguid: GUID_DEVINTERFACE_HID,
            dbcc_name: [0],
        };

        let handle = unsafe {
            RegisterDeviceNotificationW(
                self.hwnd as HANDLE,
                &filter as *const DevBroadcastDeviceInterfaceW as *const c_void,
                DEVICE_NOTIFY_WINDOW_HANDLE | DEVICE_NOTIFY_ALL_INTERFACE_CLASSES,
            )
        };
        if handle.is_null() {
            return Err(Win32Error::last("RegisterDeviceNotificationW"));
        }

        self.registration = Some(handle);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Win32Error> {
        if let Some(handle) = self.registration.take() {
            if unsafe { UnregisterDeviceNotification(handle) } == 0 {
                return Err(Win32Error::last("UnregisterDeviceNotification"));
            }
        }
        Ok(())
    }
}

impl Drop for DeviceMonitor {
    fn drop(&mut self) {
        // Reverse the registration before tearing the sink down.
        if let Some(handle) = self.registration.take() {
            unsafe {
                UnregisterDeviceNotification(handle);
            }
        }
        SINKS.with(|sinks| sinks.borrow_mut().remove(&(self.hwnd as isize)));
        unsafe {
            DestroyWindow(self.hwnd);
        }
    }
}

fn create_sink_window() -> Result<HWND, Win32Error> {
    let class_name: Vec<u16> = CLASS_NAME
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect();

    unsafe {
        let hinstance = GetModuleHandleW(ptr::null());

        let wc = WNDCLASSW {
            style: 0,
            lpfnWndProc: Some(sink_wndproc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: hinstance,
            hIcon: ptr::null_mut(),
            hCursor: ptr::null_mut(),
            hbrBackground: ptr::null_mut(),
            lpszMenuName: ptr::null(),
            lpszClassName: class_name.as_ptr(),
        };

        // Subsequent monitors re-use the first registration.
        if RegisterClassW(&wc) == 0 {
            let err = Win32Error::last("RegisterClassW");
            if err.code() != ERROR_CLASS_ALREADY_EXISTS {
                return Err(err);
            }
        }

        let hwnd = CreateWindowExW(
            0,
            class_name.as_ptr(),
            ptr::null(),
            0,
            0,
            0,
            0,
            0,
            HWND_MESSAGE,
            ptr::null_mut(),
            hinstance,
            ptr::null(),
        );
        if hwnd.is_null() {
            return Err(Win32Error::last("CreateWindowExW"));
        }
        Ok(hwnd)
    }
}

/// Copy the broadcast payload out of `lParam` during the message.
///
/// The first field of every `DEV_BROADCAST_*` structure is its own size, so
/// that bounds the copy.
unsafe fn broadcast_bytes(lparam: LPARAM) -> Option<Vec<u8>> {
    if lparam == 0 {
        return None;
    }
    let size = ptr::read_unaligned(lparam as *const u32) as usize;
    if size < 8 {
        return None;
    }
    Some(core::slice::from_raw_parts(lparam as *const u8, size).to_vec())
}

unsafe extern "system" fn sink_wndproc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_DEVICECHANGE {
        let bus = SINKS.with(|sinks| sinks.borrow().get(&(hwnd as isize)).copied());
        if let Some(bus) = bus {
            if let Some(payload) = broadcast_bytes(lparam) {
                if let Some(event) = decode_device_change(wparam as u32, &payload) {
                    #[cfg(feature = "debug-log")]
                    eprintln!("[SINK] {event:?}");
                    (*bus).borrow_mut().emit(&event);
                }
            }
        }
    }
    DefWindowProcW(hwnd, msg, wparam, lparam)
}
