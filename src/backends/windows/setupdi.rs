#![cfg(target_os = "windows")]

//! SetupAPI adapter.
//!
//! [`SetupDi`] implements [`DeviceEnumerator`] over the live SetupAPI device
//! list. A session is a [`SetupDiSet`] guard around the `HDEVINFO` handle;
//! the handle is destroyed when the guard drops, which covers every exit
//! path of the core protocol.
//!
//! The enumeration step maps `SetupDiEnumDeviceInfo` onto the three-way
//! [`EnumStep`]: success is `Found`, `ERROR_NO_MORE_ITEMS` is `Exhausted`,
//! and any other failure is `Continue` (the index may simply be stale while
//! the list shifts underneath us).

use std::ptr;

use windows_sys::Win32::Devices::DeviceAndDriverInstallation::{
    SetupDiChangeState, SetupDiDestroyDeviceInfoList, SetupDiEnumDeviceInfo,
    SetupDiGetClassDevsW, SetupDiGetDeviceRegistryPropertyW, SetupDiSetClassInstallParamsW,
    DICS_DISABLE, DICS_ENABLE, DICS_FLAG_GLOBAL, DIF_PROPERTYCHANGE, DIGCF_ALLCLASSES, HDEVINFO,
    SPDRP_HARDWAREID, SP_CLASSINSTALL_HEADER, SP_DEVINFO_DATA, SP_PROPCHANGE_PARAMS,
};
use windows_sys::Win32::Foundation::{GetLastError, ERROR_NO_MORE_ITEMS, INVALID_HANDLE_VALUE};

use crate::error::Win32Error;
use crate::toggle::{DeviceEnumerator, DeviceInfoSet, EnumStep, StateChange};

/// Live SetupAPI enumerator.
pub struct SetupDi;

impl DeviceEnumerator for SetupDi {
    type Set = SetupDiSet;

    fn open_all_classes(&mut self) -> Result<SetupDiSet, Win32Error> {
        // No class GUID and no enumerator string: the hardware-id filter
        // alone discriminates.
        let handle = unsafe {
            SetupDiGetClassDevsW(ptr::null(), ptr::null(), ptr::null_mut(), DIGCF_ALLCLASSES)
        };
        if handle == INVALID_HANDLE_VALUE as HDEVINFO {
            return Err(Win32Error::last("SetupDiGetClassDevsW"));
        }
        Ok(SetupDiSet { handle })
    }
}

/// One open device-information set. Dropping destroys the OS handle.
pub struct SetupDiSet {
    handle: HDEVINFO,
}

impl Drop for SetupDiSet {
    fn drop(&mut self) {
        unsafe {
            SetupDiDestroyDeviceInfoList(self.handle);
        }
    }
}

impl DeviceInfoSet for SetupDiSet {
    type Record = SP_DEVINFO_DATA;

    fn enum_step(&mut self, index: u32) -> Result<EnumStep<SP_DEVINFO_DATA>, Win32Error> {
        let mut data: SP_DEVINFO_DATA = unsafe { core::mem::zeroed() };
        data.cbSize = core::mem::size_of::<SP_DEVINFO_DATA>() as u32;

        let ok = unsafe { SetupDiEnumDeviceInfo(self.handle, index, &mut data) };
        if ok != 0 {
            return Ok(EnumStep::Found(data));
        }

        match unsafe { GetLastError() } {
            ERROR_NO_MORE_ITEMS => Ok(EnumStep::Exhausted),
            _ => Ok(EnumStep::Continue),
        }
    }

    fn hardware_ids(&mut self, record: &SP_DEVINFO_DATA) -> Result<Vec<String>, Win32Error> {
        // Two-call pattern: size first, then data. SPDRP_HARDWAREID is a
        // REG_MULTI_SZ; an absent property is an empty list, not an error.
        let mut size: u32 = 0;
        unsafe {
            SetupDiGetDeviceRegistryPropertyW(
                self.handle,
                record,
                SPDRP_HARDWAREID,
                ptr::null_mut(),
                ptr::null_mut(),
                0,
                &mut size,
            );
        }
        if size == 0 {
            return Ok(Vec::new());
        }

        let mut buffer = vec![0u8; size as usize];
        let ok = unsafe {
            SetupDiGetDeviceRegistryPropertyW(
                self.handle,
                record,
                SPDRP_HARDWAREID,
                ptr::null_mut(),
                buffer.as_mut_ptr(),
                size,
                ptr::null_mut(),
            )
        };
        if ok == 0 {
            return Err(Win32Error::last("SetupDiGetDeviceRegistryPropertyW"));
        }

        Ok(decode_multi_sz(&buffer))
    }

    fn apply_state_change(
        &mut self,
        record: &SP_DEVINFO_DATA,
        change: StateChange,
    ) -> Result<(), Win32Error> {
        let mut data = *record;

        let params = SP_PROPCHANGE_PARAMS {
            ClassInstallHeader: SP_CLASSINSTALL_HEADER {
                cbSize: core::mem::size_of::<SP_CLASSINSTALL_HEADER>() as u32,
                InstallFunction: DIF_PROPERTYCHANGE,
            },
            StateChange: match change {
                StateChange::Enable => DICS_ENABLE,
                StateChange::Disable => DICS_DISABLE,
            },
            Scope: DICS_FLAG_GLOBAL,
            HwProfile: 0,
        };

        let ok = unsafe {
            SetupDiSetClassInstallParamsW(
                self.handle,
                &mut data,
                &params as *const SP_PROPCHANGE_PARAMS as *const SP_CLASSINSTALL_HEADER,
                core::mem::size_of::<SP_PROPCHANGE_PARAMS>() as u32,
            )
        };
        if ok == 0 {
            return Err(Win32Error::last("SetupDiSetClassInstallParamsW"));
        }

        let ok = unsafe { SetupDiChangeState(self.handle, &mut data) };
        if ok == 0 {
            let err = Win32Error::last("SetupDiChangeState");
            #[cfg(feature = "debug-log")]
            eprintln!("[SETUPDI/ERROR] state change failed: {err}");
            return Err(err);
        }

        #[cfg(feature = "debug-log")]
        eprintln!("[SETUPDI] applied {change:?} to DevInst 0x{:08x}", data.DevInst);

        Ok(())
    }
}

/// Decode a double-NUL-terminated UTF-16LE multi-string buffer.
fn decode_multi_sz(buffer: &[u8]) -> Vec<String> {
    let wide: Vec<u16> = buffer
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();

    let mut strings = Vec::new();
    let mut current = Vec::new();
    for &ch in &wide {
        if ch == 0 {
            if current.is_empty() {
                break;
            }
            strings.push(String::from_utf16_lossy(&current));
            current.clear();
        } else {
            current.push(ch);
        }
    }
    strings
}

#[cfg(test)]
mod tests {
    use super::decode_multi_sz;

    fn multi_sz(strings: &[&str]) -> Vec<u8> {
        let mut wide: Vec<u16> = Vec::new();
        for s in strings {
            wide.extend(s.encode_utf16());
            wide.push(0);
        }
        wide.push(0);
        wide.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn decodes_hardware_id_lists() {
        let buf = multi_sz(&["USB\\VID_045E&PID_028E&REV_0114", "USB\\VID_045E&PID_028E"]);
        assert_eq!(
            decode_multi_sz(&buf),
            vec![
                "USB\\VID_045E&PID_028E&REV_0114".to_string(),
                "USB\\VID_045E&PID_028E".to_string(),
            ]
        );
    }

    #[test]
    fn empty_buffer_is_empty_list() {
        assert!(decode_multi_sz(&[]).is_empty());
        assert!(decode_multi_sz(&[0, 0]).is_empty());
    }
}
