//! Error types.
//!
//! [`Win32Error`] wraps a single failing OS primitive: the call name, the
//! numeric Win32 error code, and the OS-rendered message. Low-level adapters
//! raise it immediately; the two-phase cycle protocol captures it into a
//! [`CycleReport`](crate::toggle::CycleReport) instead of re-raising, so the
//! original failure detail stays available to callers and tests.

use thiserror::Error;

/// A failed OS call, identified by primitive name and Win32 error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{call} failed: {message} (os error {code})")]
pub struct Win32Error {
    call: &'static str,
    code: u32,
    message: String,
}

impl Win32Error {
    /// Wrap a known error code for the named primitive.
    pub fn new(call: &'static str, code: u32) -> Self {
        let message = std::io::Error::from_raw_os_error(code as i32).to_string();
        Self {
            call,
            code,
            message,
        }
    }

    /// Capture the calling thread's last OS error for the named primitive.
    #[cfg(target_os = "windows")]
    pub(crate) fn last(call: &'static str) -> Self {
        let code = unsafe { windows_sys::Win32::Foundation::GetLastError() };
        Self::new(call, code)
    }

    /// Name of the OS primitive that failed (e.g. `"SetupDiChangeState"`).
    pub fn call(&self) -> &'static str {
        self.call
    }

    /// Numeric Win32 error code.
    pub fn code(&self) -> u32 {
        self.code
    }
}

/// Crate-level error union.
#[derive(Debug, Error)]
pub enum Error {
    /// An OS primitive failed.
    #[error(transparent)]
    Os(#[from] Win32Error),

    /// A TOML profile could not be parsed.
    #[error("profile parse error: {0}")]
    ProfileToml(#[from] toml::de::Error),

    /// A JSON profile could not be parsed.
    #[error("profile parse error: {0}")]
    ProfileJson(#[from] serde_json::Error),

    /// HID enumeration failed.
    #[error("HID enumeration failed: {0}")]
    Hid(#[from] hidapi::HidError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win32_error_carries_call_and_code() {
        let e = Win32Error::new("SetupDiChangeState", 5);
        assert_eq!(e.call(), "SetupDiChangeState");
        assert_eq!(e.code(), 5);
        assert!(e.to_string().contains("SetupDiChangeState"));
        assert!(e.to_string().contains("os error 5"));
    }
}
