//! Target device profiles.
//!
//! A [`TargetProfile`] names a gamepad worth cycling and the hardware-id
//! fragment that identifies it. Profiles are plain serde data and load from
//! TOML or JSON, so hosts can ship a profile file next to their binary:
//!
//! ```toml
//! [[profiles]]
//! name = "Mi Gamepad"
//! hardware_id = "VID_2717&PID_3144"
//!
//! [[profiles]]
//! name = "Xbox 360 Controller"
//! description = "wired"
//! hardware_id = "VID_045E&PID_028E"
//! ```

use crate::error::Error;
use crate::filter::HardwareIdFilter;
use serde::{Deserialize, Serialize};

/// One named target device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetProfile {
    pub name: String,
    pub description: Option<String>,
    /// Hardware-id fragment matched as a substring (e.g. `"VID_2717&PID_3144"`).
    pub hardware_id: String,
}

impl TargetProfile {
    /// Build a fresh (armed) filter for this profile.
    pub fn filter(&self) -> HardwareIdFilter {
        HardwareIdFilter::new(self.hardware_id.clone())
    }
}

/// Serializable collection of target profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSet {
    #[serde(default)]
    pub profiles: Vec<TargetProfile>,
}

impl ProfileSet {
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }

    /// Look up a profile by name.
    pub fn find(&self, name: &str) -> Option<&TargetProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_toml() {
        let set = ProfileSet::from_toml_str(
            r#"
            [[profiles]]
            name = "Mi Gamepad"
            hardware_id = "VID_2717&PID_3144"

            [[profiles]]
            name = "Xbox 360 Controller"
            description = "wired"
            hardware_id = "VID_045E&PID_028E"
            "#,
        )
        .unwrap();

        assert_eq!(set.profiles.len(), 2);
        let xbox = set.find("Xbox 360 Controller").unwrap();
        assert_eq!(xbox.hardware_id, "VID_045E&PID_028E");
        assert_eq!(
            xbox.filter().pattern(),
            Some("VID_045E&PID_028E")
        );
    }

    #[test]
    fn loads_from_json() {
        let set = ProfileSet::from_json_str(
            r#"{"profiles":[{"name":"Mi Gamepad","description":null,"hardware_id":"VID_2717"}]}"#,
        )
        .unwrap();
        assert_eq!(set.profiles[0].name, "Mi Gamepad");
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(ProfileSet::from_toml_str("[[profiles]]\nname = 3").is_err());
    }
}
