//! Hardware-id match filter.
//!
//! A [`HardwareIdFilter`] holds the caller-supplied substring used to pick the
//! target device out of the full enumeration (e.g. `"VID_045E&PID_028E"`).
//! When a cycle proves that no such device exists, the filter is *cleared*:
//! further cycles on a cleared filter are no-ops until the caller calls
//! [`reset`](HardwareIdFilter::reset). This is the retry-stop signal.

/// Substring filter over device hardware ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HardwareIdFilter {
    pattern: Option<String>,
}

impl HardwareIdFilter {
    /// Build a filter from a hardware-id fragment.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
        }
    }

    /// The active pattern, or `None` once cleared.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// `true` once a cycle has determined that no matching device exists.
    pub fn is_cleared(&self) -> bool {
        self.pattern.is_none()
    }

    /// Mark the filter as exhausted; subsequent cycles stop retrying.
    pub(crate) fn clear(&mut self) {
        self.pattern = None;
    }

    /// Re-arm a cleared (or active) filter with a new pattern.
    pub fn reset(&mut self, pattern: impl Into<String>) {
        self.pattern = Some(pattern.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_and_reset() {
        let mut f = HardwareIdFilter::new("VID_2717&PID_3144");
        assert_eq!(f.pattern(), Some("VID_2717&PID_3144"));
        assert!(!f.is_cleared());

        f.clear();
        assert!(f.is_cleared());
        assert_eq!(f.pattern(), None);

        f.reset("VID_045E");
        assert_eq!(f.pattern(), Some("VID_045E"));
    }

    #[test]
    fn default_is_cleared() {
        assert!(HardwareIdFilter::default().is_cleared());
    }
}
