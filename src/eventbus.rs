use crate::event::HotplugEvent;
use std::collections::HashMap;

/// Trait for reacting to hot-plug events from the monitor.
pub trait HotplugListener: Send {
    fn on_event(&mut self, event: &HotplugEvent);
}

/// Determines which kinds of events a listener wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    All,
    AttachedOnly,
    RemovedOnly,
    Custom(fn(&HotplugEvent) -> bool),
}

/// Metadata-wrapped listener with filters and control flags.
struct ListenerEntry {
    listener: Box<dyn HotplugListener>,
    enabled: bool,
    filter: EventFilter,
    path_prefix: Option<String>, // Optional device-path prefix
}

pub struct HotplugBus {
    next_id: u64,
    listeners: HashMap<u64, ListenerEntry>,
}

impl Default for HotplugBus {
    fn default() -> Self {
        Self::new()
    }
}

impl HotplugBus {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: HashMap::new(),
        }
    }

    /// Registers a listener with optional filtering and path prefix.
    pub fn add_listener(
        &mut self,
        listener: impl HotplugListener + 'static,
        filter: EventFilter,
        path_prefix: Option<String>,
    ) -> u64 {
        let id = self.next_id;
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
                path_prefix,
            },
        );
        self.next_id += 1;
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters a listener entirely.
    pub fn remove_listener(&mut self, id: u64) {
        self.listeners.remove(&id);
    }

    /// Emits one event to all active and matching listeners.
    pub fn emit(&mut self, event: &HotplugEvent) {
        for entry in self.listeners.values_mut() {
            if !entry.enabled {
                continue;
            }

            // If prefixed, ensure this listener wants this event's device.
            if let Some(ref wanted) = entry.path_prefix {
                if !event.path().starts_with(wanted.as_str()) {
                    continue;
                }
            }

            // Check event type filter.
            let passes_filter = match entry.filter {
                EventFilter::All => true,
                EventFilter::AttachedOnly => event.is_attached(),
                EventFilter::RemovedOnly => !event.is_attached(),
                EventFilter::Custom(f) => f(event),
            };

            if passes_filter {
                entry.listener.on_event(event);
            }
        }
    }

    /// Emits a batch of events to matching listeners.
    pub fn emit_all(&mut self, events: &[HotplugEvent]) {
        for event in events {
            self.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{channel, Sender};

    struct Recorder(Sender<HotplugEvent>);

    impl HotplugListener for Recorder {
        fn on_event(&mut self, event: &HotplugEvent) {
            self.0.send(event.clone()).unwrap();
        }
    }

    fn attached(path: &str) -> HotplugEvent {
        HotplugEvent::Attached { path: path.into() }
    }

    fn removed(path: &str) -> HotplugEvent {
        HotplugEvent::Removed { path: path.into() }
    }

    #[test]
    fn filters_by_event_kind() {
        let (tx, rx) = channel();
        let mut bus = HotplugBus::new();
        bus.add_listener(Recorder(tx), EventFilter::AttachedOnly, None);

        bus.emit(&attached("\\\\?\\HID#VID_1234"));
        bus.emit(&removed("\\\\?\\HID#VID_1234"));

        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got, vec![attached("\\\\?\\HID#VID_1234")]);
    }

    #[test]
    fn disabled_listeners_stay_registered_but_silent() {
        let (tx, rx) = channel();
        let mut bus = HotplugBus::new();
        let id = bus.add_listener(Recorder(tx), EventFilter::All, None);

        bus.disable(id);
        bus.emit(&attached("\\\\?\\HID#a"));
        bus.enable(id);
        bus.emit(&attached("\\\\?\\HID#b"));

        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got, vec![attached("\\\\?\\HID#b")]);
    }

    #[test]
    fn path_prefix_scopes_delivery() {
        let (tx, rx) = channel();
        let mut bus = HotplugBus::new();
        bus.add_listener(
            Recorder(tx),
            EventFilter::All,
            Some("\\\\?\\HID#VID_2717".into()),
        );

        bus.emit_all(&[
            attached("\\\\?\\HID#VID_2717&PID_3144#1"),
            attached("\\\\?\\HID#VID_045E&PID_028E#1"),
        ]);

        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got.len(), 1);
        assert!(got[0].path().contains("VID_2717"));
    }
}
