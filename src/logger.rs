use crate::event::HotplugEvent;
use crate::eventbus::HotplugListener;

/// A simple listener that logs all hot-plug events to stdout.
pub struct Logger;

impl Logger {
    pub fn new() -> Self {
        Logger
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl HotplugListener for Logger {
    fn on_event(&mut self, event: &HotplugEvent) {
        match event {
            HotplugEvent::Attached { path } => println!("[Hotplug] attached {path}"),
            HotplugEvent::Removed { path } => println!("[Hotplug] removed {path}"),
        }
    }
}
