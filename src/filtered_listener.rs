use crate::event::HotplugEvent;
use crate::eventbus::HotplugListener;

/// Wraps a listener and filters events based on a user-supplied predicate.
pub struct FilteredListener {
    predicate: Box<dyn Fn(&HotplugEvent) -> bool + Send + Sync>,
    inner: Box<dyn HotplugListener>,
}

impl FilteredListener {
    pub fn new(
        predicate: impl Fn(&HotplugEvent) -> bool + Send + Sync + 'static,
        inner: Box<dyn HotplugListener>,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner,
        }
    }
}

impl HotplugListener for FilteredListener {
    fn on_event(&mut self, event: &HotplugEvent) {
        if (self.predicate)(event) {
            self.inner.on_event(event);
        }
    }
}
