use std::fmt;

use crate::event::RecordedEvent;

/// Observers notified each time an aggregate records a new event.
///
/// Observers run synchronously, in subscription order, on the thread that
/// recorded the event. Replay never reaches the sink; only
/// [`EventSource::apply`] raises notifications. While the sink is suspended,
/// raised events are dropped, not queued.
///
/// [`EventSource::apply`]: crate::EventSource::apply
pub struct EventSink<E> {
    observers: Vec<Box<dyn FnMut(&RecordedEvent<E>) + Send + Sync>>,
    suspended: bool,
}

impl<E> EventSink<E> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            suspended: false,
        }
    }

    /// Registers an observer. Observers cannot be removed; create a new sink
    /// (a new aggregate instance) to start over.
    pub fn subscribe(&mut self, observer: impl FnMut(&RecordedEvent<E>) + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Stops notifications until [`resume`](Self::resume) is called.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Re-enables notifications. Events raised while suspended are gone.
    pub fn resume(&mut self) {
        self.suspended = false;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Invokes every observer with `recorded`, in subscription order.
    pub fn raise(&mut self, recorded: &RecordedEvent<E>) {
        if self.suspended {
            return;
        }
        for observer in &mut self.observers {
            observer(recorded);
        }
    }
}

impl<E> Default for EventSink<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventSink<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink")
            .field("observers", &self.observers.len())
            .field("suspended", &self.suspended)
            .finish()
    }
}
