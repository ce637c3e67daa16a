//! # Listener Dispatcher
//!
//! Fans session events out to a mutable set of listeners. The set is a
//! copy-on-write snapshot: `add`/`remove` may run while events are being
//! dispatched, and a dispatch always walks one consistent snapshot.
//!
//! A listener returning an error or panicking is logged and skipped.

use crate::events::SessionEvent;
use crate::ports::SessionListener;
use arc_swap::ArcSwap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Copy-on-write listener set.
pub struct ListenerDispatcher {
    listeners: ArcSwap<Vec<Arc<dyn SessionListener>>>,
}

impl Default for ListenerDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub fn add(&self, listener: Arc<dyn SessionListener>) {
        self.listeners.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(listener.clone());
            next
        });
    }

    /// Remove `listener` (by identity). `false` if it was not registered.
    pub fn remove(&self, listener: &Arc<dyn SessionListener>) -> bool {
        let previous = self.listeners.rcu(|current| {
            current
                .iter()
                .filter(|l| !Arc::ptr_eq(*l, listener))
                .cloned()
                .collect::<Vec<_>>()
        });
        previous.iter().any(|l| Arc::ptr_eq(l, listener))
    }

    pub fn len(&self) -> usize {
        self.listeners.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every listener of the current snapshot, in
    /// registration order.
    pub fn dispatch(&self, event: &SessionEvent) {
        let listeners = self.listeners.load();
        for listener in listeners.iter() {
            match catch_unwind(AssertUnwindSafe(|| listener.on_event(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(listener = listener.name(), event = event.name(), error = %e, "Session listener failed");
                }
                Err(_) => {
                    warn!(listener = listener.name(), event = event.name(), "Session listener panicked");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListenerError;
    use lwm2m_types::{BootstrapRequest, Identity};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<&'static str>>,
    }

    impl SessionListener for Recorder {
        fn on_event(&self, event: &SessionEvent) -> Result<(), ListenerError> {
            self.seen.lock().push(event.name());
            Ok(())
        }
    }

    struct Failing;

    impl SessionListener for Failing {
        fn on_event(&self, _event: &SessionEvent) -> Result<(), ListenerError> {
            Err(ListenerError::new("failing", "boom"))
        }
    }

    struct Panicking;

    impl SessionListener for Panicking {
        fn on_event(&self, _event: &SessionEvent) -> Result<(), ListenerError> {
            panic!("listener bug")
        }
    }

    fn event() -> SessionEvent {
        SessionEvent::SessionInitiated {
            request: BootstrapRequest::new("ep"),
            identity: Identity::Unsecure,
        }
    }

    #[test]
    fn test_failing_listeners_do_not_stop_delivery() {
        let dispatcher = ListenerDispatcher::new();
        let recorder = Arc::new(Recorder::default());
        dispatcher.add(Arc::new(Failing));
        dispatcher.add(Arc::new(Panicking));
        dispatcher.add(recorder.clone());

        dispatcher.dispatch(&event());
        dispatcher.dispatch(&event());
        assert_eq!(recorder.seen.lock().len(), 2);
    }

    #[test]
    fn test_remove_listener() {
        let dispatcher = ListenerDispatcher::new();
        let recorder = Arc::new(Recorder::default());
        let as_listener: Arc<dyn SessionListener> = recorder.clone();
        dispatcher.add(as_listener.clone());
        assert_eq!(dispatcher.len(), 1);

        assert!(dispatcher.remove(&as_listener));
        assert!(!dispatcher.remove(&as_listener));
        dispatcher.dispatch(&event());
        assert!(recorder.seen.lock().is_empty());
        assert!(dispatcher.is_empty());
    }
}
