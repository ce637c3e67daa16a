//! # Session Event Bus
//!
//! Listener republishing lifecycle events on a `tokio::sync::broadcast`
//! channel, for asynchronous consumers such as an admin feed.
//!
//! A slow subscriber lags and skips events; it never blocks the session.

use crate::error::ListenerError;
use crate::events::SessionEvent;
use crate::ports::SessionListener;
use crate::settings::{BootstrapServerSettings, DEFAULT_EVENT_CAPACITY};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, trace};

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("Event bus closed")]
    Closed,
}

/// Broadcast publisher of session events.
pub struct SessionEventBus {
    sender: broadcast::Sender<SessionEvent>,
    events_published: AtomicU64,
}

impl Default for SessionEventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl SessionEventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            events_published: AtomicU64::new(0),
        }
    }

    /// Bus sized by `event_capacity`.
    pub fn from_settings(settings: &BootstrapServerSettings) -> Self {
        Self::with_capacity(settings.event_capacity)
    }

    /// Events of every endpoint.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            endpoint: None,
        }
    }

    /// Events of a single endpoint.
    pub fn subscribe_endpoint(&self, endpoint: impl Into<String>) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            endpoint: Some(endpoint.into()),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl SessionListener for SessionEventBus {
    fn name(&self) -> &str {
        "event-bus"
    }

    fn on_event(&self, event: &SessionEvent) -> Result<(), ListenerError> {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        match self.sender.send(event.clone()) {
            Ok(receivers) => trace!(event = event.name(), receivers, "Session event published"),
            // no subscriber is not an error
            Err(_) => trace!(event = event.name(), "Session event dropped (no subscribers)"),
        }
        Ok(())
    }
}

/// Receiving side of the bus.
pub struct Subscription {
    receiver: broadcast::Receiver<SessionEvent>,
    endpoint: Option<String>,
}

impl Subscription {
    fn matches(&self, event: &SessionEvent) -> bool {
        match &self.endpoint {
            None => true,
            Some(endpoint) => event.endpoint() == Some(endpoint.as_str()),
        }
    }

    /// Next matching event; `None` once the bus is dropped.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some events dropped");
                    continue;
                }
            };
            if self.matches(&event) {
                return Some(event);
            }
        }
    }

    /// Next matching event without waiting.
    pub fn try_recv(&mut self) -> Result<Option<SessionEvent>, SubscriptionError> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };
            if self.matches(&event) {
                return Ok(Some(event));
            }
        }
    }

    /// Consume the subscription as a stream. Lagged gaps are skipped.
    pub fn into_stream(self) -> impl Stream<Item = SessionEvent> + Send + 'static {
        let endpoint = self.endpoint;
        BroadcastStream::new(self.receiver).filter_map(move |item| {
            let event = item.ok()?;
            match &endpoint {
                Some(endpoint) if event.endpoint() != Some(endpoint.as_str()) => None,
                _ => Some(event),
            }
        })
    }
}
