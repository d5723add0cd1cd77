//! Event Bridge
//!
//! Forwards low-level connector events to facade-level listeners. Only a
//! fixed whitelist of events crosses the bridge; everything else stays at
//! the connector layer.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Events emitted on a connector's broadcast channel
#[derive(Debug, Clone)]
pub enum ConnectorEvent {
    /// The relay sent a signing/session request to the remote wallet
    SessionRequestSent,
    /// A pairing URI is ready to be rendered (e.g. as a QR code)
    DisplayUri(String),
    /// The connection or session ended
    Disconnected,
    /// The provider's authorized accounts changed
    AccountsChanged(Vec<String>),
    /// The provider's active chain changed
    ChainChanged(u64),
}

/// Facade-level event names. Only these are re-emitted by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SessionRequestSent,
    DisplayUri,
    Disconnect,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::SessionRequestSent => write!(f, "session_request_sent"),
            EventKind::DisplayUri => write!(f, "display_uri"),
            EventKind::Disconnect => write!(f, "disconnect"),
        }
    }
}

impl ConnectorEvent {
    /// The facade-level name for this event, if it is bridged at all
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            ConnectorEvent::SessionRequestSent => Some(EventKind::SessionRequestSent),
            ConnectorEvent::DisplayUri(_) => Some(EventKind::DisplayUri),
            ConnectorEvent::Disconnected => Some(EventKind::Disconnect),
            ConnectorEvent::AccountsChanged(_) | ConnectorEvent::ChainChanged(_) => None,
        }
    }
}

/// A caller-supplied event listener
pub type EventListener = Arc<dyn Fn(&ConnectorEvent) + Send + Sync>;

/// Additive listener registry: multiple listeners per event name.
///
/// Listeners registered here are never automatically deregistered from the
/// underlying connector when the facade is dropped; cleanup is the
/// caller's obligation.
#[derive(Default)]
pub struct ListenerRegistry {
    inner: Mutex<HashMap<EventKind, Vec<EventListener>>>,
}

impl ListenerRegistry {
    pub fn add(&self, kind: EventKind, listener: EventListener) {
        let mut listeners = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        listeners.entry(kind).or_default().push(listener);
    }

    /// Dispatch a connector event to every listener registered for its kind.
    /// Non-whitelisted events are dropped here.
    ///
    /// Listeners run against a snapshot taken under the lock, never with
    /// the lock held: a listener may call [`ListenerRegistry::add`]
    /// without deadlocking the bridge. Listeners added during a dispatch
    /// are picked up from the next event onward.
    pub fn dispatch(&self, event: &ConnectorEvent) {
        let Some(kind) = event.kind() else {
            return;
        };
        let snapshot: Vec<EventListener> = {
            let listeners = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            listeners.get(&kind).cloned().unwrap_or_default()
        };
        if snapshot.is_empty() {
            return;
        }
        debug!(event = %kind, count = snapshot.len(), "dispatching wallet event");
        for listener in &snapshot {
            run_isolated(|| listener(event));
        }
    }
}

/// Run a caller-supplied callback, isolating panics from the event loop.
pub(crate) fn run_isolated<F: FnOnce()>(callback: F) {
    if catch_unwind(AssertUnwindSafe(callback)).is_err() {
        warn!("wallet event listener panicked; continuing");
    }
}

/// Spawn the bridge task: receives connector events and fans them out to
/// the registry until the connector's sender side is dropped.
pub(crate) fn spawn_bridge(
    mut events: broadcast::Receiver<ConnectorEvent>,
    listeners: std::sync::Arc<ListenerRegistry>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => listeners.dispatch(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event bridge lagged behind connector events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_whitelist() {
        assert_eq!(
            ConnectorEvent::DisplayUri("wc:abc".into()).kind(),
            Some(EventKind::DisplayUri)
        );
        assert_eq!(ConnectorEvent::Disconnected.kind(), Some(EventKind::Disconnect));
        assert!(ConnectorEvent::ChainChanged(1).kind().is_none());
        assert!(ConnectorEvent::AccountsChanged(vec![]).kind().is_none());
    }

    #[test]
    fn test_additive_listeners() {
        let registry = ListenerRegistry::default();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let hits = hits.clone();
            registry.add(
                EventKind::Disconnect,
                Arc::new(move |_| {
                    hits.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        registry.dispatch(&ConnectorEvent::Disconnected);
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        // non-whitelisted events never reach listeners
        registry.dispatch(&ConnectorEvent::ChainChanged(25));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_listener_panic_is_isolated() {
        let registry = ListenerRegistry::default();
        let hits = Arc::new(AtomicUsize::new(0));

        registry.add(EventKind::DisplayUri, Arc::new(|_| panic!("listener bug")));
        let hits_clone = hits.clone();
        registry.add(
            EventKind::DisplayUri,
            Arc::new(move |_| {
                hits_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        // the panicking listener must not prevent the second one from running
        registry.dispatch(&ConnectorEvent::DisplayUri("wc:abc".into()));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_may_register_listeners_during_dispatch() {
        let registry = Arc::new(ListenerRegistry::default());
        let hits = Arc::new(AtomicUsize::new(0));

        let inner_hits = hits.clone();
        let inner_registry = registry.clone();
        registry.add(
            EventKind::Disconnect,
            Arc::new(move |_| {
                let hits = inner_hits.clone();
                inner_registry.add(
                    EventKind::Disconnect,
                    Arc::new(move |_| {
                        hits.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }),
        );

        // must return rather than deadlock on the registry mutex
        registry.dispatch(&ConnectorEvent::Disconnected);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        // the listener added mid-dispatch is live from the next event
        registry.dispatch(&ConnectorEvent::Disconnected);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
