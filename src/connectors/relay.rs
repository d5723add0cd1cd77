//! Relay Connector
//!
//! Establishes a session with a remote signer through an out-of-band
//! pairing exchange (QR code or deep link). The pairing protocol itself is
//! an external collaborator behind [`RelayService`]; this module owns
//! configuration resolution, the approval wait, and session state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, oneshot, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::events::{run_isolated, ConnectorEvent};
use super::{ConnectOptions, ConnectedAccount, ConnectorError, EVENT_CHANNEL_CAPACITY};

/// Shared fallback project id used when the caller configures none.
///
/// Production integrations should register their own id with the relay
/// operator; the shared id is rate-limited.
pub const SHARED_PROJECT_ID: &str = "0e1b3c90f8a24d2bb5dd1c6a27f3e8c4";

/// Default time to wait for the remote wallet to approve a session
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(300);

/// Lifecycle events emitted by the relay collaborator
#[derive(Debug, Clone)]
pub enum RelayEvent {
    /// A session/signing request was sent to the remote wallet
    SessionRequestSent,
    /// The session ended on the remote side
    SessionDisconnected,
}

/// Configuration for the relayed connection path
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Caller's relay project identifier
    pub project_id: Option<String>,
    /// Fallback id when `project_id` is unset. Defaults to
    /// [`SHARED_PROJECT_ID`]; set to `None` to require explicit
    /// configuration.
    pub shared_project_id: Option<String>,
    /// How long to wait for remote session approval
    pub session_timeout: Duration,
    /// Whether the caller intends to render the pairing URI as a QR code
    pub qr_code: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            shared_project_id: Some(SHARED_PROJECT_ID.to_string()),
            session_timeout: DEFAULT_SESSION_TIMEOUT,
            qr_code: true,
        }
    }
}

impl RelayConfig {
    /// Resolve the project id: explicit id first, then the shared fallback.
    /// Detected synchronously, before any relay traffic.
    pub fn resolved_project_id(&self) -> Result<&str, ConnectorError> {
        self.project_id
            .as_deref()
            .or(self.shared_project_id.as_deref())
            .ok_or_else(|| {
                ConnectorError::MissingConfiguration("relay project id".to_string())
            })
    }
}

/// An approved session with a remote signer.
///
/// Holding one of these is proof of approval: it is only ever produced by
/// the relay after the remote party accepts, and it is the token required
/// to reach the session's signer.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    /// Relay-assigned pairing topic
    pub topic: String,
    /// Account address approved by the remote wallet
    pub address: String,
    /// Chain the session was approved for
    pub chain_id: u64,
    /// When the relay will expire the session
    pub expiry: DateTime<Utc>,
}

/// A pairing opened with the relay, waiting for remote approval
pub struct PendingPairing {
    /// URI for the caller to render (QR code) or deep-link into a wallet app
    pub uri: String,
    /// Resolves when the remote party approves or rejects
    pub approval: oneshot::Receiver<Result<SessionHandle, ConnectorError>>,
}

/// The external relay/pairing collaborator.
///
/// Session negotiation, QR pairing, and the relay transport live behind
/// this trait; the SDK consumes them as an opaque service.
#[async_trait]
pub trait RelayService: Send + Sync {
    /// Open a pairing and return its URI plus the approval future
    async fn open_pairing(
        &self,
        project_id: &str,
        chain_id: Option<u64>,
    ) -> Result<PendingPairing, ConnectorError>;

    /// Subscribe to relay lifecycle events
    fn subscribe(&self) -> broadcast::Receiver<RelayEvent>;
}

/// Connector bound to the relay path
pub struct RelayConnector {
    config: RelayConfig,
    service: Arc<dyn RelayService>,
    session: Arc<RwLock<Option<SessionHandle>>>,
    events: broadcast::Sender<ConnectorEvent>,
    forwarder: Mutex<Option<JoinHandle<()>>>,
}

impl RelayConnector {
    pub fn new(service: Arc<dyn RelayService>, config: RelayConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            service,
            session: Arc::new(RwLock::new(None)),
            events,
            forwarder: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Negotiate a session: open a pairing, surface its URI as a
    /// `DisplayUri` event, then wait for remote approval.
    ///
    /// Rejection, timeout, and relay failures propagate unchanged; failed
    /// negotiation is never retried here.
    pub async fn connect(&self, options: &ConnectOptions) -> Result<ConnectedAccount, ConnectorError> {
        self.negotiate(options, None).await
    }

    /// Like [`connect`](Self::connect), but hands the pairing URI to
    /// `on_uri` synchronously when the pairing opens, before the approval
    /// wait begins. A caller rendering a QR code is therefore guaranteed
    /// to see the URI before the connect future can resolve, even when
    /// the remote side approves instantly.
    pub async fn connect_with_uri(
        &self,
        options: &ConnectOptions,
        on_uri: Box<dyn FnOnce(String) + Send>,
    ) -> Result<ConnectedAccount, ConnectorError> {
        self.negotiate(options, Some(on_uri)).await
    }

    async fn negotiate(
        &self,
        options: &ConnectOptions,
        on_uri: Option<Box<dyn FnOnce(String) + Send>>,
    ) -> Result<ConnectedAccount, ConnectorError> {
        let project_id = self.config.resolved_project_id()?.to_string();
        self.ensure_forwarder();

        let pairing = self.service.open_pairing(&project_id, options.chain_id).await?;
        debug!(uri = %pairing.uri, "pairing opened");
        let _ = self.events.send(ConnectorEvent::DisplayUri(pairing.uri.clone()));
        if let Some(callback) = on_uri {
            let uri = pairing.uri;
            run_isolated(move || callback(uri));
        }

        let approval = tokio::time::timeout(self.config.session_timeout, pairing.approval);
        let session = match approval.await {
            Err(_) => return Err(ConnectorError::SessionTimeout(self.config.session_timeout)),
            Ok(Err(_)) => {
                return Err(ConnectorError::Protocol(
                    "relay dropped the pairing before settling it".to_string(),
                ))
            }
            Ok(Ok(outcome)) => outcome?,
        };

        info!(topic = %session.topic, address = %session.address, "relay session approved");
        let account = ConnectedAccount {
            address: session.address.clone(),
            chain_id: Some(session.chain_id),
        };
        *self.session.write().await = Some(session);
        Ok(account)
    }

    /// Drop the active session, if any
    pub async fn disconnect(&self) -> Result<(), ConnectorError> {
        if self.session.write().await.take().is_some() {
            let _ = self.events.send(ConnectorEvent::Disconnected);
        }
        Ok(())
    }

    /// The signer proxy for the active session. Only valid after approval.
    pub async fn session(&self) -> Option<SessionHandle> {
        self.session.read().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectorEvent> {
        self.events.subscribe()
    }

    /// Start forwarding relay lifecycle events onto the connector channel.
    fn ensure_forwarder(&self) {
        let mut guard = self.forwarder.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_some() {
            return;
        }
        let mut relay_events = self.service.subscribe();
        let events = self.events.clone();
        let session = self.session.clone();
        *guard = Some(tokio::spawn(async move {
            loop {
                match relay_events.recv().await {
                    Ok(RelayEvent::SessionRequestSent) => {
                        let _ = events.send(ConnectorEvent::SessionRequestSent);
                    }
                    Ok(RelayEvent::SessionDisconnected) => {
                        session.write().await.take();
                        let _ = events.send(ConnectorEvent::Disconnected);
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }));
    }
}
