//! Test doubles for the external collaborators: a scriptable injected
//! provider and a scriptable relay service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, oneshot};

use super::provider::{EthereumProvider, ProviderEvent};
use super::relay::{PendingPairing, RelayEvent, RelayService, SessionHandle};
use super::ConnectorError;

/// Injected provider with scripted vendor flags and accounts
pub(crate) struct MockProvider {
    flags: Vec<String>,
    accounts: Vec<String>,
    events: broadcast::Sender<ProviderEvent>,
    account_requests: AtomicUsize,
}

impl MockProvider {
    pub(crate) fn new(flags: &[&str]) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            flags: flags.iter().map(|f| f.to_string()).collect(),
            accounts: Vec::new(),
            events,
            account_requests: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_accounts(mut self, accounts: &[&str]) -> Self {
        self.accounts = accounts.iter().map(|a| a.to_string()).collect();
        self
    }

    pub(crate) fn emit(&self, event: ProviderEvent) {
        let _ = self.events.send(event);
    }

    pub(crate) fn account_requests(&self) -> usize {
        self.account_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EthereumProvider for MockProvider {
    fn has_vendor_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ConnectorError> {
        self.account_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.clone())
    }

    async fn switch_chain(&self, _chain_id: u64) -> Result<(), ConnectorError> {
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

/// How a [`MockRelay`] settles each pairing
#[derive(Debug, Clone)]
pub(crate) enum MockRelayOutcome {
    /// Remote wallet approves with this account
    Approve { address: String, chain_id: u64 },
    /// Remote wallet declines
    Reject,
    /// Remote side never answers (exercises the timeout path)
    Stall,
}

/// Relay service that settles pairings according to a scripted outcome.
///
/// By default approval and rejection are delivered after a short delay,
/// mimicking a remote party that takes time to answer (tests run under
/// `start_paused` time, so the delay costs nothing). [`MockRelay::instant`]
/// settles inside `open_pairing` itself, before the caller can await
/// anything.
pub(crate) struct MockRelay {
    outcome: MockRelayOutcome,
    instant: bool,
    events: broadcast::Sender<RelayEvent>,
    opened: AtomicUsize,
    stalled: std::sync::Mutex<Vec<oneshot::Sender<Result<SessionHandle, ConnectorError>>>>,
}

impl MockRelay {
    pub(crate) fn new(outcome: MockRelayOutcome) -> Self {
        Self::build(outcome, false)
    }

    /// Relay whose remote party answers before `open_pairing` returns
    pub(crate) fn instant(outcome: MockRelayOutcome) -> Self {
        Self::build(outcome, true)
    }

    fn build(outcome: MockRelayOutcome, instant: bool) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            outcome,
            instant,
            events,
            opened: AtomicUsize::new(0),
            stalled: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn pairings_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    fn pairing_uri() -> String {
        let topic = hex::encode(rand::random::<[u8; 32]>());
        let sym_key = hex::encode(rand::random::<[u8; 32]>());
        format!("wc:{topic}@2?relay-protocol=irn&symKey={sym_key}")
    }
}

#[async_trait]
impl RelayService for MockRelay {
    async fn open_pairing(
        &self,
        _project_id: &str,
        chain_id: Option<u64>,
    ) -> Result<PendingPairing, ConnectorError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let uri = Self::pairing_uri();
        let topic = uri[3..67].to_string();
        let (tx, rx) = oneshot::channel();

        match self.outcome.clone() {
            MockRelayOutcome::Approve { address, chain_id: approved_chain } => {
                let events = self.events.clone();
                let settle = move || {
                    let _ = events.send(RelayEvent::SessionRequestSent);
                    let _ = tx.send(Ok(SessionHandle {
                        topic,
                        address,
                        chain_id: chain_id.unwrap_or(approved_chain),
                        expiry: Utc::now() + chrono::Duration::days(7),
                    }));
                };
                if self.instant {
                    settle();
                } else {
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        settle();
                    });
                }
            }
            MockRelayOutcome::Reject => {
                let settle = move || {
                    let _ = tx.send(Err(ConnectorError::SessionRejected(
                        "user declined the session".to_string(),
                    )));
                };
                if self.instant {
                    settle();
                } else {
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        settle();
                    });
                }
            }
            MockRelayOutcome::Stall => {
                // keep the sender alive so the receiver waits forever
                self.stalled.lock().unwrap_or_else(|e| e.into_inner()).push(tx);
            }
        }

        Ok(PendingPairing { uri, approval: rx })
    }

    fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.events.subscribe()
    }
}
