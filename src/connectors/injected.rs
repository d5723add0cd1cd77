//! Injected Connector
//!
//! Talks directly to a provider object already present in the host
//! environment. The provider handle is shared, never owned: the host may
//! expose the same object to any number of facades.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

use super::events::ConnectorEvent;
use super::provider::{EthereumProvider, ProviderEvent};
use super::{ConnectOptions, ConnectedAccount, ConnectorError, EVENT_CHANNEL_CAPACITY};

/// Options for the injected connection path
#[derive(Debug, Clone)]
pub struct InjectedOptions {
    /// Persist disconnect state so a disconnected wallet is not treated as
    /// connected again until the next explicit connect
    pub shim_disconnect: bool,
}

impl Default for InjectedOptions {
    fn default() -> Self {
        Self { shim_disconnect: true }
    }
}

/// Connector bound to a host-exposed provider
pub struct InjectedConnector {
    provider: Arc<dyn EthereumProvider>,
    options: InjectedOptions,
    events: broadcast::Sender<ConnectorEvent>,
    forwarder: Mutex<Option<JoinHandle<()>>>,
    disconnected: AtomicBool,
}

impl InjectedConnector {
    /// Build from a capability-probe result.
    ///
    /// Fails with [`ConnectorError::ProviderUnavailable`] when the probe
    /// found no matching provider.
    pub fn from_probe(
        provider: Option<Arc<dyn EthereumProvider>>,
        options: InjectedOptions,
    ) -> Result<Self, ConnectorError> {
        let provider = provider.ok_or(ConnectorError::ProviderUnavailable)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            provider,
            options,
            events,
            forwarder: Mutex::new(None),
            disconnected: AtomicBool::new(false),
        })
    }

    /// Request accounts from the provider and optionally switch chains.
    pub async fn connect(&self, options: &ConnectOptions) -> Result<ConnectedAccount, ConnectorError> {
        self.ensure_forwarder();

        let accounts = self.provider.request_accounts().await?;
        let address = accounts
            .into_iter()
            .next()
            .ok_or_else(|| ConnectorError::Protocol("provider returned no accounts".to_string()))?;

        if let Some(chain_id) = options.chain_id {
            self.provider.switch_chain(chain_id).await?;
        }

        self.disconnected.store(false, Ordering::SeqCst);
        debug!(%address, "injected provider connected");

        Ok(ConnectedAccount {
            address,
            chain_id: options.chain_id,
        })
    }

    /// Mark the wallet as disconnected. The provider object itself stays
    /// usable; with `shim_disconnect` the state survives until the next
    /// explicit connect.
    pub async fn disconnect(&self) -> Result<(), ConnectorError> {
        if self.options.shim_disconnect {
            self.disconnected.store(true, Ordering::SeqCst);
        }
        let _ = self.events.send(ConnectorEvent::Disconnected);
        Ok(())
    }

    /// Whether a shimmed disconnect is in effect
    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectorEvent> {
        self.events.subscribe()
    }

    /// Start forwarding provider events onto the connector channel.
    /// Idempotent; the task lives until the provider's sender is dropped.
    fn ensure_forwarder(&self) {
        let mut guard = self.forwarder.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_some() {
            return;
        }
        let mut provider_events = self.provider.subscribe();
        let events = self.events.clone();
        *guard = Some(tokio::spawn(async move {
            loop {
                match provider_events.recv().await {
                    Ok(ProviderEvent::AccountsChanged(accounts)) => {
                        let _ = events.send(ConnectorEvent::AccountsChanged(accounts));
                    }
                    Ok(ProviderEvent::ChainChanged(chain_id)) => {
                        let _ = events.send(ConnectorEvent::ChainChanged(chain_id));
                    }
                    Ok(ProviderEvent::Disconnected) => {
                        let _ = events.send(ConnectorEvent::Disconnected);
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::mock::MockProvider;

    #[test]
    fn test_from_probe_without_provider() {
        let result = InjectedConnector::from_probe(None, InjectedOptions::default());
        assert!(matches!(result, Err(ConnectorError::ProviderUnavailable)));
    }

    #[tokio::test]
    async fn test_connect_requests_accounts() {
        let provider = Arc::new(
            MockProvider::new(&["isDefiWallet"])
                .with_accounts(&["0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"]),
        );
        let connector =
            InjectedConnector::from_probe(Some(provider), InjectedOptions::default()).unwrap();

        let account = connector
            .connect(&ConnectOptions { chain_id: Some(25) })
            .await
            .unwrap();
        assert_eq!(account.address, "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
        assert_eq!(account.chain_id, Some(25));
    }

    #[tokio::test]
    async fn test_connect_with_no_accounts_is_protocol_error() {
        let provider = Arc::new(MockProvider::new(&["isDefiWallet"]));
        let connector =
            InjectedConnector::from_probe(Some(provider), InjectedOptions::default()).unwrap();

        let result = connector.connect(&ConnectOptions::default()).await;
        assert!(matches!(result, Err(ConnectorError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_shim_disconnect() {
        let provider = Arc::new(MockProvider::new(&["isDefiWallet"]).with_accounts(&["0xabc"]));
        let connector =
            InjectedConnector::from_probe(Some(provider), InjectedOptions::default()).unwrap();

        connector.connect(&ConnectOptions::default()).await.unwrap();
        assert!(!connector.is_disconnected());

        connector.disconnect().await.unwrap();
        assert!(connector.is_disconnected());

        // disconnect leaves the connector bound and connectable again
        connector.connect(&ConnectOptions::default()).await.unwrap();
        assert!(!connector.is_disconnected());
    }

    #[tokio::test]
    async fn test_provider_events_are_forwarded() {
        let provider = Arc::new(MockProvider::new(&["isDefiWallet"]).with_accounts(&["0xabc"]));
        let connector = InjectedConnector::from_probe(
            Some(provider.clone() as Arc<dyn EthereumProvider>),
            InjectedOptions::default(),
        )
        .unwrap();

        let mut events = connector.subscribe();
        connector.connect(&ConnectOptions::default()).await.unwrap();

        provider.emit(ProviderEvent::ChainChanged(338));
        match events.recv().await.unwrap() {
            ConnectorEvent::ChainChanged(chain_id) => assert_eq!(chain_id, 338),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
