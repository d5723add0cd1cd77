//! Wallet Facade
//!
//! One stateful object per wallet brand. The facade probes the host once
//! at construction, lazily binds exactly one connector variant on first
//! use, and exposes a uniform connect/disconnect/event surface regardless
//! of which variant is active.

pub mod brands;

pub use brands::{builtin_wallets, InstallUrls, WalletMeta};

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::connectors::events::{run_isolated, spawn_bridge};
use crate::connectors::{
    ConnectOptions, ConnectedAccount, Connector, ConnectorError, ConnectorEvent, ConnectorKind,
    EventKind, HostEnvironment, InjectedConnector, InjectedOptions, ListenerRegistry, RelayConfig,
    RelayConnector, RelayService,
};

/// Arguments for [`WalletFacade::connect_with_qr_code`]
pub struct QrCodeConnectOptions {
    /// Chain to request in the session proposal
    pub chain_id: Option<u64>,
    /// Invoked exactly once with the first pairing URI, for QR rendering
    pub on_qr_code_uri: Box<dyn FnOnce(String) + Send + 'static>,
    /// Invoked with the account address once the connect flow resolves
    pub on_connected: Box<dyn FnOnce(String) + Send + 'static>,
}

/// Per-brand wallet entry point.
///
/// The capability probe runs once, in `new`; whichever variant that
/// snapshot selects is bound for the facade's whole lifetime, even if the
/// host environment changes afterwards (a provider injected late is not
/// picked up). Disconnecting leaves the facade bound and connectable, it
/// never returns to the unselected state.
pub struct WalletFacade {
    meta: WalletMeta,
    injected: Option<Arc<dyn crate::connectors::EthereumProvider>>,
    injected_options: InjectedOptions,
    relay_service: Arc<dyn RelayService>,
    relay_config: RelayConfig,
    connector: OnceCell<Arc<Connector>>,
    listeners: Arc<ListenerRegistry>,
}

impl WalletFacade {
    /// Probe the host for this brand's provider and build the facade.
    /// The probe result is memoized here and never re-evaluated.
    pub fn new(
        meta: WalletMeta,
        host: &HostEnvironment,
        relay_service: Arc<dyn RelayService>,
        relay_config: RelayConfig,
    ) -> Self {
        let injected = host.probe(&meta.vendor_flag);
        debug!(wallet = %meta.id, injected = injected.is_some(), "wallet facade created");
        Self {
            meta,
            injected,
            injected_options: InjectedOptions::default(),
            relay_service,
            relay_config,
            connector: OnceCell::new(),
            listeners: Arc::new(ListenerRegistry::default()),
        }
    }

    pub fn meta(&self) -> &WalletMeta {
        &self.meta
    }

    /// Whether the construction-time probe found this brand's provider
    pub fn is_injected(&self) -> bool {
        self.injected.is_some()
    }

    /// Resolve the bound connector, building it on first call.
    ///
    /// Selection happens exactly once: probe hit binds the injected
    /// variant, otherwise the relay variant. Concurrent first callers
    /// share a single in-flight construction and all observe the same
    /// instance; later calls return it without re-evaluating anything.
    pub async fn connector(&self) -> Result<&Arc<Connector>, ConnectorError> {
        self.connector
            .get_or_try_init(|| async {
                let connector = match self.injected.clone() {
                    Some(provider) => Connector::Injected(InjectedConnector::from_probe(
                        Some(provider),
                        self.injected_options.clone(),
                    )?),
                    None => Connector::Relay(RelayConnector::new(
                        self.relay_service.clone(),
                        self.relay_config.clone(),
                    )),
                };
                info!(wallet = %self.meta.id, variant = %connector.kind(), "connector bound");

                // the bridge task is detached; it ends when the connector's
                // event sender is dropped
                let connector = Arc::new(connector);
                let _ = spawn_bridge(connector.subscribe(), self.listeners.clone());
                Ok(connector)
            })
            .await
    }

    /// Which variant this facade is bound to, if already resolved
    pub fn bound_kind(&self) -> Option<ConnectorKind> {
        self.connector.get().map(|connector| connector.kind())
    }

    /// Connect through the bound connector
    pub async fn connect(&self, options: ConnectOptions) -> Result<ConnectedAccount, ConnectorError> {
        let connector = self.connector().await?;
        let account = connector.connect(&options).await?;
        info!(wallet = %self.meta.id, address = %account.address, "wallet connected");
        Ok(account)
    }

    /// Disconnect the bound connector. The facade stays bound to the same
    /// variant and can connect again.
    pub async fn disconnect(&self) -> Result<(), ConnectorError> {
        let connector = self.connector().await?;
        connector.disconnect().await
    }

    /// Register a listener for a bridged event. Additive: any number of
    /// listeners per event name. Listeners outlive the facade on the
    /// connector side; deregistering there is the caller's cleanup
    /// obligation.
    pub fn on(&self, kind: EventKind, listener: impl Fn(&ConnectorEvent) + Send + Sync + 'static) {
        self.listeners.add(kind, Arc::new(listener));
    }

    /// Connect via QR code pairing.
    ///
    /// Only meaningful when the relay variant is (or will be) selected; on
    /// an injected binding this fails with `UnsupportedOperation` and
    /// invokes neither callback. `on_qr_code_uri` fires exactly once, with
    /// the pairing URI, synchronously on the connect path as the pairing
    /// opens — it therefore always precedes `on_connected`, which fires
    /// with the account address once the connect flow resolves. Rejection
    /// or timeout propagates to the caller and `on_connected` is never
    /// invoked.
    pub async fn connect_with_qr_code(
        &self,
        options: QrCodeConnectOptions,
    ) -> Result<ConnectedAccount, ConnectorError> {
        let connector = self.connector().await?;
        let relay = connector
            .as_relay()
            .ok_or(ConnectorError::UnsupportedOperation {
                variant: connector.kind(),
                operation: "connect_with_qr_code",
            })?;

        let account = relay
            .connect_with_uri(
                &ConnectOptions { chain_id: options.chain_id },
                options.on_qr_code_uri,
            )
            .await?;

        let address = account.address.clone();
        let on_connected = options.on_connected;
        run_isolated(move || on_connected(address));
        Ok(account)
    }
}
