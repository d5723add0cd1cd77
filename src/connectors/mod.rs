//! Wallet Connectors
//!
//! This module provides the two interchangeable connection strategies the
//! wallet facade selects between:
//! - the injected connector, which talks directly to a provider object the
//!   host environment already exposes, and
//! - the relay connector, which negotiates a session with a remote signer
//!   through a pairing URI (QR code / deep link).
//!
//! Both variants sit behind the [`Connector`] tagged union with a uniform
//! connect/disconnect/subscribe surface.

pub mod error;
pub mod events;
pub mod injected;
pub mod probe;
pub mod provider;
pub mod relay;

#[cfg(test)]
pub(crate) mod mock;

// Re-export commonly used items
pub use error::ConnectorError;
pub use events::{ConnectorEvent, EventKind, ListenerRegistry};
pub use injected::{InjectedConnector, InjectedOptions};
pub use probe::HostEnvironment;
pub use provider::{EthereumProvider, ProviderEvent};
pub use relay::{RelayConfig, RelayConnector, RelayService, SessionHandle};

use tokio::sync::broadcast;

/// Capacity of each connector's event broadcast channel
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Which connector variant a facade is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    /// Direct calls to a host-exposed provider
    Injected,
    /// Session relayed to a remote signer
    Relay,
}

impl std::fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectorKind::Injected => write!(f, "injected"),
            ConnectorKind::Relay => write!(f, "relay"),
        }
    }
}

/// Options for a connect attempt
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Chain to connect on (injected: switch after account request;
    /// relay: requested in the session proposal)
    pub chain_id: Option<u64>,
}

/// Outcome of a successful connect
#[derive(Debug, Clone)]
pub struct ConnectedAccount {
    /// Account address reported by the wallet
    pub address: String,
    /// Chain the connection settled on, when known
    pub chain_id: Option<u64>,
}

/// The two connection strategies, selected once per facade lifetime
pub enum Connector {
    Injected(InjectedConnector),
    Relay(RelayConnector),
}

impl Connector {
    pub fn kind(&self) -> ConnectorKind {
        match self {
            Connector::Injected(_) => ConnectorKind::Injected,
            Connector::Relay(_) => ConnectorKind::Relay,
        }
    }

    pub async fn connect(&self, options: &ConnectOptions) -> Result<ConnectedAccount, ConnectorError> {
        match self {
            Connector::Injected(connector) => connector.connect(options).await,
            Connector::Relay(connector) => connector.connect(options).await,
        }
    }

    pub async fn disconnect(&self) -> Result<(), ConnectorError> {
        match self {
            Connector::Injected(connector) => connector.disconnect().await,
            Connector::Relay(connector) => connector.disconnect().await,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectorEvent> {
        match self {
            Connector::Injected(connector) => connector.subscribe(),
            Connector::Relay(connector) => connector.subscribe(),
        }
    }

    /// The relay connector, when it is the bound variant. QR-code flows
    /// must go through this accessor so an injected binding can never be
    /// driven down the pairing path.
    pub fn as_relay(&self) -> Option<&RelayConnector> {
        match self {
            Connector::Relay(connector) => Some(connector),
            Connector::Injected(_) => None,
        }
    }
}
