//! Injected Provider Interface
//!
//! An injected provider is a wallet-control object already present in the
//! host environment (typically exposed by a browser extension). The SDK
//! never creates one; it only inspects, calls, and subscribes to it.

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::ConnectorError;

/// Events emitted by an injected provider
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    /// The set of authorized accounts changed
    AccountsChanged(Vec<String>),
    /// The active chain changed
    ChainChanged(u64),
    /// The provider dropped the connection
    Disconnected,
}

/// A host-exposed wallet provider.
///
/// Presence and vendor flags are read-only signals; the SDK never mutates
/// host state. Multiple facades may share one provider concurrently.
#[async_trait]
pub trait EthereumProvider: Send + Sync {
    /// Test whether the provider advertises a vendor flag (e.g. `isDefiWallet`)
    fn has_vendor_flag(&self, flag: &str) -> bool;

    /// Request the authorized account addresses, prompting the user if needed
    async fn request_accounts(&self) -> Result<Vec<String>, ConnectorError>;

    /// Ask the provider to switch its active chain
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ConnectorError>;

    /// Subscribe to account/chain-change events
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}
