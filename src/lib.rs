//! evm-wallet-kit — SDK for EVM-compatible blockchains
//!
//! The heart of the crate is the wallet connector abstraction: a per-brand
//! [`wallet::WalletFacade`] that probes the host environment once, binds
//! either an injected or a relayed connector on first use, and exposes a
//! uniform connect/disconnect/event interface over both.
//!
//! Around that sit a chain-metadata registry ([`chains`]), helpers for
//! content-addressed resources ([`storage`]), and a local signer adapter
//! ([`signer`]). The relay protocol and the injected provider runtime are
//! external collaborators, consumed through the [`connectors::RelayService`]
//! and [`connectors::EthereumProvider`] traits.
//!
//! ```no_run
//! use std::sync::Arc;
//! use evm_wallet_kit::connectors::{ConnectorError, HostEnvironment, RelayConfig, RelayService};
//! use evm_wallet_kit::wallet::{QrCodeConnectOptions, WalletFacade, WalletMeta};
//!
//! async fn connect(relay: Arc<dyn RelayService>) -> Result<(), ConnectorError> {
//!     let facade = WalletFacade::new(
//!         WalletMeta::defi_wallet(),
//!         &HostEnvironment::Absent,
//!         relay,
//!         RelayConfig::default(),
//!     );
//!
//!     facade
//!         .connect_with_qr_code(QrCodeConnectOptions {
//!             chain_id: Some(1),
//!             on_qr_code_uri: Box::new(|uri| println!("render QR for {uri}")),
//!             on_connected: Box::new(|address| println!("connected: {address}")),
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod chains;
pub mod connectors;
pub mod signer;
pub mod storage;
pub mod wallet;

pub use connectors::{
    ConnectOptions, ConnectedAccount, Connector, ConnectorError, ConnectorEvent, ConnectorKind,
    EventKind, HostEnvironment,
};
pub use wallet::{QrCodeConnectOptions, WalletFacade, WalletMeta};
