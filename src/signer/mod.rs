//! Local Signer Adapter
//!
//! Bridges a locally held private key into the SDK through ethers-rs.
//! Relayed sessions delegate signing to the remote wallet; this adapter
//! covers the case where the caller holds the key directly.

use ethers_core::types::{Address, Signature};
use ethers_signers::{LocalWallet, Signer};

/// Errors raised by the local signer
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),
}

/// Signer backed by an in-memory private key
pub struct LocalSigner {
    wallet: LocalWallet,
    chain_id: u64,
}

impl LocalSigner {
    /// Create a signer from a hex private key, with or without 0x prefix
    pub fn from_private_key(private_key: &str, chain_id: u64) -> Result<Self, SignerError> {
        let key = private_key.strip_prefix("0x").unwrap_or(private_key);

        let wallet: LocalWallet = key
            .parse()
            .map_err(|e| SignerError::InvalidPrivateKey(format!("{}", e)))?;

        Ok(Self {
            wallet: wallet.with_chain_id(chain_id),
            chain_id,
        })
    }

    /// The signer's account address
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// The address formatted as a 0x-prefixed hex string
    pub fn address_string(&self) -> String {
        format!("{:?}", self.wallet.address())
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign a message in personal_sign (EIP-191) format
    pub async fn sign_message(&self, message: &[u8]) -> Result<Signature, SignerError> {
        self.wallet
            .sign_message(message)
            .await
            .map_err(|e| SignerError::SigningFailed(format!("{}", e)))
    }
}

impl Clone for LocalSigner {
    fn clone(&self) -> Self {
        Self {
            wallet: self.wallet.clone(),
            chain_id: self.chain_id,
        }
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address_string())
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
