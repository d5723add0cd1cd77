//! Wallet Brand Metadata
//!
//! Static per-brand records: identity, display assets, install links, and
//! the vendor flag the capability probe tests for. Mirrors the upstream
//! wallet registry format.

use serde::{Deserialize, Serialize};

/// Install links for a wallet brand
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallUrls {
    pub chrome: Option<String>,
    pub android: Option<String>,
    pub ios: Option<String>,
}

/// Display metadata and probe identity for one wallet brand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletMeta {
    /// Stable brand identifier (e.g. `"defiWallet"`)
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Icon for wallet pickers
    pub icon_url: String,
    /// Boolean property the brand's injected provider advertises
    pub vendor_flag: String,
    /// Where to install the wallet when it is not present
    pub install_urls: InstallUrls,
    /// Mobile deep-link scheme for handing off a pairing URI
    pub deep_link_scheme: Option<String>,
}

impl WalletMeta {
    /// Crypto.com DeFi Wallet
    pub fn defi_wallet() -> Self {
        Self {
            id: "defiWallet".to_string(),
            name: "Defi Wallet".to_string(),
            icon_url: "https://lh3.googleusercontent.com/BmQtjccsO615vh8Dnc_SIATj9lQAFzBltJbW15pxEce8c3yHC_iXTn-Pa8_5jXL130l1hEIqiTn5_jUIjR6iNyif=w128-h128-e365-rj-sc0x00ffffff".to_string(),
            vendor_flag: "isDefiWallet".to_string(),
            install_urls: InstallUrls {
                chrome: Some("https://chrome.google.com/webstore/detail/cryptocom-wallet-extensio/hifafgmccdpekplomjjkcfgodnhcellj".to_string()),
                android: Some("https://play.google.com/store/apps/details?id=com.defi.wallet".to_string()),
                ios: Some("https://apps.apple.com/app/id1512048310".to_string()),
            },
            deep_link_scheme: Some("dfw".to_string()),
        }
    }

    /// MetaMask
    pub fn metamask() -> Self {
        Self {
            id: "metamask".to_string(),
            name: "MetaMask".to_string(),
            icon_url: "https://registry.walletconnect.com/v2/logo/md/5195e9db-94d8-4579-6f11-ef553be95100".to_string(),
            vendor_flag: "isMetaMask".to_string(),
            install_urls: InstallUrls {
                chrome: Some("https://chrome.google.com/webstore/detail/metamask/nkbihfbeogaeaoehlefnkodbefgpgknn".to_string()),
                android: Some("https://play.google.com/store/apps/details?id=io.metamask".to_string()),
                ios: Some("https://apps.apple.com/app/id1438144202".to_string()),
            },
            deep_link_scheme: Some("metamask".to_string()),
        }
    }

    /// Coinbase Wallet
    pub fn coinbase_wallet() -> Self {
        Self {
            id: "coinbaseWallet".to_string(),
            name: "Coinbase Wallet".to_string(),
            icon_url: "https://registry.walletconnect.com/v2/logo/md/a5ebc364-8f91-4200-fcc6-be81310a0000".to_string(),
            install_urls: InstallUrls {
                chrome: Some("https://chrome.google.com/webstore/detail/coinbase-wallet-extension/hnfanknocfeofbddgcijnmhnfnkdnaad".to_string()),
                android: Some("https://play.google.com/store/apps/details?id=org.toshi".to_string()),
                ios: Some("https://apps.apple.com/app/id1278383455".to_string()),
            },
            vendor_flag: "isCoinbaseWallet".to_string(),
            deep_link_scheme: Some("cbwallet".to_string()),
        }
    }

    /// Build a mobile deep link handing a pairing URI to the wallet app.
    /// Returns `None` for brands without a deep-link scheme.
    pub fn deep_link(&self, pairing_uri: &str) -> Option<String> {
        let scheme = self.deep_link_scheme.as_deref()?;
        let encoded: String = url::form_urlencoded::byte_serialize(pairing_uri.as_bytes()).collect();
        Some(format!("{scheme}://wc?uri={encoded}"))
    }
}

/// All built-in wallet brands
pub fn builtin_wallets() -> Vec<WalletMeta> {
    vec![
        WalletMeta::defi_wallet(),
        WalletMeta::metamask(),
        WalletMeta::coinbase_wallet(),
    ]
}
