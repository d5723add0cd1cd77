//! Chain Metadata
//!
//! Per-chain records in the upstream chain-list format, plus a small
//! built-in registry of common EVM networks. The records are a read-only
//! lookup dataset; nothing here talks to the network.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Placeholder in RPC URLs substituted with the caller's API key
pub const API_KEY_TEMPLATE: &str = "${API_KEY}";

/// Errors raised by chain-record handling
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("invalid chain record: {0}")]
    InvalidRecord(#[from] serde_json::Error),

    #[error("unknown chain: {0}")]
    UnknownChain(String),
}

/// Native currency of a chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Block explorer entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explorer {
    pub name: String,
    pub url: String,
    /// Explorer URL convention, e.g. `"EIP3091"`
    #[serde(default)]
    pub standard: Option<String>,
}

/// One chain record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainMetadata {
    pub chain_id: u64,
    pub name: String,
    pub short_name: String,
    pub slug: String,
    pub native_currency: NativeCurrency,
    #[serde(default)]
    pub rpc: Vec<String>,
    #[serde(default)]
    pub explorers: Vec<Explorer>,
    #[serde(default)]
    pub testnet: bool,
}

impl ChainMetadata {
    /// Parse a single chain record from its JSON form
    pub fn from_json(json: &str) -> Result<Self, ChainError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Usable RPC URLs for this chain.
    ///
    /// Entries carrying the [`API_KEY_TEMPLATE`] placeholder are resolved
    /// against the supplied key and skipped entirely when no key is
    /// available.
    pub fn rpc_urls(&self, api_key: Option<&str>) -> Vec<String> {
        self.rpc
            .iter()
            .filter_map(|rpc_url| {
                if rpc_url.contains(API_KEY_TEMPLATE) {
                    api_key.map(|key| rpc_url.replace(API_KEY_TEMPLATE, key))
                } else {
                    Some(rpc_url.clone())
                }
            })
            .collect()
    }
}

/// In-memory chain lookup table, indexed by chain id and slug
pub struct ChainRegistry {
    by_id: HashMap<u64, ChainMetadata>,
    slug_to_id: HashMap<String, u64>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            slug_to_id: HashMap::new(),
        }
    }

    /// Registry pre-populated with common EVM networks
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for chain in builtin_chains() {
            registry.insert(chain);
        }
        registry
    }

    /// Add or replace a chain record
    pub fn insert(&mut self, chain: ChainMetadata) {
        self.slug_to_id.insert(chain.slug.clone(), chain.chain_id);
        self.by_id.insert(chain.chain_id, chain);
    }

    pub fn get(&self, chain_id: u64) -> Option<&ChainMetadata> {
        self.by_id.get(&chain_id)
    }

    pub fn by_slug(&self, slug: &str) -> Option<&ChainMetadata> {
        self.slug_to_id.get(slug).and_then(|id| self.by_id.get(id))
    }

    /// Look up by decimal chain id or slug, for CLI-style input
    pub fn resolve(&self, id_or_slug: &str) -> Result<&ChainMetadata, ChainError> {
        id_or_slug
            .parse::<u64>()
            .ok()
            .and_then(|id| self.get(id))
            .or_else(|| self.by_slug(id_or_slug))
            .ok_or_else(|| ChainError::UnknownChain(id_or_slug.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainMetadata> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn chain(
    chain_id: u64,
    name: &str,
    short_name: &str,
    slug: &str,
    currency: (&str, &str),
    rpc: &[&str],
    explorer: Option<(&str, &str)>,
) -> ChainMetadata {
    ChainMetadata {
        chain_id,
        name: name.to_string(),
        short_name: short_name.to_string(),
        slug: slug.to_string(),
        native_currency: NativeCurrency {
            name: currency.0.to_string(),
            symbol: currency.1.to_string(),
            decimals: 18,
        },
        rpc: rpc.iter().map(|u| u.to_string()).collect(),
        explorers: explorer
            .map(|(name, url)| {
                vec![Explorer {
                    name: name.to_string(),
                    url: url.to_string(),
                    standard: Some("EIP3091".to_string()),
                }]
            })
            .unwrap_or_default(),
        testnet: false,
    }
}

/// Built-in records for common EVM networks
pub fn builtin_chains() -> Vec<ChainMetadata> {
    vec![
        chain(
            1,
            "Ethereum Mainnet",
            "eth",
            "ethereum",
            ("Ether", "ETH"),
            &[
                "https://ethereum.rpc.gateway.dev/${API_KEY}",
                "https://cloudflare-eth.com",
            ],
            Some(("etherscan", "https://etherscan.io")),
        ),
        chain(
            10,
            "OP Mainnet",
            "oeth",
            "optimism",
            ("Ether", "ETH"),
            &["https://mainnet.optimism.io"],
            Some(("etherscan", "https://optimistic.etherscan.io")),
        ),
        chain(
            25,
            "Cronos Mainnet",
            "cro",
            "cronos",
            ("Cronos", "CRO"),
            &["https://evm.cronos.org"],
            Some(("Cronos Explorer", "https://explorer.cronos.org")),
        ),
        chain(
            137,
            "Polygon Mainnet",
            "matic",
            "polygon",
            ("MATIC", "MATIC"),
            &[
                "https://polygon.rpc.gateway.dev/${API_KEY}",
                "https://polygon-rpc.com",
            ],
            Some(("polygonscan", "https://polygonscan.com")),
        ),
        chain(
            8453,
            "Base",
            "base",
            "base",
            ("Ether", "ETH"),
            &["https://mainnet.base.org"],
            Some(("basescan", "https://basescan.org")),
        ),
        chain(
            42161,
            "Arbitrum One",
            "arb1",
            "arbitrum",
            ("Ether", "ETH"),
            &["https://arb1.arbitrum.io/rpc"],
            Some(("Arbiscan", "https://arbiscan.io")),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let registry = ChainRegistry::builtin();
        assert!(!registry.is_empty());

        let cronos = registry.get(25).unwrap();
        assert_eq!(cronos.slug, "cronos");
        assert_eq!(cronos.native_currency.symbol, "CRO");

        let arbitrum = registry.by_slug("arbitrum").unwrap();
        assert_eq!(arbitrum.chain_id, 42161);
    }

    #[test]
    fn test_resolve_by_id_or_slug() {
        let registry = ChainRegistry::builtin();
        assert_eq!(registry.resolve("137").unwrap().slug, "polygon");
        assert_eq!(registry.resolve("polygon").unwrap().chain_id, 137);
        assert!(matches!(
            registry.resolve("no-such-chain"),
            Err(ChainError::UnknownChain(_))
        ));
    }

    #[test]
    fn test_rpc_url_templating() {
        let ethereum = ChainRegistry::builtin().get(1).unwrap().clone();

        let with_key = ethereum.rpc_urls(Some("my-key"));
        assert!(with_key.contains(&"https://ethereum.rpc.gateway.dev/my-key".to_string()));
        assert!(with_key.contains(&"https://cloudflare-eth.com".to_string()));

        // templated entries are skipped without a key
        let without_key = ethereum.rpc_urls(None);
        assert_eq!(without_key, vec!["https://cloudflare-eth.com".to_string()]);
    }

    #[test]
    fn test_from_json_record() {
        let record = r#"{
            "chainId": 2606,
            "name": "PoCRNet",
            "shortName": "pocrnet",
            "slug": "pocrnet",
            "nativeCurrency": {
                "name": "Climate awaReness Coin",
                "symbol": "CRC",
                "decimals": 18
            },
            "rpc": ["https://pocrnet.westeurope.cloudapp.azure.com/http"],
            "testnet": false
        }"#;

        let parsed = ChainMetadata::from_json(record).unwrap();
        assert_eq!(parsed.chain_id, 2606);
        assert_eq!(parsed.native_currency.symbol, "CRC");
        assert!(parsed.explorers.is_empty());
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut registry = ChainRegistry::builtin();
        let before = registry.len();

        let mut cronos = registry.get(25).unwrap().clone();
        cronos.rpc.push("https://cronos-evm.publicnode.com".to_string());
        registry.insert(cronos);

        assert_eq!(registry.len(), before);
        assert_eq!(registry.get(25).unwrap().rpc.len(), 2);
    }
}
